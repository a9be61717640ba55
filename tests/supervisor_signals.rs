//! Supervisor decision rule exercised through the public API.

use std::time::Duration;

use reportd::{Bus, Delta, EventKind, RuntimeError, Supervisor};

#[tokio::test]
async fn test_two_registers_two_unregisters_decide_once() {
    let bus = Bus::new(32);
    let mut rx = bus.subscribe();
    let sup = Supervisor::new(bus);

    sup.report(Delta::Register);
    sup.report(Delta::Register);
    sup.report(Delta::Unregister);
    sup.report(Delta::Unregister);

    let decision = sup.shutdown().await.unwrap();
    assert_eq!(decision.signals, 4);

    let decided: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter(|e| e.kind == EventKind::ShutdownDecided)
        .collect();
    assert_eq!(decided.len(), 1);
    assert_eq!(decided[0].signals, Some(4));
}

#[tokio::test(start_paused = true)]
async fn test_pending_while_a_worker_is_registered() {
    let sup = Supervisor::new(Bus::new(8));
    let reporter = sup.reporter();
    let guard = reporter.register();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(guard);
    });

    let started = tokio::time::Instant::now();
    let decision = sup.shutdown().await.unwrap();
    assert_eq!(decision.signals, 2);
    assert!(started.elapsed() >= Duration::from_secs(10));
    drop(reporter);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_concurrent_guards_converge_to_zero() {
    const N: u64 = 200;

    let sup = Supervisor::new(Bus::new(8));
    let guards: Vec<_> = (0..N).map(|_| sup.reporter().register()).collect();

    let handles: Vec<_> = guards
        .into_iter()
        .map(|guard| {
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                drop(guard);
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }

    let tally = sup.drain().await.unwrap();
    assert_eq!(tally.active, 0);
    assert_eq!(tally.signals, 2 * N);
    assert_eq!(tally.shutdown.map(|s| s.signals), Some(2 * N));
}

#[tokio::test]
async fn test_no_workers_at_all_is_an_error_not_a_hang() {
    let sup = Supervisor::new(Bus::new(8));
    let err = sup.shutdown().await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoWorkers));
}
