//! # Run supervised workers.
//!
//! Spawns each [`Worker`] as an independent tokio task that holds a
//! [`WorkerGuard`] for its whole lifetime and publishes lifecycle events to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:
//!   worker.run() → Ok(())        → publish WorkerFinished
//!
//! Failure:
//!   worker.run() → Err(e)        → publish WorkerFailed(e)
//!
//! Panic:
//!   worker.run() → unwind caught → publish WorkerFailed(panicked)
//!
//! Every path: task ends → guard dropped → Delta::Unregister
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event: `WorkerFinished` or `WorkerFailed`
//! - Worker errors stop here: they are logged, never sent to the supervisor
//! - [`spawn_all`] registers **every** worker before spawning **any**, so a fast
//!   worker cannot bring the count to zero while a sibling is still unregistered

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::{
    core::signal::{Reporter, WorkerGuard},
    error::WorkerError,
    events::{Bus, Event, EventKind},
    subscribers::panic_message,
    workers::Worker,
};

/// Spawns one worker that already owns its registration.
///
/// The guard lives inside the spawned task and is dropped when the task ends,
/// whichever way it ends.
pub fn spawn_supervised(
    mut worker: Box<dyn Worker>,
    guard: WorkerGuard,
    bus: Bus,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let _guard = guard;
        let name: Arc<str> = Arc::from(worker.name());

        bus.publish(Event::new(EventKind::WorkerStarting).with_worker(name.clone()));

        let res = match AssertUnwindSafe(worker.run()).catch_unwind().await {
            Ok(res) => res,
            Err(panic_err) => Err(WorkerError::Panicked {
                info: panic_message(&*panic_err),
            }),
        };

        match res {
            Ok(()) => publish_finished(&bus, name),
            Err(e) => publish_failed(&bus, name, &e),
        }
    })
}

/// Registers all workers, then spawns them.
pub fn spawn_all(workers: Vec<Box<dyn Worker>>, reporter: &Reporter, bus: &Bus) -> Vec<JoinHandle<()>> {
    let guards: Vec<WorkerGuard> = workers.iter().map(|_| reporter.register()).collect();

    workers
        .into_iter()
        .zip(guards)
        .map(|(worker, guard)| spawn_supervised(worker, guard, bus.clone()))
        .collect()
}

/// Publishes `WorkerFinished` event.
fn publish_finished(bus: &Bus, name: Arc<str>) {
    bus.publish(Event::new(EventKind::WorkerFinished).with_worker(name));
}

/// Publishes `WorkerFailed` event with error details.
fn publish_failed(bus: &Bus, name: Arc<str>, err: &WorkerError) {
    bus.publish(
        Event::new(EventKind::WorkerFailed)
            .with_worker(name)
            .with_reason(format!("{} ({})", err, err.as_label())),
    );
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{Delta, SourceError, Supervisor};

    enum Exit {
        Normal,
        Error,
        Panic,
    }

    struct Scripted {
        name: &'static str,
        exit: Exit,
    }

    #[async_trait]
    impl Worker for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&mut self) -> Result<(), WorkerError> {
            tokio::task::yield_now().await;
            match self.exit {
                Exit::Normal => Ok(()),
                Exit::Error => Err(SourceError::Closed.into()),
                Exit::Panic => panic!("scripted panic"),
            }
        }
    }

    fn scripted(name: &'static str, exit: Exit) -> Box<dyn Worker> {
        Box::new(Scripted { name, exit })
    }

    #[tokio::test]
    async fn test_every_exit_path_unregisters_once() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let sup = Supervisor::new(bus.clone());

        let handles = spawn_all(
            vec![
                scripted("normal", Exit::Normal),
                scripted("error", Exit::Error),
                scripted("panic", Exit::Panic),
            ],
            &sup.reporter(),
            &bus,
        );
        for h in handles {
            h.await.unwrap();
        }

        let decision = sup.shutdown().await.unwrap();
        assert_eq!(decision.signals, 6);

        let mut finished = Vec::new();
        let mut failed = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            let name = ev.worker.as_deref().unwrap_or_default().to_string();
            match ev.kind {
                EventKind::WorkerFinished => finished.push(name),
                EventKind::WorkerFailed => failed.push((name, ev.reason.unwrap().to_string())),
                _ => {}
            }
        }
        failed.sort();
        assert_eq!(finished, vec!["normal".to_string()]);
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].0, "error");
        assert!(failed[0].1.contains("source closed"));
        assert_eq!(failed[1].0, "panic");
        assert!(failed[1].1.contains("scripted panic"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_workers_converge_to_single_decision() {
        const N: usize = 64;

        let bus = Bus::new(1024);
        let mut rx = bus.subscribe();
        let sup = Supervisor::new(bus.clone());

        let workers = (0..N).map(|_| scripted("immediate", Exit::Normal)).collect();
        let handles = spawn_all(workers, &sup.reporter(), &bus);

        let decision = sup.shutdown().await.unwrap();
        assert_eq!(decision.signals, 2 * N as u64);

        for h in handles {
            h.await.unwrap();
        }
        let decided = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::ShutdownDecided)
            .count();
        assert_eq!(decided, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_raw_reports_from_many_tasks_sum_to_zero() {
        let sup = Supervisor::new(Bus::new(8));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let reporter = sup.reporter();
            handles.push(tokio::spawn(async move {
                reporter.report(Delta::Register);
                tokio::task::yield_now().await;
                reporter.report(Delta::Unregister);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let tally = sup.drain().await.unwrap();
        assert_eq!(tally.active, 0);
        assert_eq!(tally.signals, 64);
        assert_eq!(tally.rejected, 0);
        assert!(tally.shutdown.is_some());
    }
}
