//! End-to-end runs of the daemon wiring over an in-process event source.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use reportd::{
    Config, Event, EventKind, Reportd, RuntimeError, SourceError, Subscribe, source,
};

/// Records every runtime event it sees.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    fn of(&self, kind: EventKind) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn daemon(cfg: Config) -> (Reportd, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let daemon = Reportd::builder(cfg)
        .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
        .build();
    (daemon, recorder)
}

#[tokio::test(start_paused = true)]
async fn test_exits_after_both_workers_finish() {
    let (publisher, src) = source::channel(16);
    publisher.publish("packetd-events", "session-1").await.unwrap();
    publisher.publish("packetd-events", "session-2").await.unwrap();

    let (daemon, recorder) = daemon(Config::default());
    let started = Instant::now();
    let decision = daemon.run(move |_| Ok(src)).await.unwrap();

    assert_eq!(decision.signals, 4);
    assert!(started.elapsed() >= Duration::from_secs(30));

    let messages: Vec<String> = recorder
        .of(EventKind::MessageReceived)
        .iter()
        .map(|e| e.payload_text().unwrap())
        .collect();
    assert_eq!(messages, vec!["session-1", "session-2"]);

    let finished: Vec<String> = recorder
        .of(EventKind::WorkerFinished)
        .iter()
        .map(|e| e.worker.as_deref().unwrap().to_string())
        .collect();
    assert_eq!(finished.len(), 2);
    assert!(finished.contains(&"event-listener".to_string()));
    assert!(finished.contains(&"event-logger".to_string()));

    assert_eq!(recorder.of(EventKind::ShutdownDecided).len(), 1);
    drop(publisher);
}

#[tokio::test(start_paused = true)]
async fn test_both_workers_registered_before_either_unregisters() {
    let mut cfg = Config::default();
    cfg.ingest.window_ms = 0;
    cfg.persist.hold_ms = 0;

    let (_publisher, src) = source::channel(1);
    let (daemon, recorder) = daemon(cfg);
    let decision = daemon.run(move |_| Ok(src)).await.unwrap();
    assert_eq!(decision.signals, 4);

    let counts: Vec<u64> = recorder
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                EventKind::WorkerRegistered | EventKind::WorkerUnregistered
            )
        })
        .map(|e| e.active.unwrap())
        .collect();
    assert_eq!(counts, vec![1, 2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_receive_failure_ends_listener_and_still_unregisters() {
    let (publisher, src) = source::channel(16);
    publisher
        .fail(SourceError::Receive {
            error: "Context was terminated".into(),
        })
        .await
        .unwrap();

    let (daemon, recorder) = daemon(Config::default());
    let decision = daemon.run(move |_| Ok(src)).await.unwrap();
    assert_eq!(decision.signals, 4);

    let receive_failed = recorder.of(EventKind::ReceiveFailed);
    assert_eq!(receive_failed.len(), 1);
    assert!(
        receive_failed[0]
            .reason
            .as_deref()
            .unwrap()
            .contains("Context was terminated")
    );

    let failed = recorder.of(EventKind::WorkerFailed);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].worker.as_deref(), Some("event-listener"));
    assert!(recorder.of(EventKind::MessageReceived).is_empty());
    drop(publisher);
}

#[tokio::test(start_paused = true)]
async fn test_source_setup_failure_aborts_before_any_worker() {
    let (daemon, recorder) = daemon(Config::default());
    let mut attempts = 0;

    let err = daemon
        .run(|cfg| {
            attempts += 1;
            Err::<source::ChannelSource, _>(SourceError::Connect {
                endpoint: cfg.endpoint.clone(),
                error: "Connection refused".into(),
            })
        })
        .await
        .unwrap_err();

    assert_eq!(attempts, 1);
    match err {
        RuntimeError::SourceSetup(SourceError::Connect { endpoint, .. }) => {
            assert_eq!(endpoint, "tcp://localhost:5561");
        }
        other => panic!("unexpected error: {other}"),
    }

    let kinds = recorder.kinds();
    assert!(!kinds.contains(&EventKind::WorkerStarting));
    assert!(!kinds.contains(&EventKind::WorkerRegistered));
    assert!(!kinds.contains(&EventKind::ShutdownDecided));
}
