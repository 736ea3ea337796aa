use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

use crate::client::{Outcome, ServiceStatus, SubmitError, Transport};
use crate::state::{RequestId, Submission};

// ---------------------------------------------------------------------------
// Messages from worker threads back to the UI thread
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum WorkerMessage {
    Completed { id: RequestId, outcome: Outcome },
    Status(Result<ServiceStatus, SubmitError>),
}

/// Runs blocking transport calls on background threads.
///
/// Each call gets its own thread; results queue up on a channel that the UI
/// drains once per frame. `notify` runs after a result is queued so the UI
/// can wake up.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (tx, rx) = channel();
        Self { transport, tx, rx }
    }

    pub fn dispatch(&self, submission: Submission, notify: impl Fn() + Send + 'static) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let Submission { id, request } = submission;
            let outcome = transport.submit(&request);
            // The receiver only disappears when the app is shutting down.
            if tx.send(WorkerMessage::Completed { id, outcome }).is_ok() {
                notify();
            }
        });
    }

    pub fn check_status(&self, notify: impl Fn() + Send + 'static) {
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        thread::spawn(move || {
            if tx.send(WorkerMessage::Status(transport.status())).is_ok() {
                notify();
            }
        });
    }

    /// Everything that arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<WorkerMessage> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use crate::client::mock::MockTransport;
    use crate::data::model::TabFile;
    use crate::state::{Phase, SessionController};

    fn recv(dispatcher: &Dispatcher) -> WorkerMessage {
        dispatcher
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker did not answer")
    }

    #[test]
    fn completed_submission_reaches_controller() {
        let transport = Arc::new(
            MockTransport::new()
                .with_response(json!({ "spectrum": [{ "x": 18.0, "cps": 120.0 }], "conclusion": "H2O" })),
        );
        let dispatcher = Dispatcher::new(transport.clone());
        let mut controller = SessionController::new(3).unwrap();

        let submission = controller
            .select_file(TabFile::new("scan.tab", b"END\n".to_vec()))
            .unwrap();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        dispatcher.dispatch(submission, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        match recv(&dispatcher) {
            WorkerMessage::Completed { id, outcome } => assert!(controller.complete(id, outcome)),
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(controller.state().phase, Phase::Succeeded);
        assert_eq!(controller.state().conclusion, "H2O");

        let sent = transport.submitted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].head_drop, "8");
        assert_eq!(sent[0].cps_threshold_dfms, "20000");

        // `notify` runs right after the send; give it a moment.
        for _ in 0..50 {
            if notified.load(Ordering::SeqCst) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn status_check_is_forwarded() {
        let dispatcher = Dispatcher::new(Arc::new(MockTransport::new()));
        dispatcher.check_status(|| {});
        match recv(&dispatcher) {
            WorkerMessage::Status(Ok(status)) => assert!(status.openai_configured),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn drain_is_empty_when_idle() {
        let dispatcher = Dispatcher::new(Arc::new(MockTransport::new()));
        assert!(dispatcher.drain().is_empty());
    }
}
