//! Fire-and-forget persistence of a running game.
//!
//! The game never waits on storage. Answers are queued to a single worker
//! task, which writes them in submission order. Failed writes are logged and
//! counted; they never reach the session.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use braindriver_core::Answer;

use crate::store::{DecisionStore, NewDecision};

enum Command {
    Decision(NewDecision),
    Flush(oneshot::Sender<()>),
}

/// Outcome counters reported when the recorder shuts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub written: u32,
    pub failed: u32,
}

/// Background writer bound to one session.
pub struct PersistentRecorder {
    session_id: String,
    tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<RecorderStats>,
}

impl PersistentRecorder {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// The session row is created first; a failure there is logged like any
    /// other write failure.
    pub fn spawn(store: Arc<dyn DecisionStore>, session_id: &str, language: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(
            store,
            session_id.to_string(),
            language.to_string(),
            rx,
        ));
        Self {
            session_id: session_id.to_string(),
            tx,
            worker,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Queue an answer for storage. Never blocks and never fails.
    pub fn persist(&self, answer: &Answer) {
        let decision = NewDecision::from_answer(&self.session_id, answer);
        if self.tx.send(Command::Decision(decision)).is_err() {
            tracing::warn!(
                session_id = %self.session_id,
                question_id = %answer.question_id,
                "recorder worker is gone, decision dropped"
            );
        }
    }

    /// Wait until everything queued so far has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Drain the queue, stop the worker, and report what happened.
    pub async fn shutdown(self) -> RecorderStats {
        let Self { tx, worker, .. } = self;
        drop(tx);
        match worker.await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "recorder worker panicked");
                RecorderStats::default()
            }
        }
    }
}

async fn run_worker(
    store: Arc<dyn DecisionStore>,
    session_id: String,
    language: String,
    mut rx: mpsc::UnboundedReceiver<Command>,
) -> RecorderStats {
    let mut stats = RecorderStats::default();

    if let Err(e) = store.create_or_get_session(&session_id, &language).await {
        tracing::warn!(
            store = store.name(),
            session_id = %session_id,
            error = %e,
            "failed to create session"
        );
    }

    while let Some(command) = rx.recv().await {
        match command {
            Command::Decision(decision) => match store.record_decision(&decision).await {
                Ok(record) => {
                    stats.written += 1;
                    tracing::debug!(
                        session_id = %record.session_id,
                        question_id = %record.question_id,
                        "decision stored"
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        store = store.name(),
                        session_id = %decision.session_id,
                        question_id = %decision.question_id,
                        error = %e,
                        "failed to store decision"
                    );
                }
            },
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    stats
}
