use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use super::{Mailer, OutgoingEmail};

/// Fire-and-forget handle onto the notification worker.
///
/// Cloning is cheap; every clone feeds the same queue. The worker exits once
/// all handles are dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<OutgoingEmail>,
}

impl NotificationDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(mailer: Arc<dyn Mailer>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(mailer, rx));
        (Self { tx }, worker)
    }

    /// Queues `email` and returns immediately.
    pub fn dispatch(&self, email: OutgoingEmail) {
        if let Err(err) = self.tx.send(email) {
            tracing::warn!(
                to = %err.0.to,
                subject = %err.0.subject,
                "Notification worker has stopped; message dropped"
            );
        }
    }
}

async fn run(mailer: Arc<dyn Mailer>, mut rx: mpsc::UnboundedReceiver<OutgoingEmail>) {
    while let Some(email) = rx.recv().await {
        match mailer.send(&email).await {
            Ok(()) => tracing::info!(to = %email.to, subject = %email.subject, "Notification sent"),
            Err(e) => tracing::warn!(
                to = %email.to,
                subject = %email.subject,
                error = %e,
                "Notification failed"
            ),
        }
    }
    tracing::debug!("Notification queue closed");
}
