use crate::domain::model::{BatchEventKind, Contact, ContactStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
    Closed,
}

/// An authenticated session against the messaging web client.
///
/// `deliver` is only meaningful while the session is `Open`; callers are
/// expected to check [`MessagingTransport::state`] first.
#[async_trait]
pub trait MessagingTransport: Send {
    fn state(&self) -> SessionState;

    async fn open(&mut self) -> Result<()>;

    async fn deliver(&mut self, phone: &str, message: &str) -> Result<()>;

    async fn close(&mut self) -> Result<()>;
}

/// Sink for everything the user should see. Carries no business logic.
pub trait StatusReporter: Send + Sync {
    fn on_new_contact(&self, position: usize, contact: &Contact);

    fn on_status_changed(&self, position: usize, contact: &Contact, status: ContactStatus);

    fn on_batch_event(&self, kind: BatchEventKind, detail: &str);
}

pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Wait applied after each delivery attempt.
pub trait PacingPolicy: Send + Sync {
    fn delay_after(&self, position: usize, total: usize) -> Duration;
}
