pub mod contact_store;
pub mod orchestrator;
pub mod pacing;
pub mod template;

pub use crate::domain::model::{
    BatchEventKind, BatchOutcome, BatchReport, Contact, ContactStatus, ImportDiagnostic,
    ImportReport, SendOutcome,
};
pub use crate::domain::ports::{
    ConfirmationGate, MessagingTransport, PacingPolicy, SessionState, StatusReporter,
};
pub use crate::utils::error::Result;
