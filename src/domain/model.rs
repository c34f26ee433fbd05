use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    Pending,
    Sent,
    Failed,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactStatus::Pending => "Pending",
            ContactStatus::Sent => "Sent",
            ContactStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// One row of the contact table. Identity is the position in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub status: ContactStatus,
}

impl Contact {
    pub fn pending(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            status: ContactStatus::Pending,
        }
    }
}

/// A contacts-file line that could not be turned into a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDiagnostic {
    pub line_number: usize,
    pub content: String,
}

impl fmt::Display for ImportDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub added: Vec<Contact>,
    pub skipped: Vec<ImportDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEventKind {
    Confirm,
    Info,
    Warning,
    Error,
}

/// Result of delivering to one contact of the snapshot.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub position: usize,
    pub contact: Contact,
    pub status: ContactStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub batch_id: String,
    pub outcomes: Vec<SendOutcome>,
    pub total: usize,
    pub interrupted: bool,
    pub duration: Duration,
}

impl BatchReport {
    pub fn sent(&self) -> usize {
        self.count(ContactStatus::Sent)
    }

    pub fn failed(&self) -> usize {
        self.count(ContactStatus::Failed)
    }

    /// Contacts of the snapshot never attempted because the batch was interrupted.
    pub fn not_attempted(&self) -> usize {
        self.total - self.outcomes.len()
    }

    pub fn statuses(&self) -> Vec<ContactStatus> {
        self.outcomes.iter().map(|o| o.status).collect()
    }

    fn count(&self, status: ContactStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// The user declined at the confirmation gate.
    Cancelled,
    Completed(BatchReport),
}
