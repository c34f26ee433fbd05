//! Glue between the user actions and the core: import, preview, send.

use crate::adapters::webdriver::chat_link;
use crate::core::contact_store::ContactStore;
use crate::core::orchestrator::{BatchContext, SendOrchestrator};
use crate::core::template;
use crate::core::{
    BatchEventKind, BatchOutcome, Contact, ImportDiagnostic, MessagingTransport, StatusReporter,
};
use crate::utils::error::{Result, SenderError};
use crate::utils::validation::parse_interval_seconds;

/// Splits a manual entry at its last ':' into name and phone.
pub fn parse_manual_entry(entry: &str) -> Result<(String, String)> {
    entry
        .rsplit_once(':')
        .map(|(name, phone)| (name.to_string(), phone.to_string()))
        .ok_or_else(|| {
            SenderError::validation(format!(
                "Manual contact '{}' must look like NAME:PHONE",
                entry
            ))
        })
}

/// Loads every contacts file, then the manual entries, in that order.
/// Returns all skipped-line diagnostics across files.
pub fn import_contacts(
    store: &mut ContactStore,
    files: &[String],
    manual: &[String],
    reporter: &dyn StatusReporter,
) -> Result<Vec<ImportDiagnostic>> {
    let mut skipped = Vec::new();

    for file in files {
        let report = store.load_from_text(file)?;
        reporter.on_batch_event(
            BatchEventKind::Info,
            &format!("Loaded {} contacts from {}", report.added.len(), file),
        );
        if !report.skipped.is_empty() {
            let lines: Vec<String> = report.skipped.iter().map(|d| d.to_string()).collect();
            reporter.on_batch_event(
                BatchEventKind::Warning,
                &format!(
                    "Skipped {} invalid lines in {}: {}",
                    report.skipped.len(),
                    file,
                    lines.join("; ")
                ),
            );
        }
        skipped.extend(report.skipped);
    }

    for entry in manual {
        let (name, phone) = parse_manual_entry(entry)?;
        store.add_manual(&name, &phone)?;
    }

    Ok(skipped)
}

#[derive(Debug, Clone)]
pub struct PreviewLine {
    pub contact: Contact,
    pub message: String,
    pub link: String,
}

pub fn preview_messages(
    contacts: &[Contact],
    template_text: &str,
    base_url: &str,
) -> Result<Vec<PreviewLine>> {
    contacts
        .iter()
        .map(|contact| {
            let message = template::render(template_text, contact);
            let link = chat_link(base_url, &contact.phone, &message)?.to_string();
            Ok(PreviewLine {
                contact: contact.clone(),
                message,
                link,
            })
        })
        .collect()
}

/// Whether a browser has to be opened for `send`.
///
/// An empty store needs none (the batch reports "nothing to send"). Otherwise
/// the interval is checked here so a bad value fails before Chrome starts.
pub fn transport_needed(store: &ContactStore, interval: &str) -> Result<bool> {
    if store.is_empty() {
        return Ok(false);
    }
    parse_interval_seconds(interval)?;
    Ok(true)
}

/// Runs one batch over the store's current contents and writes the
/// resulting statuses back into the store.
pub async fn send_batch(
    store: &mut ContactStore,
    orchestrator: &SendOrchestrator,
    transport: &mut dyn MessagingTransport,
    template: String,
    interval: String,
) -> Result<BatchOutcome> {
    let outcome = orchestrator
        .run_batch(BatchContext {
            contacts: store.snapshot(),
            template,
            interval,
            transport,
        })
        .await?;

    if let BatchOutcome::Completed(report) = &outcome {
        store.record_outcomes(&report.outcomes);
    }
    Ok(outcome)
}
