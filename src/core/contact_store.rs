use crate::core::{Contact, ContactStatus, ImportDiagnostic, ImportReport, SendOutcome, StatusReporter};
use crate::utils::error::{Result, SenderError};
use std::path::Path;
use std::sync::Arc;

/// Parses contacts text: one contact per line, last whitespace-separated
/// token is the phone, the rest is the name.
pub fn parse_contacts(text: &str) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.split_last() {
            Some((phone, name_parts)) if !name_parts.is_empty() => {
                report
                    .added
                    .push(Contact::pending(name_parts.join(" "), *phone));
            }
            _ => {
                tracing::warn!("Skipping invalid line {}: {}", index + 1, line);
                report.skipped.push(ImportDiagnostic {
                    line_number: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    report
}

/// Ordered, append-only contact table for one session.
pub struct ContactStore {
    contacts: Vec<Contact>,
    reporter: Arc<dyn StatusReporter>,
}

impl ContactStore {
    pub fn new(reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            contacts: Vec::new(),
            reporter,
        }
    }

    pub fn load_from_text<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportReport> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SenderError::ContactsFileError {
            path: path.display().to_string(),
            source,
        })?;

        // Files saved in a legacy encoding still import; bad bytes become U+FFFD.
        let content = String::from_utf8_lossy(&bytes);
        let report = parse_contacts(&content);
        for contact in &report.added {
            self.push(contact.clone());
        }

        tracing::info!(
            "📇 Loaded {} contacts from {} ({} lines skipped)",
            report.added.len(),
            path.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    pub fn add_manual(&mut self, name: &str, phone: &str) -> Result<Contact> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() || phone.is_empty() {
            return Err(SenderError::validation(
                "Please enter both name and phone number.",
            ));
        }

        let contact = Contact::pending(name, phone);
        self.push(contact.clone());
        tracing::debug!("Added contact {} ({})", contact.name, contact.phone);
        Ok(contact)
    }

    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.contacts.clone()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Copies the statuses produced by a batch back onto the rows they came from.
    pub fn record_outcomes(&mut self, outcomes: &[SendOutcome]) {
        for outcome in outcomes {
            match self.contacts.get_mut(outcome.position) {
                Some(contact) => contact.status = outcome.status,
                None => tracing::warn!(
                    "Outcome for unknown row {} ({}) ignored",
                    outcome.position,
                    outcome.contact.name
                ),
            }
        }
    }

    pub fn count_with_status(&self, status: ContactStatus) -> usize {
        self.contacts.iter().filter(|c| c.status == status).count()
    }

    fn push(&mut self, contact: Contact) {
        let position = self.contacts.len();
        self.reporter.on_new_contact(position, &contact);
        self.contacts.push(contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BatchEventKind;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct RowRecorder {
        rows: Mutex<Vec<(usize, String)>>,
    }

    impl StatusReporter for RowRecorder {
        fn on_new_contact(&self, position: usize, contact: &Contact) {
            self.rows
                .lock()
                .unwrap()
                .push((position, contact.name.clone()));
        }

        fn on_status_changed(&self, _position: usize, _contact: &Contact, _status: ContactStatus) {}

        fn on_batch_event(&self, _kind: BatchEventKind, _detail: &str) {}
    }

    #[test]
    fn test_parse_multi_word_name() {
        let report = parse_contacts("A B C 555\n");
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.added[0].name, "A B C");
        assert_eq!(report.added[0].phone, "555");
        assert_eq!(report.added[0].status, ContactStatus::Pending);
    }

    #[test]
    fn test_parse_collapses_inner_whitespace() {
        let report = parse_contacts("  John \t  Doe    +1234567890  ");
        assert_eq!(report.added[0].name, "John Doe");
        assert_eq!(report.added[0].phone, "+1234567890");
    }

    #[test]
    fn test_single_token_lines_are_skipped_with_line_numbers() {
        let report = parse_contacts("Ana 111\n\nlonely\n   \nBruno Silva 222\n5551234\n");
        let names: Vec<&str> = report.added.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno Silva"]);
        assert_eq!(
            report.skipped,
            vec![
                ImportDiagnostic {
                    line_number: 3,
                    content: "lonely".to_string()
                },
                ImportDiagnostic {
                    line_number: 6,
                    content: "5551234".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_load_from_text_appends_and_reports_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Ana 111").unwrap();
        writeln!(file, "broken").unwrap();
        writeln!(file, "Ana 111").unwrap();

        let recorder = Arc::new(RowRecorder::default());
        let mut store = ContactStore::new(recorder.clone());
        store.add_manual("Zed", "000").unwrap();

        let report = store.load_from_text(file.path()).unwrap();
        assert_eq!(report.added.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(store.len(), 3);

        let rows = recorder.rows.lock().unwrap();
        assert_eq!(
            *rows,
            vec![
                (0, "Zed".to_string()),
                (1, "Ana".to_string()),
                (2, "Ana".to_string())
            ]
        );
    }

    #[test]
    fn test_load_from_text_tolerates_non_utf8_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Jo\xe3o Silva 111\nAna 222\n").unwrap();

        let mut store = ContactStore::new(Arc::new(RowRecorder::default()));
        let report = store.load_from_text(file.path()).unwrap();

        assert!(report.skipped.is_empty());
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].name, "Jo\u{FFFD}o Silva");
        assert_eq!(store.all()[0].phone, "111");
        assert_eq!(store.all()[1].name, "Ana");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let mut store = ContactStore::new(Arc::new(RowRecorder::default()));
        let err = store
            .load_from_text("/definitely/not/here/contacts.txt")
            .unwrap_err();
        assert!(matches!(err, SenderError::ContactsFileError { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_manual_trims_and_rejects_blank_fields() {
        let recorder = Arc::new(RowRecorder::default());
        let mut store = ContactStore::new(recorder.clone());

        let contact = store.add_manual("  Ana Maria ", " 555 ").unwrap();
        assert_eq!(contact.name, "Ana Maria");
        assert_eq!(contact.phone, "555");

        assert!(matches!(
            store.add_manual("   ", "555"),
            Err(SenderError::ValidationError { .. })
        ));
        assert!(store.add_manual("Ana", "").is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(recorder.rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_record_outcomes_updates_matching_rows() {
        let mut store = ContactStore::new(Arc::new(RowRecorder::default()));
        store.add_manual("Ana", "1").unwrap();
        store.add_manual("Bia", "2").unwrap();

        let outcomes = vec![SendOutcome {
            position: 1,
            contact: store.all()[1].clone(),
            status: ContactStatus::Failed,
            error: Some("element not found".to_string()),
        }];
        store.record_outcomes(&outcomes);

        assert_eq!(store.all()[0].status, ContactStatus::Pending);
        assert_eq!(store.all()[1].status, ContactStatus::Failed);
        assert_eq!(store.count_with_status(ContactStatus::Failed), 1);
    }
}
