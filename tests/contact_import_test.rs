use bulk_sender::app::workflow::{import_contacts, preview_messages};
use bulk_sender::core::{BatchEventKind, Contact, ContactStatus, StatusReporter};
use bulk_sender::{ContactStore, SenderConfig, SenderError};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};
use tokio_test::{assert_err, assert_ok};

#[derive(Default)]
struct EventLog {
    rows: Mutex<Vec<(usize, String)>>,
    events: Mutex<Vec<(BatchEventKind, String)>>,
}

impl StatusReporter for EventLog {
    fn on_new_contact(&self, position: usize, contact: &Contact) {
        self.rows
            .lock()
            .unwrap()
            .push((position, contact.name.clone()));
    }

    fn on_status_changed(&self, _position: usize, _contact: &Contact, _status: ContactStatus) {}

    fn on_batch_event(&self, kind: BatchEventKind, detail: &str) {
        self.events.lock().unwrap().push((kind, detail.to_string()));
    }
}

fn contacts_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_files_then_manual_entries_keep_order() {
    let first = contacts_file("Ana Maria 111\nBruno 222\n");
    let second = contacts_file("Carla 333\n");
    let log = Arc::new(EventLog::default());
    let mut store = ContactStore::new(log.clone());

    let files = vec![
        first.path().to_string_lossy().to_string(),
        second.path().to_string_lossy().to_string(),
    ];
    let manual = vec!["Dora Lima:+55 11 444".to_string()];
    let skipped = assert_ok!(import_contacts(&mut store, &files, &manual, log.as_ref()));

    assert!(skipped.is_empty());
    let names: Vec<&str> = store.all().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Ana Maria", "Bruno", "Carla", "Dora Lima"]);
    assert_eq!(store.all()[3].phone, "+55 11 444");
    assert!(store.all().iter().all(|c| c.status == ContactStatus::Pending));

    let rows = log.rows.lock().unwrap().clone();
    assert_eq!(rows.iter().map(|(p, _)| *p).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_invalid_lines_are_reported_with_line_numbers() {
    let file = contacts_file("Ana 111\n\nsolo\nBia   Souza\t222\n");
    let log = Arc::new(EventLog::default());
    let mut store = ContactStore::new(log.clone());

    let skipped = assert_ok!(import_contacts(
        &mut store,
        &[file.path().to_string_lossy().to_string()],
        &[],
        log.as_ref(),
    ));

    assert_eq!(store.len(), 2);
    assert_eq!(store.all()[1].name, "Bia Souza");
    assert_eq!(store.all()[1].phone, "222");
    assert_eq!(
        skipped.iter().map(|d| d.line_number).collect::<Vec<_>>(),
        vec![3]
    );

    let events = log.events.lock().unwrap().clone();
    assert!(events
        .iter()
        .any(|(kind, detail)| *kind == BatchEventKind::Info && detail.contains("Loaded 2 contacts")));
    assert!(events
        .iter()
        .any(|(kind, detail)| *kind == BatchEventKind::Warning && detail.contains("line 3: solo")));
}

#[test]
fn test_missing_file_aborts_import() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt").to_string_lossy().to_string();
    let log = Arc::new(EventLog::default());
    let mut store = ContactStore::new(log.clone());

    let err = assert_err!(import_contacts(&mut store, &[missing], &[], log.as_ref()));

    assert!(matches!(err, SenderError::ContactsFileError { .. }));
    assert!(store.is_empty());
}

#[test]
fn test_bad_manual_entry_is_rejected() {
    let log = Arc::new(EventLog::default());
    let mut store = ContactStore::new(log.clone());

    let err = assert_err!(import_contacts(
        &mut store,
        &[],
        &["no separator".to_string()],
        log.as_ref(),
    ));
    assert!(matches!(err, SenderError::ValidationError { .. }));

    let err = assert_err!(import_contacts(
        &mut store,
        &[],
        &["Ana:   ".to_string()],
        log.as_ref(),
    ));
    assert!(matches!(err, SenderError::ValidationError { .. }));
    assert!(store.is_empty());
}

#[test]
fn test_bundled_example_files_load() {
    let root = env!("CARGO_MANIFEST_DIR");
    let config = assert_ok!(SenderConfig::from_file(format!(
        "{}/configs/sender-example.toml",
        root
    )));
    assert_ok!(config.validate_config());
    assert_eq!(config.batch.interval_seconds, Some(5));

    let log = Arc::new(EventLog::default());
    let mut store = ContactStore::new(log.clone());
    let skipped = assert_ok!(import_contacts(
        &mut store,
        &[format!("{}/configs/contacts-example.txt", root)],
        &[],
        log.as_ref(),
    ));
    assert_eq!(store.len(), 3);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].content, "invalid-line");

    let template = config.batch.message.clone().unwrap();
    let preview = assert_ok!(preview_messages(
        store.all(),
        &template,
        &config.webdriver_settings().base_url
    ));
    assert_eq!(preview[0].message, "[negrito]Oi Ana Maria, tudo bem?");
    assert!(preview[2].link.contains("phone=5511999990003"));
}
