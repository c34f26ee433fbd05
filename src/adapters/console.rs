use crate::core::{BatchEventKind, ConfirmationGate, Contact, ContactStatus, StatusReporter};
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Terminal rendition of the contact table.
///
/// Rows are kept in display order so the whole table can be printed at the
/// end of a run.
#[derive(Default)]
pub struct ConsoleReporter {
    rows: Mutex<Vec<Contact>>,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keeps the table; prints nothing per event.
    pub fn quiet() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            quiet: true,
        }
    }

    pub fn rows(&self) -> Vec<Contact> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn render_table(&self) -> String {
        render_table(&self.rows())
    }
}

impl StatusReporter for ConsoleReporter {
    fn on_new_contact(&self, position: usize, contact: &Contact) {
        tracing::debug!("Row {}: {} ({}) {}", position, contact.name, contact.phone, contact.status);
        if let Ok(mut rows) = self.rows.lock() {
            if position >= rows.len() {
                rows.resize(position + 1, contact.clone());
            }
            rows[position] = contact.clone();
        }
    }

    fn on_status_changed(&self, position: usize, contact: &Contact, status: ContactStatus) {
        if let Ok(mut rows) = self.rows.lock() {
            if let Some(row) = rows.get_mut(position) {
                row.status = status;
            }
        }
        if !self.quiet {
            let icon = match status {
                ContactStatus::Sent => "✅",
                ContactStatus::Failed => "❌",
                ContactStatus::Pending => "⏳",
            };
            println!("{} {} ({}): {}", icon, contact.name, contact.phone, status);
        }
    }

    fn on_batch_event(&self, kind: BatchEventKind, detail: &str) {
        if self.quiet {
            return;
        }
        match kind {
            BatchEventKind::Confirm => println!("📨 {}", detail),
            BatchEventKind::Info => println!("ℹ️  {}", detail),
            BatchEventKind::Warning => eprintln!("⚠️  {}", detail),
            BatchEventKind::Error => eprintln!("❌ {}", detail),
        }
    }
}

pub fn render_table(rows: &[Contact]) -> String {
    const HEADERS: [&str; 3] = ["Name", "Phone Number", "Status"];

    let mut widths = HEADERS.map(str::len);
    for row in rows {
        widths[0] = widths[0].max(row.name.chars().count());
        widths[1] = widths[1].max(row.phone.chars().count());
        widths[2] = widths[2].max(row.status.to_string().len());
    }

    let mut out = format!(
        "{:<w0$}  {:<w1$}  {:<w2$}\n",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {:<w2$}\n",
            row.name,
            row.phone,
            row.status.to_string(),
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        ));
    }
    out
}

/// Yes/no prompt on stdin. `assume_yes` answers yes without asking.
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl ConfirmationGate for StdinConfirmer {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            tracing::info!("{} (auto-confirmed)", question);
            return true;
        }

        print!("{} [y/N] ", question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim")
}
