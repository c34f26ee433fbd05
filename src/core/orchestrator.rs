use crate::core::pacing::FixedDelay;
use crate::core::template;
use crate::core::{
    BatchEventKind, BatchOutcome, BatchReport, ConfirmationGate, Contact, ContactStatus,
    MessagingTransport, PacingPolicy, SendOutcome, SessionState, StatusReporter,
};
use crate::utils::error::{Result, SenderError};
use crate::utils::monitor::BatchMonitor;
use crate::utils::validation::parse_interval_seconds;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Everything one batch needs, taken at start time.
///
/// `contacts` is a snapshot: rows added to the store afterwards are not part
/// of this batch. The transport is borrowed exclusively for the whole run.
pub struct BatchContext<'a> {
    pub contacts: Vec<Contact>,
    pub template: String,
    pub interval: String,
    pub transport: &'a mut dyn MessagingTransport,
}

/// Sequential send loop: render, deliver, record, pace.
pub struct SendOrchestrator {
    reporter: Arc<dyn StatusReporter>,
    gate: Arc<dyn ConfirmationGate>,
    pacing: Option<Arc<dyn PacingPolicy>>,
    cancel: CancellationToken,
    monitor: BatchMonitor,
}

impl SendOrchestrator {
    pub fn new(reporter: Arc<dyn StatusReporter>, gate: Arc<dyn ConfirmationGate>) -> Self {
        Self {
            reporter,
            gate,
            pacing: None,
            cancel: CancellationToken::new(),
            monitor: BatchMonitor::default(),
        }
    }

    /// Replaces the default fixed-interval pacing. The interval is still
    /// parsed and validated before the batch starts.
    pub fn with_pacing(mut self, pacing: Arc<dyn PacingPolicy>) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = BatchMonitor::new(enabled);
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run_batch(&self, ctx: BatchContext<'_>) -> Result<BatchOutcome> {
        let BatchContext {
            contacts,
            template,
            interval,
            transport,
        } = ctx;

        let interval_seconds = match self.check_preconditions(&contacts, &*transport, &interval) {
            Ok(seconds) => seconds,
            Err(e) => {
                tracing::error!("❌ Batch not started: {}", e);
                self.reporter
                    .on_batch_event(BatchEventKind::Error, &e.user_friendly_message());
                return Err(e);
            }
        };

        let question = format!("Send this message to {} contacts?", contacts.len());
        if !self.gate.confirm(&question) {
            tracing::info!("Batch declined at confirmation, nothing sent");
            return Ok(BatchOutcome::Cancelled);
        }
        // An interrupt while the prompt was open counts as "no".
        if self.cancel.is_cancelled() {
            tracing::info!("Batch interrupted at confirmation, nothing sent");
            return Ok(BatchOutcome::Cancelled);
        }

        let batch_id = format!("batch_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let pacing: Arc<dyn PacingPolicy> = match &self.pacing {
            Some(pacing) => pacing.clone(),
            None => Arc::new(FixedDelay::from_secs(interval_seconds)),
        };
        let total = contacts.len();

        self.reporter.on_batch_event(
            BatchEventKind::Confirm,
            &format!("Sending to {} contacts ({})", total, batch_id),
        );
        tracing::info!(
            "🚀 {} started: {} contacts, {}s interval",
            batch_id,
            total,
            interval_seconds
        );
        if self.monitor.is_enabled() {
            self.monitor.log_stats("Batch started");
        }

        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        let mut interrupted = false;

        for (position, contact) in contacts.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                interrupted = true;
                break;
            }

            let message = template::render(&template, &contact);
            tracing::debug!(
                "Sending to {} ({}): {}",
                contact.name,
                contact.phone,
                message
            );

            let outcome = match transport.deliver(&contact.phone, &message).await {
                Ok(()) => {
                    tracing::info!("✅ Sent to {} ({})", contact.name, contact.phone);
                    self.finish(position, contact, ContactStatus::Sent, None)
                }
                Err(e) => {
                    let detail = format!("Failed to send message to {}: {}", contact.name, e);
                    tracing::warn!("⚠️ {}", detail);
                    self.reporter.on_batch_event(BatchEventKind::Warning, &detail);
                    self.finish(position, contact, ContactStatus::Failed, Some(e.to_string()))
                }
            };
            outcomes.push(outcome);

            let delay = pacing.delay_after(position, total);
            if !delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }
        }

        let report = BatchReport {
            batch_id,
            outcomes,
            total,
            interrupted,
            duration: started.elapsed(),
        };

        if self.monitor.is_enabled() {
            self.monitor
                .log_batch_summary(&report.batch_id, report.outcomes.len());
        }

        if report.interrupted {
            let detail = format!(
                "Batch cancelled: {} sent, {} failed, {} not attempted",
                report.sent(),
                report.failed(),
                report.not_attempted()
            );
            tracing::warn!("🛑 {} {}", report.batch_id, detail);
            self.reporter.on_batch_event(BatchEventKind::Warning, &detail);
        } else {
            let detail = format!(
                "All messages processed: {} sent, {} failed",
                report.sent(),
                report.failed()
            );
            tracing::info!("🎉 {} {} in {:?}", report.batch_id, detail, report.duration);
            self.reporter.on_batch_event(BatchEventKind::Info, &detail);
        }

        Ok(BatchOutcome::Completed(report))
    }

    fn check_preconditions(
        &self,
        contacts: &[Contact],
        transport: &dyn MessagingTransport,
        interval: &str,
    ) -> Result<u64> {
        if contacts.is_empty() {
            return Err(SenderError::NothingToSend);
        }

        match transport.state() {
            SessionState::Open => {}
            state => {
                return Err(SenderError::TransportNotReady {
                    message: format!("session is {:?}", state),
                })
            }
        }

        parse_interval_seconds(interval)
    }

    fn finish(
        &self,
        position: usize,
        mut contact: Contact,
        status: ContactStatus,
        error: Option<String>,
    ) -> SendOutcome {
        contact.status = status;
        self.reporter.on_status_changed(position, &contact, status);
        SendOutcome {
            position,
            contact,
            status,
            error,
        }
    }
}
