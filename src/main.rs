use bulk_sender::adapters::console::render_table;
use bulk_sender::app::interrupt::{watch_interrupts, InterruptOutcome, FORCE_QUIT_EXIT_CODE};
use bulk_sender::app::workflow::{import_contacts, preview_messages, send_batch, transport_needed};
use bulk_sender::config::cli::{ContactArgs, PreviewArgs, SendArgs, TransportArgs};
use bulk_sender::config::Command;
use bulk_sender::core::template::INSERTABLE_TOKENS;
use bulk_sender::core::{BatchOutcome, ContactStatus, MessagingTransport};
use bulk_sender::utils::error::ErrorSeverity;
use bulk_sender::utils::logger::{self, LogFormat};
use bulk_sender::utils::validation::Validate;
use bulk_sender::{
    CliConfig, ConsoleReporter, ContactStore, SendOrchestrator, SenderConfig, SenderError,
    StdinConfirmer, WebDriverTransport,
};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match &cli.config {
        Some(path) => match SenderConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => SenderConfig::default(),
    };

    let verbose = cli.verbose || file_config.logging.verbose.unwrap_or(false);
    logger::init_logger(
        LogFormat::from_flag(cli.json_logs || file_config.json_logs()),
        verbose,
    );

    tracing::info!("Starting bulk-sender");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = file_config.validate().and_then(|_| cli.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match cli.command.clone() {
        Command::Send(args) => run_send(args, file_config, cli.monitor).await,
        Command::Preview(args) => run_preview(args, &file_config),
        Command::Check(args) => run_check(args, &file_config),
        Command::Open(args) => run_open(args, file_config).await,
        Command::ProfileDir => {
            println!("{}", file_config.profile_dir().display());
            Ok(())
        }
        Command::Tokens => {
            for token in INSERTABLE_TOKENS {
                println!("{}", token);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ bulk-sender failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

/// Forwards every Ctrl-C to the watcher; the second one exits the process.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    tokio::spawn(async move {
        if watch_interrupts(rx, cancel).await == InterruptOutcome::ForceQuit {
            std::process::exit(FORCE_QUIT_EXIT_CODE);
        }
    });
}

fn load_store(
    args: &ContactArgs,
    config: &SenderConfig,
    reporter: Arc<ConsoleReporter>,
) -> Result<ContactStore, SenderError> {
    let mut store = ContactStore::new(reporter.clone());
    import_contacts(
        &mut store,
        &args.files_or(config),
        &args.manual,
        reporter.as_ref(),
    )?;
    Ok(store)
}

async fn run_send(args: SendArgs, mut config: SenderConfig, monitor: bool) -> Result<(), SenderError> {
    args.transport.apply(&mut config);

    let reporter = Arc::new(ConsoleReporter::new());
    let mut store = load_store(&args.contacts, &config, reporter.clone())?;
    let template = args.message.resolve_template(&config)?;
    let interval = args.raw_interval(&config);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let orchestrator = SendOrchestrator::new(
        reporter.clone(),
        Arc::new(StdinConfirmer::new(args.auto_confirm(&config))),
    )
    .with_cancellation(cancel)
    .with_monitoring(monitor);

    let mut transport = WebDriverTransport::new(config.webdriver_settings());
    if transport_needed(&store, &interval)? {
        tracing::info!(
            "🌐 Opening {} with profile {}",
            transport.settings().base_url,
            transport.settings().profile_dir.display()
        );
        transport.open().await?;
    }

    let outcome = send_batch(&mut store, &orchestrator, &mut transport, template, interval).await;

    if transport.session_id().is_some() {
        if let Err(e) = transport.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }
    }

    match outcome? {
        BatchOutcome::Cancelled => println!("Batch cancelled, nothing was sent."),
        BatchOutcome::Completed(report) => {
            println!();
            print!("{}", render_table(store.all()));
            println!(
                "\n✅ {} sent, ❌ {} failed, ⏳ {} pending ({}, {:?})",
                store.count_with_status(ContactStatus::Sent),
                store.count_with_status(ContactStatus::Failed),
                store.count_with_status(ContactStatus::Pending),
                report.batch_id,
                report.duration
            );
        }
    }

    Ok(())
}

fn run_preview(args: PreviewArgs, config: &SenderConfig) -> Result<(), SenderError> {
    let reporter = Arc::new(ConsoleReporter::new());
    let store = load_store(&args.contacts, config, reporter)?;
    let template = args.message.resolve_template(config)?;
    let base_url = config.webdriver_settings().base_url;

    for line in preview_messages(store.all(), &template, &base_url)? {
        println!("{} ({})", line.contact.name, line.contact.phone);
        println!("  {}", line.message);
        println!("  {}", line.link);
    }
    println!("\n{} messages rendered", store.len());
    Ok(())
}

fn run_check(args: ContactArgs, config: &SenderConfig) -> Result<(), SenderError> {
    let reporter = Arc::new(ConsoleReporter::new());
    let store = load_store(&args, config, reporter)?;
    print!("{}", render_table(store.all()));
    println!("\n{} contacts ready", store.len());
    Ok(())
}

async fn run_open(args: TransportArgs, mut config: SenderConfig) -> Result<(), SenderError> {
    args.apply(&mut config);
    let mut transport = WebDriverTransport::new(config.webdriver_settings());
    transport.open().await?;

    println!(
        "The messaging client is opening. If you're already logged in you'll be connected automatically; otherwise scan the QR code."
    );
    println!("Press Enter when done to close the browser.");

    let waited = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await;
    if let Ok(Err(e)) = waited {
        tracing::warn!("Could not read from stdin: {}", e);
    }

    transport.close().await
}
