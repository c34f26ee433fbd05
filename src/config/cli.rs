use crate::config::SenderConfig;
use crate::core::template::{insert_token, INSERTABLE_TOKENS};
use crate::utils::error::{Result, SenderError};
use crate::utils::validation::{validate_url, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "bulk-sender")]
#[command(about = "Send personalized messages to a contact list through WhatsApp Web")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Log process CPU/memory around each batch")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the messaging client and send the message to every contact
    Send(SendArgs),
    /// Render every personalized message and chat link without sending
    Preview(PreviewArgs),
    /// Import contacts files and report skipped lines
    Check(ContactArgs),
    /// Open the messaging client so the profile can be logged in
    Open(TransportArgs),
    /// Print the browser profile directory that will be used
    ProfileDir,
    /// List the tokens that can be inserted into a message
    Tokens,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactArgs {
    /// Contacts file, one "Name Phone" per line (repeatable)
    #[arg(long = "contacts", value_name = "FILE")]
    pub contacts_files: Vec<String>,

    /// Manually added contact (repeatable)
    #[arg(long = "add", value_name = "NAME:PHONE")]
    pub manual: Vec<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct MessageArgs {
    /// Message template; [firstname] is replaced by each contact's name
    #[arg(short, long)]
    pub message: Option<String>,

    #[arg(long, value_name = "FILE", conflicts_with = "message")]
    pub message_file: Option<String>,

    /// Token appended to the end of the message (repeatable)
    #[arg(long = "append-token", value_name = "TOKEN")]
    pub append_tokens: Vec<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TransportArgs {
    #[arg(long)]
    pub webdriver_url: Option<String>,

    #[arg(long)]
    pub profile_dir: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub contacts: ContactArgs,

    #[command(flatten)]
    pub message: MessageArgs,

    #[command(flatten)]
    pub transport: TransportArgs,

    /// Seconds to wait after each contact
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub contacts: ContactArgs,

    #[command(flatten)]
    pub message: MessageArgs,
}

impl ContactArgs {
    /// Files from the command line, or the configured ones when none were given.
    pub fn files_or(&self, config: &SenderConfig) -> Vec<String> {
        if self.contacts_files.is_empty() {
            config.batch.contacts_files.clone().unwrap_or_default()
        } else {
            self.contacts_files.clone()
        }
    }
}

impl MessageArgs {
    /// Command-line message first, then the configured one; tokens are
    /// appended in the order given.
    pub fn resolve_template(&self, config: &SenderConfig) -> Result<String> {
        let base = if let Some(message) = &self.message {
            message.clone()
        } else if let Some(file) = self.message_file.as_ref().or(config.batch.message_file.as_ref()) {
            std::fs::read_to_string(file).map_err(|e| SenderError::ConfigError {
                message: format!("cannot read message file '{}': {}", file, e),
            })?
        } else {
            config.batch.message.clone().unwrap_or_default()
        };

        let template = self
            .append_tokens
            .iter()
            .fold(base.trim().to_string(), |acc, token| insert_token(&acc, token));
        Ok(template)
    }
}

impl TransportArgs {
    pub fn apply(&self, config: &mut SenderConfig) {
        if let Some(url) = &self.webdriver_url {
            config.transport.webdriver_url = Some(url.clone());
        }
        if let Some(dir) = &self.profile_dir {
            config.transport.profile_dir = Some(dir.clone());
        }
    }
}

impl SendArgs {
    /// The interval exactly as typed; parsed by the batch itself.
    pub fn raw_interval(&self, config: &SenderConfig) -> String {
        self.interval
            .clone()
            .or_else(|| config.batch.interval_seconds.map(|s| s.to_string()))
            .unwrap_or_default()
    }

    pub fn auto_confirm(&self, config: &SenderConfig) -> bool {
        self.yes || config.batch.auto_confirm.unwrap_or(false)
    }
}

impl Validate for MessageArgs {
    fn validate(&self) -> Result<()> {
        for token in &self.append_tokens {
            if !INSERTABLE_TOKENS.contains(&token.as_str()) {
                return Err(SenderError::InvalidConfigValueError {
                    field: "append-token".to_string(),
                    value: token.clone(),
                    reason: format!("Known tokens: {}", INSERTABLE_TOKENS.join(", ")),
                });
            }
        }
        Ok(())
    }
}

impl Validate for TransportArgs {
    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.webdriver_url {
            validate_url("webdriver-url", url)?;
        }
        Ok(())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Send(args) => {
                args.message.validate()?;
                args.transport.validate()
            }
            Command::Preview(args) => args.message.validate(),
            Command::Open(args) => args.validate(),
            Command::Check(_) | Command::ProfileDir | Command::Tokens => Ok(()),
        }
    }
}
