pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SenderConfig;

pub use adapters::console::{ConsoleReporter, StdinConfirmer};
pub use adapters::webdriver::{WebDriverSettings, WebDriverTransport};
pub use core::{
    contact_store::ContactStore,
    orchestrator::{BatchContext, SendOrchestrator},
};
pub use utils::error::{Result, SenderError};
