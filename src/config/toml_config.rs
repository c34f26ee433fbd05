use crate::adapters::profile::default_profile_dir;
use crate::adapters::webdriver::{
    LoadWait, WebDriverSettings, DEFAULT_BASE_URL, DEFAULT_INPUT_XPATH, DEFAULT_WEBDRIVER_URL,
};
use crate::utils::error::{Result, SenderError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderConfig {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    pub webdriver_url: Option<String>,
    pub base_url: Option<String>,
    pub profile_dir: Option<String>,
    pub profile_name: Option<String>,
    pub start_maximized: Option<bool>,
    pub input_xpath: Option<String>,
    pub settle_delay_seconds: Option<u64>,
    pub submit_delay_seconds: Option<u64>,
    /// "fixed" (default) or "poll"
    pub wait_strategy: Option<String>,
    pub poll_timeout_seconds: Option<u64>,
    pub poll_interval_millis: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub interval_seconds: Option<u64>,
    pub message: Option<String>,
    pub message_file: Option<String>,
    pub contacts_files: Option<Vec<String>>,
    pub auto_confirm: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    /// "compact" (default) or "json"
    pub format: Option<String>,
}

const WAIT_STRATEGIES: [&str; 2] = ["fixed", "poll"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl SenderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SenderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SenderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SenderError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let transport = &self.transport;
        if let Some(url) = &transport.webdriver_url {
            validate_url("transport.webdriver_url", url)?;
        }
        if let Some(url) = &transport.base_url {
            validate_url("transport.base_url", url)?;
        }
        if let Some(dir) = &transport.profile_dir {
            validate_path("transport.profile_dir", dir)?;
        }
        if let Some(name) = &transport.profile_name {
            validate_non_empty_string("transport.profile_name", name)?;
        }
        if let Some(xpath) = &transport.input_xpath {
            validate_non_empty_string("transport.input_xpath", xpath)?;
        }
        if let Some(settle) = transport.settle_delay_seconds {
            validate_range("transport.settle_delay_seconds", settle, 0, 300)?;
        }
        if let Some(submit) = transport.submit_delay_seconds {
            validate_range("transport.submit_delay_seconds", submit, 0, 60)?;
        }
        if let Some(strategy) = &transport.wait_strategy {
            if !WAIT_STRATEGIES.contains(&strategy.as_str()) {
                return Err(SenderError::InvalidConfigValueError {
                    field: "transport.wait_strategy".to_string(),
                    value: strategy.clone(),
                    reason: format!("Valid strategies: {}", WAIT_STRATEGIES.join(", ")),
                });
            }
        }
        if let Some(timeout) = transport.poll_timeout_seconds {
            validate_range("transport.poll_timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(interval) = transport.poll_interval_millis {
            validate_range("transport.poll_interval_millis", interval, 10, 10_000)?;
        }

        if let Some(file) = &self.batch.message_file {
            validate_path("batch.message_file", file)?;
        }
        for file in self.batch.contacts_files.iter().flatten() {
            validate_path("batch.contacts_files", file)?;
        }

        if let Some(format) = &self.logging.format {
            if !LOG_FORMATS.contains(&format.as_str()) {
                return Err(SenderError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.clone(),
                    reason: format!("Valid formats: {}", LOG_FORMATS.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.transport
            .profile_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_profile_dir)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.format.as_deref() == Some("json")
    }

    pub fn webdriver_settings(&self) -> WebDriverSettings {
        let t = &self.transport;
        let load_wait = match t.wait_strategy.as_deref() {
            Some("poll") => LoadWait::PollForInput {
                timeout: Duration::from_secs(t.poll_timeout_seconds.unwrap_or(30)),
                poll_interval: Duration::from_millis(t.poll_interval_millis.unwrap_or(500)),
            },
            _ => LoadWait::FixedDelay,
        };

        WebDriverSettings {
            webdriver_url: t
                .webdriver_url
                .clone()
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            base_url: t
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            profile_dir: self.profile_dir(),
            profile_name: t.profile_name.clone().unwrap_or_else(|| "Default".to_string()),
            start_maximized: t.start_maximized.unwrap_or(true),
            input_xpath: t
                .input_xpath
                .clone()
                .unwrap_or_else(|| DEFAULT_INPUT_XPATH.to_string()),
            settle_delay: Duration::from_secs(t.settle_delay_seconds.unwrap_or(10)),
            submit_delay: Duration::from_secs(t.submit_delay_seconds.unwrap_or(2)),
            load_wait,
        }
    }
}

impl Validate for SenderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
