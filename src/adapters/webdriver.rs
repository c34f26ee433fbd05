//! Messaging transport driving Chrome through a W3C WebDriver endpoint
//! (chromedriver or compatible).

use crate::adapters::profile::default_profile_dir;
use crate::core::{MessagingTransport, SessionState};
use crate::utils::error::{Result, SenderError};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_BASE_URL: &str = "https://web.whatsapp.com";
pub const DEFAULT_INPUT_XPATH: &str = r#"//div[@contenteditable="true"][@data-tab="10"]"#;

// W3C WebDriver key code for Enter and the element reference key.
const ENTER_KEY: &str = "\u{E007}";
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How to wait for the chat page after navigating to a deep link.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWait {
    /// Sleep for `settle_delay`.
    FixedDelay,
    /// Poll for the message input until it appears or `timeout` elapses.
    PollForInput {
        timeout: Duration,
        poll_interval: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct WebDriverSettings {
    pub webdriver_url: String,
    pub base_url: String,
    pub profile_dir: PathBuf,
    pub profile_name: String,
    pub start_maximized: bool,
    pub input_xpath: String,
    pub settle_delay: Duration,
    pub submit_delay: Duration,
    pub load_wait: LoadWait,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            profile_dir: default_profile_dir(),
            profile_name: "Default".to_string(),
            start_maximized: true,
            input_xpath: DEFAULT_INPUT_XPATH.to_string(),
            settle_delay: Duration::from_secs(10),
            submit_delay: Duration::from_secs(2),
            load_wait: LoadWait::FixedDelay,
        }
    }
}

/// Builds `<base>/send?phone=<phone>&text=<message>` with both values
/// percent-encoded (spaces as `%20`, the way the browser sends typed text).
pub fn chat_link(base_url: &str, phone: &str, message: &str) -> Result<Url> {
    let raw = format!(
        "{}/send?phone={}&text={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(phone),
        urlencoding::encode(message)
    );
    Url::parse(&raw).map_err(|e| SenderError::InvalidConfigValueError {
        field: "transport.base_url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}

/// Polls `predicate` until it returns true or `timeout` elapses.
/// Returns whether the predicate was satisfied.
pub async fn wait_until<F, Fut>(mut predicate: F, timeout: Duration, poll_interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if predicate().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

pub struct WebDriverTransport {
    client: Client,
    settings: WebDriverSettings,
    session_id: Option<String>,
    state: SessionState,
}

impl WebDriverTransport {
    pub fn new(settings: WebDriverSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
            session_id: None,
            state: SessionState::Unopened,
        }
    }

    pub fn settings(&self) -> &WebDriverSettings {
        &self.settings
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn browser_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--user-data-dir={}", self.settings.profile_dir.display()),
            format!("--profile-directory={}", self.settings.profile_name),
        ];
        if self.settings.start_maximized {
            args.push("--start-maximized".to_string());
        }
        args
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!(
            "{}/{}",
            self.settings.webdriver_url.trim_end_matches('/'),
            path
        );
        tracing::debug!("WebDriver {} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let mut payload: Value = response.json().await?;

        if !status.is_success() {
            let error = payload["value"]["error"].as_str().unwrap_or("unknown error");
            let message = payload["value"]["message"].as_str().unwrap_or("");
            return Err(SenderError::transport(format!(
                "{} ({}): {}",
                error, status, message
            )));
        }

        Ok(payload.get_mut("value").map(Value::take).unwrap_or(Value::Null))
    }

    fn session_path(&self, suffix: &str) -> Result<String> {
        let id = self
            .session_id
            .as_deref()
            .ok_or_else(|| SenderError::TransportNotReady {
                message: "no browser session".to_string(),
            })?;
        Ok(format!("session/{}/{}", id, suffix))
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let path = self.session_path("url")?;
        self.command(Method::POST, &path, Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    async fn find_input(&self) -> Result<String> {
        let path = self.session_path("element")?;
        let value = self
            .command(
                Method::POST,
                &path,
                Some(json!({ "using": "xpath", "value": self.settings.input_xpath })),
            )
            .await?;

        value[ELEMENT_KEY]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SenderError::transport("element reference missing from response"))
    }

    async fn press_enter(&self, element_id: &str) -> Result<()> {
        let path = self.session_path(&format!("element/{}/value", element_id))?;
        self.command(Method::POST, &path, Some(json!({ "text": ENTER_KEY })))
            .await?;
        Ok(())
    }

    async fn wait_for_chat(&self) {
        match &self.settings.load_wait {
            LoadWait::FixedDelay => tokio::time::sleep(self.settings.settle_delay).await,
            LoadWait::PollForInput {
                timeout,
                poll_interval,
            } => {
                let this = self;
                let ready = wait_until(
                    || async move { this.find_input().await.is_ok() },
                    *timeout,
                    *poll_interval,
                )
                .await;
                if !ready {
                    tracing::debug!("Message input not found within {:?}", timeout);
                }
            }
        }
    }

    async fn send_via_chat(&self, phone: &str, message: &str) -> Result<()> {
        let link = chat_link(&self.settings.base_url, phone, message)?;
        self.navigate(link.as_str()).await?;
        self.wait_for_chat().await;

        let element_id = self.find_input().await?;
        self.press_enter(&element_id).await?;
        tokio::time::sleep(self.settings.submit_delay).await;
        Ok(())
    }
}

#[async_trait]
impl MessagingTransport for WebDriverTransport {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn open(&mut self) -> Result<()> {
        if self.state == SessionState::Open {
            return Err(SenderError::transport("browser session is already open"));
        }

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": self.browser_args() }
                }
            }
        });

        let value = self
            .command(Method::POST, "session", Some(capabilities))
            .await
            .map_err(|e| SenderError::transport(format!("Failed to start browser: {}", e)))?;
        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| SenderError::transport("WebDriver returned no session id"))?
            .to_string();
        tracing::info!("🌐 Browser session {} started", session_id);
        self.session_id = Some(session_id);

        let base_url = self.settings.base_url.clone();
        if let Err(e) = self.navigate(&base_url).await {
            let _ = self.close().await;
            return Err(SenderError::transport(format!(
                "Failed to open {}: {}",
                base_url, e
            )));
        }

        self.state = SessionState::Open;
        Ok(())
    }

    async fn deliver(&mut self, phone: &str, message: &str) -> Result<()> {
        if self.state != SessionState::Open {
            return Err(SenderError::TransportNotReady {
                message: format!("session is {:?}", self.state),
            });
        }

        self.send_via_chat(phone, message)
            .await
            .map_err(|e| SenderError::delivery(phone, e.to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        let result = match self.session_id.take() {
            Some(id) => self
                .command(Method::DELETE, &format!("session/{}", id), None)
                .await
                .map(|_| tracing::info!("Browser session {} closed", id)),
            None => Ok(()),
        };
        if self.state == SessionState::Open {
            self.state = SessionState::Closed;
        }
        result
    }
}
