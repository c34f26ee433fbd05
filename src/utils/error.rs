use thiserror::Error;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read contacts file '{path}': {source}")]
    ContactsFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Nothing to send: the contact list is empty")]
    NothingToSend,

    #[error("Transport not ready: {message}")]
    TransportNotReady { message: String },

    #[error("Bad configuration: interval '{value}' {reason}")]
    BadInterval { value: String, reason: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("Delivery to {phone} failed: {message}")]
    DeliveryError { phone: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Transport,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SenderError {
    pub fn validation(message: impl Into<String>) -> Self {
        SenderError::ValidationError {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SenderError::TransportError {
            message: message.into(),
        }
    }

    pub fn delivery(phone: &str, message: impl Into<String>) -> Self {
        SenderError::DeliveryError {
            phone: phone.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SenderError::ValidationError { .. }
            | SenderError::ContactsFileError { .. }
            | SenderError::NothingToSend => ErrorCategory::Input,
            SenderError::ConfigError { .. }
            | SenderError::MissingConfigError { .. }
            | SenderError::InvalidConfigValueError { .. }
            | SenderError::ConfigValidationError { .. }
            | SenderError::BadInterval { .. } => ErrorCategory::Configuration,
            SenderError::TransportNotReady { .. }
            | SenderError::TransportError { .. }
            | SenderError::HttpError(_) => ErrorCategory::Transport,
            SenderError::DeliveryError { .. } => ErrorCategory::Delivery,
            SenderError::IoError(_) | SenderError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SenderError::DeliveryError { .. } => ErrorSeverity::Low,
            SenderError::ValidationError { .. }
            | SenderError::NothingToSend
            | SenderError::BadInterval { .. } => ErrorSeverity::Medium,
            SenderError::ContactsFileError { .. }
            | SenderError::ConfigError { .. }
            | SenderError::MissingConfigError { .. }
            | SenderError::InvalidConfigValueError { .. }
            | SenderError::ConfigValidationError { .. }
            | SenderError::TransportNotReady { .. }
            | SenderError::TransportError { .. }
            | SenderError::HttpError(_) => ErrorSeverity::High,
            SenderError::IoError(_) | SenderError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the contacts file and manual entries; every contact needs a name and a phone",
            ErrorCategory::Configuration => "Check the command line options and the [batch]/[transport] tables of the config file",
            ErrorCategory::Transport => "Make sure chromedriver is running and the messaging client is logged in (run `bulk-sender open`)",
            ErrorCategory::Delivery => "Verify the phone number; the contact was marked Failed and can be sent again in a new batch",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SenderError::NothingToSend => "No contacts to send messages to.".to_string(),
            SenderError::TransportNotReady { .. } => {
                "The messaging client is not open. Please log in first.".to_string()
            }
            SenderError::BadInterval { value, .. } => {
                format!("The interval '{}' is not a whole number of seconds.", value)
            }
            SenderError::ContactsFileError { path, source } => {
                format!("Failed to load contacts from {}: {}", path, source)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_errors_are_low_severity() {
        let err = SenderError::delivery("555", "element not found");
        assert_eq!(err.category(), ErrorCategory::Delivery);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Delivery to 555 failed: element not found");
    }

    #[test]
    fn test_precondition_errors_are_user_facing() {
        assert_eq!(
            SenderError::NothingToSend.user_friendly_message(),
            "No contacts to send messages to."
        );
        let bad = SenderError::BadInterval {
            value: "abc".to_string(),
            reason: "is not a non-negative integer".to_string(),
        };
        assert_eq!(bad.category(), ErrorCategory::Configuration);
        assert!(bad.user_friendly_message().contains("abc"));
    }
}
