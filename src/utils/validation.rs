use crate::utils::error::{Result, SenderError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SenderError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SenderError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses the pacing interval exactly as typed by the user.
///
/// Surrounding whitespace is ignored; anything else that is not a
/// non-negative integer is rejected.
pub fn parse_interval_seconds(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SenderError::BadInterval {
            value: raw.to_string(),
            reason: "is empty".to_string(),
        });
    }

    trimmed.parse::<u64>().map_err(|_| SenderError::BadInterval {
        value: raw.to_string(),
        reason: "is not a non-negative integer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("transport.webdriver_url", "http://localhost:9515").is_ok());
        assert!(validate_url("transport.base_url", "https://web.whatsapp.com").is_ok());
        assert!(validate_url("transport.base_url", "").is_err());
        assert!(validate_url("transport.base_url", "invalid-url").is_err());
        assert!(validate_url("transport.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "Ana").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }

    #[test]
    fn test_parse_interval_seconds() {
        assert_eq!(parse_interval_seconds("5").unwrap(), 5);
        assert_eq!(parse_interval_seconds(" 0 ").unwrap(), 0);
        assert!(matches!(
            parse_interval_seconds(""),
            Err(SenderError::BadInterval { .. })
        ));
        assert!(parse_interval_seconds("-3").is_err());
        assert!(parse_interval_seconds("2.5").is_err());
        assert!(parse_interval_seconds("ten").is_err());
    }
}
