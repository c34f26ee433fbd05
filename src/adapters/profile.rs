//! Location of the browser profile that already holds the messaging login.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// Chrome's user-data directory for `platform`, or `None` when the OS
/// convention cannot be applied.
///
/// On macOS the Application Support directory is only used when it exists;
/// otherwise the Linux layout under `~/.config` is tried.
pub fn chrome_profile_dir(
    platform: Platform,
    home: Option<&Path>,
    local_data: Option<&Path>,
) -> Option<PathBuf> {
    match platform {
        Platform::Windows => local_data.map(|dir| dir.join("Google").join("Chrome").join("User Data")),
        Platform::MacOs | Platform::Linux => {
            let home = home?;
            let mac = home
                .join("Library")
                .join("Application Support")
                .join("Google")
                .join("Chrome");
            if platform == Platform::MacOs && mac.exists() {
                Some(mac)
            } else {
                Some(home.join(".config").join("google-chrome"))
            }
        }
        Platform::Other => None,
    }
}

/// Resolves the profile directory for the running OS, falling back to
/// `./chrome_profile` next to the working directory.
pub fn default_profile_dir() -> PathBuf {
    let home = dirs::home_dir();
    let local_data = dirs::data_local_dir();

    chrome_profile_dir(Platform::current(), home.as_deref(), local_data.as_deref())
        .unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("chrome_profile")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_windows_uses_local_app_data() {
        let dir = chrome_profile_dir(
            Platform::Windows,
            None,
            Some(Path::new("C:/Users/ana/AppData/Local")),
        )
        .unwrap();
        assert!(dir.ends_with("Google/Chrome/User Data"));
    }

    #[test]
    fn test_linux_uses_config_dir() {
        let dir = chrome_profile_dir(Platform::Linux, Some(Path::new("/home/ana")), None).unwrap();
        assert_eq!(dir, PathBuf::from("/home/ana/.config/google-chrome"));
    }

    #[test]
    fn test_macos_prefers_existing_application_support() {
        let home = TempDir::new().unwrap();
        let fallback = chrome_profile_dir(Platform::MacOs, Some(home.path()), None).unwrap();
        assert_eq!(fallback, home.path().join(".config").join("google-chrome"));

        let mac = home
            .path()
            .join("Library/Application Support/Google/Chrome");
        std::fs::create_dir_all(&mac).unwrap();
        let resolved = chrome_profile_dir(Platform::MacOs, Some(home.path()), None).unwrap();
        assert_eq!(resolved, mac);
    }

    #[test]
    fn test_unknown_platform_has_no_convention() {
        assert!(chrome_profile_dir(Platform::Other, Some(Path::new("/home/ana")), None).is_none());
    }
}
