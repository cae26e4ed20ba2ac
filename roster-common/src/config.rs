//! Configuration loading and config file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ROSTER_CONFIG`)
//! 3. Platform config directory (`<config_dir>/roster-enrich/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or unreadable config file is not an error: the compiled defaults
//! are used and the returned [`ConfigSource`] says why, so the caller can log
//! it once tracing is up. A config file that reads but does not parse is
//! reported as [`Error::Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ROSTER_CONFIG";

/// Application directory name under the platform config directory
const APP_DIR: &str = "roster-enrich";

/// Membership Authority (JSON player lookup) default endpoint
pub const DEFAULT_MEMBERSHIP_URL: &str = "https://admin.aicf.in/api/players";

/// Club Authority (HTML registration listing) default endpoint
pub const DEFAULT_CLUB_URL: &str =
    "https://mcachess.in/Tournament_Registration/fetch_registrarion_type_web.php";

/// Browser user-agent presented to the Club Authority's bot filter
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Complete TOML configuration
///
/// Every section is optional in the file; absent keys take compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub membership: MembershipConfig,
    pub club: ClubConfig,
    pub http: HttpConfig,
    pub politeness: PolitenessConfig,
    pub logging: LoggingConfig,
}

/// Membership Authority settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    pub base_url: String,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MEMBERSHIP_URL.to_string(),
        }
    }
}

/// Club Authority settings, including the identifier shape it accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    pub base_url: String,
    /// National IDs shorter than this are rejected before any request
    pub id_min_len: usize,
    /// National IDs must contain this regional code to be in scope
    pub region_code: String,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLUB_URL.to_string(),
            id_min_len: 5,
            region_code: "MH".to_string(),
        }
    }
}

/// Outbound HTTP settings shared by both authorities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Token-bucket rate applied before every outbound request
    pub requests_per_second: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            requests_per_second: 2,
        }
    }
}

/// Inter-row politeness delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolitenessConfig {
    pub delay_ms: u64,
}

impl Default for PolitenessConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// File named but absent; compiled defaults in use
    Missing(PathBuf),
    /// File present but could not be read; compiled defaults in use
    Unreadable { path: PathBuf, reason: String },
    /// No file named anywhere
    Defaults,
}

impl ConfigSource {
    /// Log the outcome; call after the tracing subscriber is installed
    pub fn report(&self) {
        match self {
            ConfigSource::File(path) => info!("Configuration loaded from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            ),
            ConfigSource::Unreadable { path, reason } => warn!(
                "Config file {} could not be read ({}), using compiled defaults",
                path.display(),
                reason
            ),
            ConfigSource::Defaults => info!("No config file, using compiled defaults"),
        }
    }
}

impl TomlConfig {
    /// Resolve and load configuration without logging
    ///
    /// Degrades to defaults when the file is missing or unreadable.
    pub fn resolve(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let Some(path) = resolve_config_path(cli_arg) else {
            return Ok((Self::default(), ConfigSource::Defaults));
        };
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(path)));
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config = parse_toml_config(&content, &path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Err(e) => Ok((
                Self::default(),
                ConfigSource::Unreadable {
                    path,
                    reason: e.to_string(),
                },
            )),
        }
    }

    /// [`TomlConfig::resolve`] and log where the configuration came from
    pub fn load(cli_arg: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::resolve(cli_arg)?;
        source.report();
        Ok(config)
    }

    /// Reject values that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        if self.membership.base_url.trim().is_empty() {
            return Err(Error::Config("membership.base_url is empty".to_string()));
        }
        if self.club.base_url.trim().is_empty() {
            return Err(Error::Config("club.base_url is empty".to_string()));
        }
        if self.http.requests_per_second == 0 {
            return Err(Error::Config(
                "http.requests_per_second must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pick the config file path by priority; `None` when no candidate applies
///
/// The platform default is only returned when the file exists there, while
/// explicit paths (CLI, environment) are returned as given so a typo is
/// reported instead of silently ignored.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// `<config_dir>/roster-enrich/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content, path)
}

fn parse_toml_config(content: &str, path: &Path) -> Result<TomlConfig> {
    toml::from_str(content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [politeness]
            delay_ms = 250

            [club]
            region_code = "KA"
            "#,
        )
        .unwrap();

        assert_eq!(config.politeness.delay_ms, 250);
        assert_eq!(config.club.region_code, "KA");
        assert_eq!(config.club.id_min_len, 5);
        assert_eq!(config.membership.base_url, DEFAULT_MEMBERSHIP_URL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut config = TomlConfig::default();
        config.http.requests_per_second = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(TomlConfig::default().validate().is_ok());
    }
}
