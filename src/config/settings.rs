//! Settings structures for Nexus-Search configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub primary: PrimarySettings,
    pub secondary: SecondarySettings,
    pub outgoing: OutgoingSettings,
    pub recorder: RecorderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            primary: PrimarySettings::default(),
            secondary: SecondarySettings::default(),
            outgoing: OutgoingSettings::default(),
            recorder: RecorderSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (NEXUS_* prefix, SERPAPI_KEY legacy)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("NEXUS_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("NEXUS_PRIMARY_API_KEY") {
            self.primary.api_key = Some(val);
        } else if let Ok(val) = std::env::var("SERPAPI_KEY") {
            self.primary.api_key = Some(val);
        }
        if let Ok(val) = std::env::var("NEXUS_LOG_PATH") {
            self.recorder.log_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("NEXUS_REPORT_DIR") {
            self.recorder.report_dir = PathBuf::from(val);
        }
    }

    /// Whether the primary backend is usable; derived from key presence
    pub fn primary_enabled(&self) -> bool {
        self.primary
            .api_key
            .as_ref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name displayed in logs and reports
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Nexus-Search".to_string(),
        }
    }
}

/// Primary (paid, paginated API) backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimarySettings {
    /// API key; its absence disables the backend entirely
    pub api_key: Option<String>,
    /// Search endpoint URL
    pub endpoint: String,
    /// Quota weight when both backends are configured
    pub weight: f64,
    /// Results requested per page
    pub page_size: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
    /// Total retry attempts before giving up on the backend
    pub max_attempts: u32,
    /// Cooldown after a 429 response, in seconds
    pub throttle_cooldown_secs: f64,
    /// Cooldown after a transport error, in seconds
    pub transient_cooldown_secs: f64,
    /// Pacing delay between successful page fetches, in seconds
    pub page_pacing_secs: f64,
}

impl Default for PrimarySettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://serpapi.com/search".to_string(),
            weight: 0.7,
            page_size: 10,
            timeout_secs: 15.0,
            max_attempts: 3,
            throttle_cooldown_secs: 5.0,
            transient_cooldown_secs: 2.0,
            page_pacing_secs: 1.0,
        }
    }
}

impl PrimarySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

/// Secondary (free, scraping) backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondarySettings {
    /// HTML search endpoint URL
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: f64,
    /// Pacing delay between processed result items, in seconds
    pub item_pacing_secs: f64,
}

impl Default for SecondarySettings {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            timeout_secs: 15.0,
            item_pacing_secs: 0.3,
        }
    }
}

impl SecondarySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 15.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Run recorder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// Append-only JSONL run log
    pub log_path: PathBuf,
    /// Directory for generated report files
    pub report_dir: PathBuf,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("nexus_search_logs.json"),
            report_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.general.debug);
        assert!(!settings.primary_enabled());
        assert_eq!(settings.primary.page_size, 10);
        assert_eq!(settings.primary.max_attempts, 3);
    }

    #[test]
    fn test_primary_enabled_follows_key() {
        let mut settings = Settings::default();
        assert!(!settings.primary_enabled());

        settings.primary.api_key = Some(String::new());
        assert!(!settings.primary_enabled());

        settings.primary.api_key = Some("k".to_string());
        assert!(settings.primary_enabled());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
primary:
  api_key: "secret"
  page_pacing_secs: 0.0
recorder:
  log_path: "/tmp/run.jsonl"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.primary_enabled());
        assert_eq!(settings.primary.page_pacing_secs, 0.0);
        assert_eq!(settings.recorder.log_path, PathBuf::from("/tmp/run.jsonl"));
        // Untouched sections keep their defaults
        assert_eq!(settings.secondary.item_pacing_secs, 0.3);
    }
}
