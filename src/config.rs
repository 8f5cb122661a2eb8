use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Published CSV export of the workplace survey sheet.
pub const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/1ethwOtyt9_KpSkvF7zAaMUW99W1PoKp6onsIMWQ_IhU/export?format=csv";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "perma-dashboard.json";

pub const CONFIG_ENV: &str = "PERMA_DASHBOARD_CONFIG";
pub const SOURCE_ENV: &str = "PERMA_DATA_SOURCE";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Path or http(s) URL of the survey CSV.
    pub source: String,
    /// Seconds before the cached table is fetched again. Absent: once per
    /// session.
    pub cache_ttl_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            cache_ttl_secs: None,
        }
    }
}

impl DashboardConfig {
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the configuration for this process.
    ///
    /// Order: defaults, then the config file (`$PERMA_DASHBOARD_CONFIG`, or
    /// `./perma-dashboard.json` when it exists), then `$PERMA_DATA_SOURCE`,
    /// then `cli_source`.
    pub fn resolve(cli_source: Option<String>) -> Result<Self> {
        let file = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Some(PathBuf::from(p)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            }
        };
        let env_source = std::env::var(SOURCE_ENV).ok();
        Self::layered(file.as_deref(), env_source, cli_source)
    }

    fn layered(
        file: Option<&Path>,
        env_source: Option<String>,
        cli_source: Option<String>,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => {
                log::info!("Reading config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        let source = env_source
            .into_iter()
            .chain(cli_source)
            .filter(|s| !s.trim().is_empty())
            .last();
        if let Some(source) = source {
            config.source = source;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("perma_{name}_{}.json", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_point_at_published_sheet() {
        let config = DashboardConfig::layered(None, None, None).unwrap();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.cache_ttl(), None);
    }

    #[test]
    fn file_values_fill_missing_fields_with_defaults() {
        let path = temp_config("partial", r#"{ "cache_ttl_secs": 300 }"#);
        let config = DashboardConfig::layered(Some(&path), None, None).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn cli_source_beats_env_beats_file() {
        let path = temp_config("layers", r#"{ "source": "from-file.csv" }"#);

        let env_only =
            DashboardConfig::layered(Some(&path), Some("from-env.csv".into()), None).unwrap();
        let both = DashboardConfig::layered(
            Some(&path),
            Some("from-env.csv".into()),
            Some("from-cli.csv".into()),
        )
        .unwrap();
        let blank_cli =
            DashboardConfig::layered(Some(&path), None, Some("  ".into())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(env_only.source, "from-env.csv");
        assert_eq!(both.source, "from-cli.csv");
        assert_eq!(blank_cli.source, "from-file.csv");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_config("broken", "{ source: ");
        let result = DashboardConfig::layered(Some(&path), None, None);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
