//! Configuration loading and parsing.
//!
//! `quill.toml` is looked up in the working directory first, then under the
//! platform config directory (`<config>/quill/quill.toml`); the binary can
//! override the path with `--config`. Unknown fields are ignored and a
//! missing or malformed file falls back to defaults, so a bad config never
//! blocks startup.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct StatusConfig {
    /// How long status messages stay visible, in milliseconds.
    #[serde(default = "StatusConfig::default_message_ttl_ms")]
    pub message_ttl_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            message_ttl_ms: Self::default_message_ttl_ms(),
        }
    }
}

impl StatusConfig {
    const fn default_message_ttl_ms() -> u64 {
        4000
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Fallback tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LogConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.status.message_ttl_ms)
    }
}

/// Best-effort config path: working directory first, then the platform
/// config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("quill.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join("quill.toml");
    }
    PathBuf::from("quill.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<Config>(&content) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "parse_failed_using_defaults");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let cfg = load_from(Some(PathBuf::from("__no_such_quill_config__.toml"))).unwrap();
        assert_eq!(cfg.status.message_ttl_ms, 4000);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn parses_both_sections() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            tmp.path(),
            "[status]\nmessage_ttl_ms = 1500\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.message_ttl(), Duration::from_millis(1500));
        assert_eq!(cfg.log.level, "debug");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "[log]\nlevel = \"trace\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.status.message_ttl_ms, 4000);
        assert_eq!(cfg.log.level, "trace");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "status = { message_ttl_ms = }").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.status.message_ttl_ms, 4000);
    }

    #[test]
    fn unknown_fields_ignored() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "[future]\nshiny = true\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.status.message_ttl_ms, 4000);
    }
}
