//! Dashboard configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::session::FileIdentityStore;
use crate::{Error, Result};

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the identity record
    pub store_path: PathBuf,

    /// Result feed to load instead of the builtin fixture
    pub fixture_path: Option<PathBuf>,

    /// Web console configuration
    pub web: WebConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_path: crate::default_store_path(),
            fixture_path: None,
            web: WebConfig::default(),
        }
    }
}

/// Web console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address
    pub listen: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
        }
    }
}

impl WebConfig {
    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("web.listen {:?}: {}", self.listen, e)))
    }
}

impl DashboardConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `QABOARD_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(addr) = get("QABOARD_WEB_ADDR") {
            self.web.listen = addr;
        }
        if let Some(path) = get("QABOARD_FIXTURE") {
            self.fixture_path = Some(PathBuf::from(path));
        }
        if let Some(path) = get("QABOARD_STORE") {
            self.store_path = PathBuf::from(path);
        }
        self
    }

    /// Identity slot inside the store directory
    pub fn identity_store(&self) -> FileIdentityStore {
        FileIdentityStore::in_dir(&self.store_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = DashboardConfig::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.web.listen, "127.0.0.1:8080");
        assert!(config.fixture_path.is_none());
    }

    #[test]
    fn test_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conf/config.toml");
        let config = DashboardConfig {
            store_path: tmp.path().to_path_buf(),
            fixture_path: Some(PathBuf::from("/srv/feed.json")),
            web: WebConfig {
                listen: "0.0.0.0:9000".to_string(),
            },
        };
        config.save(&path).unwrap();

        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(loaded.web.listen, "0.0.0.0:9000");
        assert_eq!(loaded.fixture_path, Some(PathBuf::from("/srv/feed.json")));
        assert_eq!(
            loaded.identity_store().path(),
            tmp.path().join("app-session.json")
        );
    }

    #[test]
    fn test_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[web]\nlisten = \"127.0.0.1:1\"\n").unwrap();
        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(loaded.web.listen, "127.0.0.1:1");
        assert_eq!(loaded.store_path, crate::default_store_path());
    }

    #[test]
    fn test_listen_address() {
        let web = WebConfig::default();
        assert_eq!(web.socket_addr().unwrap().port(), 8080);

        let bad = WebConfig {
            listen: "localhost".to_string(),
        };
        assert!(matches!(bad.socket_addr(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().with_overrides(|key| match key {
            "QABOARD_WEB_ADDR" => Some("127.0.0.1:7000".to_string()),
            "QABOARD_FIXTURE" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.web.listen, "127.0.0.1:7000");
        assert!(config.fixture_path.is_none());
    }
}
