//! CLI Commands

pub mod parts;
pub mod serve;
pub mod session;
pub mod show;
pub mod summary;
pub mod tree;

use anyhow::Result;
use std::path::{Path, PathBuf};

use qaboard_common::{default_config_path, resolve_fixture, DashboardConfig, ResultTree, Session};

use crate::output::OutputFormat;

/// Resolved configuration plus the requested output format
pub struct Context {
    pub config: DashboardConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(config_path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let path = config_path
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        let config = DashboardConfig::load(&path)?.with_env_overrides();
        Ok(Self { config, format })
    }

    /// Result feed named by the config, or the builtin vehicle fixture
    pub fn tree(&self) -> Result<ResultTree> {
        Ok(resolve_fixture(self.config.fixture_path.as_deref())?)
    }

    pub fn session(&self) -> Result<Session> {
        Ok(Session::init(self.config.identity_store())?)
    }
}
