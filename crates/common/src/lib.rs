//! qaboard Common Library
//!
//! Test-result tree, roll-ups, lookup, and the view state shared by the web
//! console and the CLI.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod diagram;
pub mod error;
pub mod fixture;
pub mod locate;
pub mod session;
pub mod tree_view;
pub mod types;

// Re-export commonly used types
pub use aggregate::{aggregate, aggregate_node, format_rate, Summary};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardEvent, SelectionState};
pub use detail::{Badge, DetailView, Notice};
pub use diagram::{DiagramState, Part};
pub use error::{Error, Result};
pub use fixture::{builtin_fixture, load_fixture, resolve_fixture};
pub use locate::{find, find_leaf, normalize, Located};
pub use session::{FileIdentityStore, Identity, IdentityStore, MemoryIdentityStore, Session};
pub use tree_view::{TreePath, TreeRow, TreeViewState};
pub use types::*;

/// qaboard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default store path
pub fn default_store_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".qaboard")
}

/// Default config file path
pub fn default_config_path() -> std::path::PathBuf {
    default_store_path().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
