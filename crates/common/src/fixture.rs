//! Test-result fixtures
//!
//! The dashboard consumes a static result tree in place of a live feed. The
//! vehicle fixture ships inside the binary; an alternative feed with the same
//! shape can be loaded from disk.

use std::path::Path;

use tracing::{debug, info};

use crate::{Error, Result, ResultTree};

const VEHICLE_FIXTURE: &str = include_str!("../fixtures/vehicle.json");

/// Parse the embedded vehicle fixture.
pub fn builtin_fixture() -> Result<ResultTree> {
    let tree: ResultTree = serde_json::from_str(VEHICLE_FIXTURE)?;
    debug!("Parsed builtin fixture with {} top-level groups", tree.len());
    Ok(tree)
}

/// Load a result tree from a JSON file.
pub fn load_fixture(path: &Path) -> Result<ResultTree> {
    let content = std::fs::read_to_string(path)?;
    let tree: ResultTree = serde_json::from_str(&content)
        .map_err(|e| Error::InvalidFixture(format!("{}: {}", path.display(), e)))?;
    info!("Loaded fixture from {:?}", path);
    Ok(tree)
}

/// Load the configured feed, falling back to the builtin fixture.
pub fn resolve_fixture(path: Option<&Path>) -> Result<ResultTree> {
    match path {
        Some(path) => load_fixture(path),
        None => builtin_fixture(),
    }
}
