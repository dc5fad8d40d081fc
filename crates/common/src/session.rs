//! Login session and the persisted identity slot
//!
//! A single identity record is kept under the [`SESSION_KEY`] slot. The
//! [`Session`] owns its store and is created by the host at startup with
//! [`Session::init`]; there is no process-global session.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Name of the identity slot
pub const SESSION_KEY: &str = "app-session";

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    /// Trim and validate a username.
    pub fn new(username: &str) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidUsername("username must not be empty".to_string()));
        }
        if username.chars().any(char::is_control) {
            return Err(Error::InvalidUsername(format!(
                "username {:?} contains control characters",
                username
            )));
        }
        Ok(Self {
            username: username.to_string(),
        })
    }
}

/// Storage for the identity slot
pub trait IdentityStore: Send + Sync {
    /// Raw stored record, if any
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, record: &str) -> Result<()>;
    /// Removing an absent record is not an error.
    fn clear(&self) -> Result<()>;
}

/// Identity slot backed by a JSON file in the store directory
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/app-session.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", SESSION_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        // Write-then-rename so a reader never sees a partial record.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(record.as_bytes())?;
        tmp.persist(&self.path)?;
        debug!("Wrote identity record to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process identity slot
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    record: Mutex<Option<String>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.record.lock().clone())
    }

    fn save(&self, record: &str) -> Result<()> {
        *self.record.lock() = Some(record.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock() = None;
        Ok(())
    }
}

/// Login state plus the store that persists it
pub struct Session {
    store: Box<dyn IdentityStore>,
    identity: Option<Identity>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Decode a stored record, applying the same checks as a fresh login.
fn parse_record(raw: &str) -> Result<Identity> {
    let stored: Identity = serde_json::from_str(raw)?;
    Identity::new(&stored.username)
}

impl Session {
    /// Load the stored identity, if there is a readable one.
    ///
    /// A record that does not parse, or names an invalid user, is logged and
    /// treated as absent.
    pub fn init(store: impl IdentityStore + 'static) -> Result<Self> {
        let identity = match store.load()? {
            None => None,
            Some(raw) => match parse_record(&raw) {
                Ok(identity) => {
                    info!("Restored session for {}", identity.username);
                    Some(identity)
                }
                Err(e) => {
                    warn!("Ignoring malformed {} record: {}", SESSION_KEY, e);
                    None
                }
            },
        };
        Ok(Self {
            store: Box::new(store),
            identity,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Persist and adopt a new identity. The last login wins.
    pub fn login(&mut self, username: &str) -> Result<&Identity> {
        let identity = Identity::new(username)?;
        self.store.save(&serde_json::to_string(&identity)?)?;
        info!("Logged in as {}", identity.username);
        Ok(&*self.identity.insert(identity))
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.clear()?;
        if let Some(identity) = self.identity.take() {
            info!("Logged out {}", identity.username);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_login_persists_across_init() {
        let tmp = TempDir::new().unwrap();
        let mut session = Session::init(FileIdentityStore::in_dir(tmp.path())).unwrap();
        assert!(!session.is_authenticated());

        session.login("  tester ").unwrap();
        assert_eq!(session.identity().unwrap().username, "tester");

        let raw = std::fs::read_to_string(tmp.path().join("app-session.json")).unwrap();
        assert_eq!(raw, r#"{"username":"tester"}"#);

        let restored = Session::init(FileIdentityStore::in_dir(tmp.path())).unwrap();
        assert_eq!(restored.identity(), Some(&Identity { username: "tester".into() }));
    }

    #[test]
    fn test_logout_clears_slot() {
        let tmp = TempDir::new().unwrap();
        let store = FileIdentityStore::in_dir(&tmp.path().join("nested"));
        let path = store.path().to_path_buf();
        let mut session = Session::init(store).unwrap();
        session.login("qa").unwrap();
        assert!(path.exists());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());

        // Logging out twice is fine.
        session.logout().unwrap();
    }

    #[test]
    fn test_malformed_record_is_absent() {
        let session = Session::init(MemoryIdentityStore::with_record("{not json")).unwrap();
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_invalid_stored_username_is_absent() {
        for record in [r#"{"username":"  "}"#, r#"{"username":"a\u0007b"}"#] {
            let session = Session::init(MemoryIdentityStore::with_record(record)).unwrap();
            assert!(!session.is_authenticated(), "{}", record);
        }

        let session = Session::init(MemoryIdentityStore::with_record(r#"{"username":" qa "}"#)).unwrap();
        assert_eq!(session.identity().map(|i| i.username.as_str()), Some("qa"));
    }

    #[test]
    fn test_empty_username_rejected() {
        let mut session = Session::init(MemoryIdentityStore::new()).unwrap();
        assert!(matches!(session.login("   "), Err(Error::InvalidUsername(_))));
        assert!(session.login("a\u{7}b").is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_last_login_wins() {
        let mut session = Session::init(MemoryIdentityStore::new()).unwrap();
        session.login("first").unwrap();
        session.login("second").unwrap();
        assert_eq!(session.identity().unwrap().username, "second");
    }
}
