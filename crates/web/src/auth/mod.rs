//! Login gate.
//!
//! The dashboard has a single identity slot. Pages render the login form
//! while it is empty; API routes answer 401.

pub mod middleware;

pub use middleware::{require_session, AuthenticatedIdentity};
