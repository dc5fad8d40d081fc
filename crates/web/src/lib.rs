//! qaboard Web Console
//!
//! Serves the dashboard behind a login gate and carries its events over a
//! small JSON API.

pub mod api;
pub mod auth;
pub mod render;
pub mod server;
pub mod static_files;

pub use server::WebServer;
