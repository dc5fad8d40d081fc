//! qaboard CLI
//!
//! Command-line interface for inspecting vehicle QA results and serving
//! the web dashboard.

pub mod commands;
pub mod output;
