// ABOUTME: Library root for dockhand - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod dns;
pub mod error;
pub mod output;
pub mod provision;
pub mod proxy;
pub mod runtime;
pub mod server;
pub mod source;
pub mod types;
