// ABOUTME: HTTP route handlers.
// ABOUTME: Health check, repository deploy, and image pull progress.

pub mod deploy;
pub mod health;
pub mod pull;
