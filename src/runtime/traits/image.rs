// ABOUTME: Image operations trait for the container engine.
// ABOUTME: Remote-context builds and registry pulls, both as streams.

use super::shared_types::{BuildRequest, PullProgress};
use futures::Stream;
use std::pin::Pin;

/// Build log text, chunk by chunk, as the engine emits it.
pub type BuildStream<'a> = Pin<Box<dyn Stream<Item = Result<String, ImageError>> + Send + 'a>>;

/// Pull progress messages.
pub type PullStream<'a> = Pin<Box<dyn Stream<Item = Result<PullProgress, ImageError>> + Send + 'a>>;

/// Image operations: build from a remote context, pull.
///
/// Streams borrow the engine handle; dropping one closes its connection.
pub trait ImageOps: Send + Sync {
    fn build_image(&self, request: &BuildRequest) -> BuildStream<'_>;

    fn pull_image(&self, reference: &str) -> PullStream<'_>;
}

/// Errors from image operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    /// The engine reported an error inside the build output.
    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
