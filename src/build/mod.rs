// ABOUTME: Image building from a commit's source tarball.
// ABOUTME: Builder trait, the build artifact, and build errors.

mod build_log;
mod engine_builder;

pub use build_log::{BUILD_MARKER, BuildLog, MarkerError};
pub use engine_builder::EngineBuilder;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::runtime::ImageError;
use crate::types::{CommitSha, ImageId, RepoRef, sanitize_label};

/// Lines of build output kept in error reports.
pub const LOG_TAIL_LINES: usize = 20;

/// Builds an image for one commit.
#[async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Runs until the build finishes, fails, or `cancel` fires.
    async fn build(
        &self,
        repo: &RepoRef,
        commit: &CommitSha,
        cancel: &CancellationToken,
    ) -> Result<BuildArtifact, BuildError>;
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("engine build failed: {source}")]
    Engine {
        source: ImageError,
        log_tail: String,
    },

    #[error("{source}")]
    Marker {
        source: MarkerError,
        log_tail: String,
    },

    #[error("build produced an unusable image id: '{0}'")]
    Unusable(String),

    #[error("build cancelled")]
    Cancelled,

    #[error("build exceeded {0:?}")]
    Timeout(Duration),
}

impl BuildError {
    pub fn log_tail(&self) -> Option<&str> {
        match self {
            BuildError::Engine { log_tail, .. } | BuildError::Marker { log_tail, .. } => {
                Some(log_tail)
            }
            _ => None,
        }
    }
}

/// A built image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildArtifact {
    image_id: ImageId,
    tag: String,
}

impl BuildArtifact {
    pub fn new(image_id: ImageId, tag: impl Into<String>) -> Result<Self, BuildError> {
        if image_id.is_empty() {
            return Err(BuildError::Unusable(image_id.into_inner()));
        }
        Ok(Self {
            image_id,
            tag: tag.into(),
        })
    }

    pub fn image_id(&self) -> &ImageId {
        &self.image_id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Reject ids that are not a hex digest, optionally `sha256:`-prefixed.
    /// Builders may report an error message where an id was expected.
    pub fn ensure_usable(&self) -> Result<(), BuildError> {
        let raw = self.image_id.as_str();
        let digest = raw.strip_prefix("sha256:").unwrap_or(raw);
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BuildError::Unusable(raw.to_string()));
        }
        Ok(())
    }
}

/// Tag given to the image built for `commit`.
pub fn image_tag(repo: &RepoRef, commit: &CommitSha) -> String {
    format!(
        "{}:{}",
        sanitize_label(&format!("{}-{}", repo.owner(), repo.repo())),
        commit.short()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_usable_accepts_digests() {
        let artifact = BuildArtifact::new(ImageId::new("sha256:deadbeef"), "t").unwrap();
        assert!(artifact.ensure_usable().is_ok());
        let artifact = BuildArtifact::new(ImageId::new("0123456789ab"), "t").unwrap();
        assert!(artifact.ensure_usable().is_ok());
    }

    #[test]
    fn ensure_usable_rejects_error_text() {
        let artifact = BuildArtifact::new(ImageId::new("error: no space left"), "t").unwrap();
        assert!(matches!(
            artifact.ensure_usable(),
            Err(BuildError::Unusable(id)) if id == "error: no space left"
        ));
    }

    #[test]
    fn empty_id_is_rejected_at_construction() {
        assert!(BuildArtifact::new(ImageId::new(""), "t").is_err());
    }

    #[test]
    fn tag_is_lowercase_and_short() {
        let repo = RepoRef::new("Acme", "My.Widget").unwrap();
        let sha = CommitSha::parse(&"B".repeat(40)).unwrap();
        assert_eq!(image_tag(&repo, &sha), "acme-my-widget:bbbbbbbbbbbb");
    }
}
