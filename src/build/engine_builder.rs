// ABOUTME: Image builder backed by the container engine's build endpoint.
// ABOUTME: Streams the remote-context build log, honours cancellation and a time limit.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{BuildArtifact, BuildError, BuildLog, ImageBuilder, LOG_TAIL_LINES, image_tag};
use crate::config::{BuildConfig, SourceConfig};
use crate::runtime::{BuildRequest, BuildStream, ImageError, ImageOps};
use crate::source::{tarball_root, tarball_url};
use crate::types::{CommitSha, RepoRef};

enum Finish {
    Done,
    Failed(ImageError),
    Cancelled,
    TimedOut,
}

/// Builds images through [`ImageOps`].
pub struct EngineBuilder<I> {
    engine: I,
    archive_url: String,
    dockerfile: String,
    build_args: BTreeMap<String, String>,
    timeout: Duration,
}

impl<I: ImageOps> EngineBuilder<I> {
    pub fn new(engine: I, source: &SourceConfig, build: &BuildConfig) -> Self {
        Self {
            engine,
            archive_url: source.archive_url.clone(),
            dockerfile: build.dockerfile.clone(),
            build_args: build.args.clone(),
            timeout: build.timeout,
        }
    }

    /// Engine request for `commit`. Configured build args win over the
    /// built-in `COMMIT_SHA` and `REPOSITORY`.
    pub fn request(&self, repo: &RepoRef, commit: &CommitSha) -> BuildRequest {
        let mut build_args = HashMap::new();
        build_args.insert("COMMIT_SHA".to_string(), commit.to_string());
        build_args.insert("REPOSITORY".to_string(), repo.to_string());
        for (key, value) in &self.build_args {
            build_args.insert(key.clone(), value.clone());
        }

        BuildRequest {
            remote: tarball_url(&self.archive_url, repo, commit),
            dockerfile: format!(
                "{}/{}",
                tarball_root(repo, commit),
                self.dockerfile.trim_start_matches("./")
            ),
            tag: image_tag(repo, commit),
            build_args,
        }
    }
}

async fn drain(mut stream: BuildStream<'_>, log: &mut BuildLog) -> Result<(), ImageError> {
    while let Some(chunk) = stream.next().await {
        log.push(&chunk?);
    }
    Ok(())
}

#[async_trait]
impl<I: ImageOps> ImageBuilder for EngineBuilder<I> {
    async fn build(
        &self,
        repo: &RepoRef,
        commit: &CommitSha,
        cancel: &CancellationToken,
    ) -> Result<BuildArtifact, BuildError> {
        let request = self.request(repo, commit);
        info!(remote = %request.remote, tag = %request.tag, "starting image build");

        let mut log = BuildLog::new();
        // Dropping the stream closes the engine connection, which stops the build.
        let finish = {
            let stream = self.engine.build_image(&request);
            tokio::select! {
                _ = cancel.cancelled() => Finish::Cancelled,
                res = tokio::time::timeout(self.timeout, drain(stream, &mut log)) => match res {
                    Ok(Ok(())) => Finish::Done,
                    Ok(Err(e)) => Finish::Failed(e),
                    Err(_) => Finish::TimedOut,
                },
            }
        };

        match finish {
            Finish::Done => {}
            Finish::Cancelled => {
                warn!(tag = %request.tag, "build cancelled");
                return Err(BuildError::Cancelled);
            }
            Finish::TimedOut => {
                warn!(tag = %request.tag, timeout = ?self.timeout, "build timed out");
                return Err(BuildError::Timeout(self.timeout));
            }
            Finish::Failed(source) => {
                return Err(BuildError::Engine {
                    source,
                    log_tail: log.tail(LOG_TAIL_LINES),
                });
            }
        }

        let image_id = log.image_id().map_err(|source| BuildError::Marker {
            source,
            log_tail: log.tail(LOG_TAIL_LINES),
        })?;
        info!(image = %image_id, tag = %request.tag, "image built");

        BuildArtifact::new(image_id, request.tag)
    }
}
