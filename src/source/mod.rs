// ABOUTME: Commit resolution against the source host.
// ABOUTME: Finds the newest commit of a repository and builds its tarball URL.

mod github;

pub use github::GithubClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CommitSha, CommitShaError, RepoRef};

/// Looks up the newest commit on a repository's default branch.
#[async_trait]
pub trait CommitResolver: Send + Sync {
    async fn resolve(&self, repo: &RepoRef) -> Result<CommitSha, ResolveError>;
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("source host returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("repository has no commits")]
    Empty,

    #[error("malformed commit listing: {0}")]
    Malformed(String),

    #[error("invalid commit id from source host: {0}")]
    InvalidSha(#[from] CommitShaError),

    #[error("request to source host failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// URL of the source tarball for `commit`.
pub fn tarball_url(archive_url: &str, repo: &RepoRef, commit: &CommitSha) -> String {
    format!(
        "{}/{}/{}/archive/{}.tar.gz",
        archive_url.trim_end_matches('/'),
        repo.owner(),
        repo.repo(),
        commit
    )
}

/// Directory the source host puts at the root of the tarball.
pub fn tarball_root(repo: &RepoRef, commit: &CommitSha) -> String {
    format!("{}-{}", repo.repo(), commit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tarball_url_ignores_trailing_slash() {
        let repo = RepoRef::new("acme", "widget").unwrap();
        let sha = CommitSha::parse(&"a".repeat(40)).unwrap();
        assert_eq!(
            tarball_url("https://github.com/", &repo, &sha),
            format!("https://github.com/acme/widget/archive/{}.tar.gz", "a".repeat(40))
        );
        assert_eq!(tarball_root(&repo, &sha), format!("widget-{}", "a".repeat(40)));
    }
}
