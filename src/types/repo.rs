// ABOUTME: Validated GitHub repository reference (owner + name).
// ABOUTME: Rejects characters that would escape URL path segments.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoRefError {
    #[error("repository {0} cannot be empty")]
    Empty(&'static str),

    #[error("repository {part} exceeds maximum length of {max} characters")]
    TooLong { part: &'static str, max: usize },

    #[error("invalid character in repository {part}: '{ch}'")]
    InvalidChar { part: &'static str, ch: char },

    #[error("repository {0} cannot be a relative path component")]
    DotSegment(&'static str),

    #[error("repository owner and name contain no letters or digits")]
    NoAlphanumeric,
}

/// `owner/repo` on the source host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    owner: String,
    repo: String,
}

impl RepoRef {
    pub fn new(owner: &str, repo: &str) -> Result<Self, RepoRefError> {
        validate_segment("owner", owner, 39)?;
        validate_segment("name", repo, 100)?;
        // Deployment names are derived from these; they need something to keep.
        if !owner.chars().chain(repo.chars()).any(|c| c.is_ascii_alphanumeric()) {
            return Err(RepoRefError::NoAlphanumeric);
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

fn validate_segment(part: &'static str, value: &str, max: usize) -> Result<(), RepoRefError> {
    if value.is_empty() {
        return Err(RepoRefError::Empty(part));
    }
    if value.len() > max {
        return Err(RepoRefError::TooLong { part, max });
    }
    if value == "." || value == ".." {
        return Err(RepoRefError::DotSegment(part));
    }
    if let Some(ch) = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
    {
        return Err(RepoRefError::InvalidChar { part, ch });
    }
    Ok(())
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
