// ABOUTME: Full 40-character commit identifier.
// ABOUTME: Only constructible from a well-formed hex string.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const COMMIT_SHA_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitShaError {
    #[error("commit sha must be {COMMIT_SHA_LEN} characters, got {0}")]
    Length(usize),

    #[error("commit sha contains non-hex character '{0}'")]
    NotHex(char),
}

/// A commit identifier, used downstream only as an opaque tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommitSha(String);

impl CommitSha {
    pub fn parse(value: &str) -> Result<Self, CommitShaError> {
        let value = value.trim();
        if value.len() != COMMIT_SHA_LEN {
            return Err(CommitShaError::Length(value.len()));
        }
        if let Some(c) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CommitShaError::NotHex(c));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in image tags.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for CommitSha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
