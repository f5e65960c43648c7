// ABOUTME: Per-attempt deployment name shared by container, DNS record, and proxy file.
// ABOUTME: Format is {owner}-{repo}-{8 hex}, sanitized to a single DNS label.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use serde::Serialize;

use super::RepoRef;

/// Maximum length of a DNS label.
const MAX_LABEL_LEN: usize = 63;
const SUFFIX_LEN: usize = 8;

static SUFFIX_OFFSET: OnceLock<u32> = OnceLock::new();
static SUFFIX_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Name of one deployment attempt.
///
/// Used verbatim as the container name, the DNS record name (relative to the
/// zone), and the proxy config file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeploymentName(String);

impl DeploymentName {
    /// Generate a fresh name for `repo`.
    pub fn generate(repo: &RepoRef) -> Self {
        Self::with_suffix(repo, next_suffix())
    }

    /// Build a name with a fixed suffix.
    pub fn with_suffix(repo: &RepoRef, suffix: u32) -> Self {
        let prefix = sanitize_label(&format!("{}-{}", repo.owner(), repo.repo()));
        let budget = MAX_LABEL_LEN - SUFFIX_LEN - 1;
        let prefix = if prefix.len() > budget {
            prefix[..budget].trim_end_matches('-')
        } else {
            prefix.as_str()
        };
        Self(format!("{prefix}-{suffix:08x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The random 8-hex suffix.
    pub fn suffix(&self) -> &str {
        &self.0[self.0.len() - SUFFIX_LEN..]
    }

    /// Fully qualified hostname under `domain`.
    pub fn hostname(&self, domain: &str) -> String {
        format!("{}.{}", self.0, domain.trim_start_matches('.'))
    }

    /// Proxy config file name.
    pub fn config_file_name(&self) -> String {
        format!("{}.conf", self.0)
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase `raw` and collapse every run of characters outside `[a-z0-9]` into
/// one `-`.
pub fn sanitize_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Random per-process offset plus a sequence, run through a bijective mixer:
/// suffixes never repeat inside one process.
fn next_suffix() -> u32 {
    let offset = *SUFFIX_OFFSET.get_or_init(|| rand::thread_rng().r#gen());
    let seq = SUFFIX_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    scramble(offset.wrapping_add(seq))
}

fn scramble(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}
