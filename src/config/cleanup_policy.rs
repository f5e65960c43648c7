// ABOUTME: What to do with already-created resources when a deployment fails late.
// ABOUTME: Supports keep (report only) and compensate (unwind in reverse order).

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Leave containers, DNS records, and proxy files in place and report them.
    #[default]
    Keep,
    /// Remove whatever the failed deployment created, newest first.
    Compensate,
}

impl CleanupPolicy {
    pub fn compensates(&self) -> bool {
        matches!(self, CleanupPolicy::Compensate)
    }
}

impl FromStr for CleanupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(CleanupPolicy::Keep),
            "compensate" => Ok(CleanupPolicy::Compensate),
            _ => Err(format!("unknown cleanup policy: {}", s)),
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupPolicy::Keep => write!(f, "keep"),
            CleanupPolicy::Compensate => write!(f, "compensate"),
        }
    }
}

impl<'de> Deserialize<'de> for CleanupPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl Serialize for CleanupPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
