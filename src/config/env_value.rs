// ABOUTME: Configuration values that may come from the process environment.
// ABOUTME: Holds credentials and host-specific settings out of the config file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn from_env(var: impl Into<String>) -> Self {
        EnvValue::FromEnv {
            var: var.into(),
            default: None,
        }
    }

    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

// Literals are usually secrets; never print them.
impl fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("Literal(***)"),
            EnvValue::FromEnv { var, .. } => f.debug_struct("FromEnv").field("var", var).finish(),
        }
    }
}

/// Resolve an optional value, treating an unset optional as absent.
pub fn resolve_optional(value: Option<&EnvValue>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => v.resolve().map(Some),
    }
}
