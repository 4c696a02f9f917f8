//! Commit identifier validation
//!
//! Deploys check out an exact revision, so the id is validated up front
//! instead of letting git fail halfway through the pipeline.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

/// Accepted revision ids: 6 to 40 hex characters (abbreviated or full SHA1).
const COMMIT_PATTERN: &str = "^[0-9a-fA-F]{6,40}$";

static COMMIT_RE: OnceLock<Regex> = OnceLock::new();

fn commit_re() -> &'static Regex {
    COMMIT_RE.get_or_init(|| Regex::new(COMMIT_PATTERN).expect("commit pattern is valid"))
}

/// A validated deployment revision identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit(String);

impl Commit {
    /// Parse a commit id, accepting 6-40 hex characters.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if commit_re().is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::InvalidCommit {
                value: value.to_string(),
            })
        }
    }

    /// The full id as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated id recorded in the audit trail (first 7 characters).
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(7)]
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
