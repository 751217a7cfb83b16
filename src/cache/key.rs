//! Query Key Module
//!
//! Structured keys addressing one cached query, e.g. `["events", "42"]`.

use std::fmt;

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

// == Query Key ==
/// Ordered sequence of tokens identifying one cached value.
///
/// Keys compare by structural equality. Rendered form joins tokens with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    // == Constructor ==
    /// Builds a key from tokens. Tokens must be non-empty and must not contain `/`.
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() {
            return Err(CacheError::InvalidKey("key has no tokens".to_string()));
        }
        if let Some(bad) = tokens.iter().find(|t| t.is_empty() || t.contains('/')) {
            return Err(CacheError::InvalidKey(format!("bad token '{}'", bad)));
        }
        let key = Self(tokens);
        if key.rendered_len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        Ok(key)
    }

    /// Key for a single event: `events/<id>`.
    pub fn event(id: &str) -> Result<Self> {
        Self::new(["events", id])
    }

    /// Prefix covering every event query.
    pub fn events() -> Self {
        Self(vec!["events".to_string()])
    }

    // == Parse ==
    /// Parses the rendered form, e.g. `events/42`.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(CacheError::InvalidKey("empty key".to_string()));
        }
        Self::new(s.split('/'))
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    // == Prefix Match ==
    /// Returns true if `prefix` is a leading subsequence of this key.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    fn rendered_len(&self) -> usize {
        self.0.iter().map(String::len).sum::<usize>() + self.0.len() - 1
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}
