//! Regex metric selection with change detection.

use std::collections::BTreeSet;

use regex::Regex;

#[derive(thiserror::Error, Debug)]
pub enum SelectError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Metric names matched by the current pattern and the one before it.
///
/// Patterns are anchored at the start of the metric name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pattern: Option<String>,
    previous: Vec<String>,
    current: Vec<String>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the keys matching `pattern` and report whether the selection changed.
    ///
    /// An invalid pattern leaves the state as it was.
    pub fn update(&mut self, pattern: &str, keys: &BTreeSet<String>) -> Result<bool, SelectError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            SelectError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        let matched: Vec<String> = keys.iter().filter(|k| regex.is_match(k)).cloned().collect();
        self.previous = std::mem::replace(&mut self.current, matched);
        self.pattern = Some(pattern.to_string());

        tracing::debug!(
            pattern = %pattern,
            matched = self.current.len(),
            changed = self.changed(),
            "metric selection"
        );
        Ok(self.changed())
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Matching keys in sorted order.
    pub fn matches(&self) -> &[String] {
        &self.current
    }

    pub fn previous_matches(&self) -> &[String] {
        &self.previous
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}
