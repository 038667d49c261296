//! Aggregate dataset built from every loaded run.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, CoreResult};
use crate::table::MetricTable;

/// One experiment run: a label and its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub label: String,
    pub metrics: MetricTable,
}

/// Runs keyed by label, plus the union of their metric names.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    runs: BTreeMap<String, Run>,
    keys: BTreeSet<String>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pair labels with tables by position.
    ///
    /// A label that appears twice keeps the later table.
    pub fn from_parts(labels: Vec<String>, tables: Vec<MetricTable>) -> CoreResult<Self> {
        if labels.len() != tables.len() {
            return Err(CoreError::Invariant {
                what: format!(
                    "{} labels paired with {} metric tables",
                    labels.len(),
                    tables.len()
                ),
            });
        }

        let mut runs = BTreeMap::new();
        for (label, metrics) in labels.into_iter().zip(tables) {
            let run = Run {
                label: label.clone(),
                metrics,
            };
            if runs.insert(label.clone(), run).is_some() {
                tracing::warn!(label = %label, "duplicate run label, keeping the last one loaded");
            }
        }

        let keys = runs
            .values()
            .flat_map(|run| run.metrics.names().map(str::to_string))
            .collect();

        Ok(Self { runs, keys })
    }

    pub fn run(&self, label: &str) -> Option<&Run> {
        self.runs.get(label)
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Every metric name recorded by at least one run.
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
