//! Per-run metric tables.

use std::collections::BTreeMap;

use crate::numeric::Sample;

/// Frozen mapping from metric name to its samples, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    series: BTreeMap<String, Vec<Sample>>,
}

impl MetricTable {
    /// Samples for a metric, if the run recorded it.
    pub fn get(&self, metric: &str) -> Option<&[Sample]> {
        self.series.get(metric).map(Vec::as_slice)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.series.contains_key(metric)
    }

    /// Metric names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.series
            .iter()
            .map(|(name, samples)| (name.as_str(), samples.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Builder for a metric table.
///
/// Samples are appended in the order they are read; `build()` freezes the table.
#[derive(Debug, Default)]
pub struct MetricTableBuilder {
    series: BTreeMap<String, Vec<Sample>>,
}

impl MetricTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric with no samples yet (keeps empty columns visible).
    pub fn declare(&mut self, metric: &str) {
        self.series.entry(metric.to_string()).or_default();
    }

    /// Append one sample to a metric, creating it on first use.
    pub fn push(&mut self, metric: &str, value: Sample) {
        match self.series.get_mut(metric) {
            Some(samples) => samples.push(value),
            None => {
                self.series.insert(metric.to_string(), vec![value]);
            }
        }
    }

    pub fn build(self) -> MetricTable {
        MetricTable {
            series: self.series,
        }
    }
}

impl FromIterator<(String, Vec<Sample>)> for MetricTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Sample>)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_row_order() {
        let mut builder = MetricTableBuilder::new();
        builder.push("loss", 3.0);
        builder.push("acc", 0.1);
        builder.push("loss", 2.0);
        builder.push("loss", 1.0);
        let table = builder.build();

        assert_eq!(table.get("loss"), Some(&[3.0, 2.0, 1.0][..]));
        assert_eq!(table.get("acc"), Some(&[0.1][..]));
        assert_eq!(table.get("lr"), None);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["acc", "loss"]);
    }

    #[test]
    fn declared_metric_is_present_but_empty() {
        let mut builder = MetricTableBuilder::new();
        builder.declare("lr");
        let table = builder.build();
        assert!(table.contains("lr"));
        assert_eq!(table.get("lr"), Some(&[][..]));
    }
}
