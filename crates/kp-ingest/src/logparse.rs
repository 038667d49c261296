//! Metric extraction from free-form log lines.
//!
//! Two line shapes are recognised, tried in order:
//! - `... name: |min, mean ± std, max|` fills `name_min`, `name_mean`, `name_std`, `name_max`
//! - `... name: |value|` fills `name`
//!
//! Everything else is ignored.

use std::sync::LazyLock;

use kp_core::{MetricTable, MetricTableBuilder, Sample};
use regex::Regex;

const FLOAT: &str = r"([-+]?[0-9]*\.?[0-9]+)";

/// Suffixes for the four multi-stat values, in capture order.
pub const STAT_SUFFIXES: [&str; 4] = ["_min", "_mean", "_std", "_max"];

static MULTI_STAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^.* ([^:]+): \|{f}, {f} ± {f}, {f}\|",
        f = FLOAT
    ))
    .expect("multi-stat pattern is valid")
});

static SINGLE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^.* ([^:]+): \|{f}\|", f = FLOAT)).expect("single-value pattern is valid")
});

/// What a single line contributed.
#[derive(Debug, Clone, PartialEq)]
pub enum LineMetrics {
    Stats { name: String, values: [Sample; 4] },
    Single { name: String, value: Sample },
    Nothing,
}

/// Classify one log line.
pub fn match_line(line: &str) -> LineMetrics {
    if let Some(caps) = MULTI_STAT.captures(line) {
        let mut values = [0.0; 4];
        let mut parsed = true;
        for (slot, idx) in values.iter_mut().zip(2..=5) {
            match caps.get(idx).map(|m| m.as_str().parse::<Sample>()) {
                Some(Ok(v)) => *slot = v,
                _ => parsed = false,
            }
        }
        if parsed {
            return LineMetrics::Stats {
                name: caps[1].to_string(),
                values,
            };
        }
        return LineMetrics::Nothing;
    }

    if let Some(caps) = SINGLE_VALUE.captures(line) {
        if let Ok(value) = caps[2].parse::<Sample>() {
            return LineMetrics::Single {
                name: caps[1].to_string(),
                value,
            };
        }
    }

    LineMetrics::Nothing
}

/// Append whatever `line` carries to `builder`. Returns false for ignored lines.
pub fn add_line(builder: &mut MetricTableBuilder, line: &str) -> bool {
    match match_line(line) {
        LineMetrics::Stats { name, values } => {
            for (suffix, value) in STAT_SUFFIXES.iter().zip(values) {
                builder.push(&format!("{name}{suffix}"), value);
            }
            true
        }
        LineMetrics::Single { name, value } => {
            builder.push(&name, value);
            true
        }
        LineMetrics::Nothing => false,
    }
}

/// Parse a whole log text into a metric table.
pub fn parse_log(text: &str) -> MetricTable {
    let mut builder = MetricTableBuilder::new();
    let mut matched = 0usize;
    for line in text.lines() {
        if add_line(&mut builder, line) {
            matched += 1;
        }
    }
    tracing::trace!(matched, "parsed log text");
    builder.build()
}
