//! Panel planning: which metrics get a panel and what each panel draws.

use std::collections::BTreeSet;

use kp_core::{Dataset, Sample};

use crate::{RenderError, RenderResult};

const MEAN_SUFFIX: &str = "_mean";
const COMPANION_SUFFIXES: [&str; 3] = ["_min", "_max", "_std"];

/// A shaded region between two curves, sample by sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub lo: Vec<Sample>,
    pub hi: Vec<Sample>,
}

impl Band {
    pub fn len(&self) -> usize {
        self.lo.len().min(self.hi.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One run's line on a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub label: String,
    pub values: Vec<Sample>,
    /// min..max envelope of a `_mean` metric.
    pub band: Option<Band>,
    /// mean ± sqrt(std), kept inside the envelope when there is one.
    pub inner_band: Option<Band>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub metric: String,
    pub title: String,
    pub series: Vec<SeriesSpec>,
    pub legend: bool,
}

/// Sorted, de-duplicated metric names without statistic companions.
pub fn panel_metrics<I, S>(metrics: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    metrics
        .into_iter()
        .map(|m| m.as_ref().to_string())
        .filter(|m| !COMPANION_SUFFIXES.iter().any(|suffix| m.ends_with(suffix)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build one panel per metric with one series per visible run that has it.
///
/// Fails with [`RenderError::EmptyMetricSet`] when no metric survives the
/// companion filter.
pub fn plan_panels<S: AsRef<str>>(
    dataset: &Dataset,
    metrics: &[S],
    visible: &[S],
) -> RenderResult<Vec<PanelSpec>> {
    let metrics = panel_metrics(metrics);
    if metrics.is_empty() {
        return Err(RenderError::EmptyMetricSet);
    }

    // first occurrence wins; the runlist may repeat a label
    let mut seen = BTreeSet::new();
    let runs: Vec<_> = visible
        .iter()
        .map(|label| label.as_ref())
        .filter(|label: &&str| seen.insert(*label))
        .filter_map(|label| {
            let run = dataset.run(label);
            if run.is_none() {
                tracing::debug!(label = %label, "visible run is not loaded, skipping");
            }
            run
        })
        .collect();
    let legend = runs.len() > 1;

    let panels = metrics
        .into_iter()
        .map(|metric| {
            let series = runs
                .iter()
                .filter_map(|run| {
                    let values = run.metrics.get(&metric)?;
                    let (band, inner_band) = match metric.strip_suffix(MEAN_SUFFIX) {
                        Some(stem) => bands(values, |suffix| {
                            run.metrics.get(&format!("{stem}{suffix}"))
                        }),
                        None => (None, None),
                    };
                    Some(SeriesSpec {
                        label: run.label.clone(),
                        values: values.to_vec(),
                        band,
                        inner_band,
                    })
                })
                .collect();

            let title = metric
                .strip_suffix(MEAN_SUFFIX)
                .unwrap_or(&metric)
                .to_string();

            PanelSpec {
                metric,
                title,
                series,
                legend,
            }
        })
        .collect();

    Ok(panels)
}

fn bands<'a>(
    mean: &[Sample],
    companion: impl Fn(&str) -> Option<&'a [Sample]>,
) -> (Option<Band>, Option<Band>) {
    let min = companion("_min");
    let max = companion("_max");
    let std = companion("_std");

    let band = match (min, max) {
        (Some(lo), Some(hi)) => Some(Band {
            lo: lo.to_vec(),
            hi: hi.to_vec(),
        }),
        _ => None,
    };

    let inner = std.map(|std| {
        let mut lo = Vec::with_capacity(mean.len());
        let mut hi = Vec::with_capacity(mean.len());
        for (i, (m, s)) in mean.iter().zip(std).enumerate() {
            let spread = s.sqrt();
            let mut l = m - spread;
            let mut h = m + spread;
            if let (Some(min), Some(max)) = (min, max) {
                match (min.get(i), max.get(i)) {
                    (Some(a), Some(b)) => {
                        l = l.max(*a);
                        h = h.min(*b);
                    }
                    _ => break,
                }
            }
            lo.push(l);
            hi.push(h);
        }
        Band { lo, hi }
    });

    (band, inner)
}
