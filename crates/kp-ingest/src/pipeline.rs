//! Ingestion: discover sources, read them concurrently, assemble a dataset.

use std::future::Future;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, join_all};
use kp_core::timing::Timer;
use kp_core::{Dataset, MetricTable};

use crate::IngestResult;
use crate::runlist::RunlistStore;
use crate::source::MetricSource;

/// Reads queued during discovery, index-aligned with their run labels.
#[derive(Default)]
pub struct PendingReads {
    labels: Vec<String>,
    reads: Vec<BoxFuture<'static, IngestResult<MetricTable>>>,
}

impl PendingReads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, label: impl Into<String>, read: F)
    where
        F: Future<Output = IngestResult<MetricTable>> + Send + 'static,
    {
        self.labels.push(label.into());
        self.reads.push(Box::pin(read));
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    /// Await every read together and pair results with labels by position.
    ///
    /// All reads run to completion; the first failure in queue order is returned.
    pub async fn join(self) -> IngestResult<Dataset> {
        let results = join_all(self.reads).await;
        let tables = results.into_iter().collect::<IngestResult<Vec<_>>>()?;
        Ok(Dataset::from_parts(self.labels, tables)?)
    }
}

/// Outcome of an ingest, including inputs no source could resolve.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub dataset: Dataset,
    pub not_found: Vec<PathBuf>,
}

impl IngestReport {
    /// One aggregate message for every unresolved input.
    pub fn warning(&self) -> Option<String> {
        if self.not_found.is_empty() {
            return None;
        }
        let paths: Vec<String> = self
            .not_found
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        Some(format!("could not read {}", paths.join(", ")))
    }
}

/// Load every readable path into a dataset.
pub async fn ingest<P: AsRef<Path>>(paths: &[P], runlist: &RunlistStore) -> IngestResult<Dataset> {
    Ok(ingest_with_report(paths, runlist).await?.dataset)
}

/// Load every readable path and report the ones nothing could read.
pub async fn ingest_with_report<P: AsRef<Path>>(
    paths: &[P],
    runlist: &RunlistStore,
) -> IngestResult<IngestReport> {
    let timer = Timer::start("ingest");
    runlist.truncate()?;

    let mut pending = PendingReads::new();
    let mut not_found = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match MetricSource::resolve(path) {
            Some((source, file)) => source.load(file, &mut pending, runlist)?,
            None => not_found.push(path.to_path_buf()),
        }
    }

    let mut report = IngestReport {
        dataset: Dataset::empty(),
        not_found,
    };
    if let Some(message) = report.warning() {
        tracing::warn!("{}", message);
    }
    if pending.is_empty() {
        tracing::warn!(inputs = paths.len(), "nothing readable");
        return Ok(report);
    }

    let queued = pending.len();
    report.dataset = pending.join().await?;
    tracing::info!(
        reads = queued,
        runs = report.dataset.run_count(),
        metrics = report.dataset.keys().len(),
        "ingest complete"
    );
    timer.stop_and_log();
    Ok(report)
}
