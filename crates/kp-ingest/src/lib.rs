//! kp-ingest: run discovery, metric extraction and concurrent loading.

pub mod logparse;
pub mod pipeline;
pub mod runlist;
pub mod source;
pub mod tabular;

pub use pipeline::{IngestReport, PendingReads, ingest, ingest_with_report};
pub use runlist::{RunlistEntry, RunlistStore};
pub use source::MetricSource;

use std::path::PathBuf;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("Could not read {path}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Runlist I/O error at {path}: {source}")]
    Runlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] kp_core::CoreError),
}

impl IngestError {
    pub(crate) fn source_read(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        IngestError::SourceRead {
            path: path.into(),
            source: source.into(),
        }
    }
}
