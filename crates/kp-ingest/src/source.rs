//! Metric source variants and their discovery rules.

use std::path::{Path, PathBuf};

use kp_core::MetricTable;

use crate::pipeline::PendingReads;
use crate::runlist::RunlistStore;
use crate::{IngestError, IngestResult, logparse, tabular};

/// File names probed, in order, inside a tabular run directory.
pub const TABULAR_FILES: [&str; 2] = ["metrics.csv", "results.txt"];

pub const LOG_SUFFIX: &str = ".log";

/// The kinds of run artifact that can be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    /// A run directory holding `metrics.csv` or `results.txt`.
    Tabular,
    /// A single `.log` file.
    Log,
}

impl MetricSource {
    /// Probe order: tabular before log.
    pub const PRIORITY: [MetricSource; 2] = [MetricSource::Tabular, MetricSource::Log];

    pub fn name(self) -> &'static str {
        match self {
            MetricSource::Tabular => "tabular",
            MetricSource::Log => "log",
        }
    }

    /// Locate the file this variant would read for `path`, if any.
    pub fn getfile(self, path: &Path) -> Option<PathBuf> {
        match self {
            MetricSource::Tabular => TABULAR_FILES
                .iter()
                .map(|name| path.join(name))
                .find(|candidate| candidate.is_file()),
            MetricSource::Log => {
                let is_log = path.to_string_lossy().ends_with(LOG_SUFFIX);
                (is_log && path.exists()).then(|| path.to_path_buf())
            }
        }
    }

    /// First variant, in priority order, that resolves `path`.
    pub fn resolve(path: &Path) -> Option<(MetricSource, PathBuf)> {
        Self::PRIORITY
            .iter()
            .find_map(|source| source.getfile(path).map(|file| (*source, file)))
    }

    /// Run label for a located file.
    pub fn label(self, file: &Path) -> String {
        match self {
            MetricSource::Tabular => {
                let parent = file.parent().unwrap_or_else(|| Path::new("."));
                let parent = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
                match parent.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    // `.` and `..` have no file name; fall back to the resolved directory
                    None => std::fs::canonicalize(parent)
                        .ok()
                        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                        .unwrap_or_else(|| parent.to_string_lossy().into_owned()),
                }
            }
            MetricSource::Log => {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                name.strip_suffix(LOG_SUFFIX)
                    .map(str::to_string)
                    .unwrap_or(name)
            }
        }
    }

    /// Read and parse a located file.
    pub async fn read(self, file: PathBuf) -> IngestResult<MetricTable> {
        match self {
            MetricSource::Tabular => {
                let bytes = tokio::fs::read(&file)
                    .await
                    .map_err(|e| IngestError::source_read(&file, e))?;
                tabular::parse_table(&bytes).map_err(|e| IngestError::source_read(&file, e))
            }
            MetricSource::Log => {
                let text = tokio::fs::read_to_string(&file)
                    .await
                    .map_err(|e| IngestError::source_read(&file, e))?;
                Ok(logparse::parse_log(&text))
            }
        }
    }

    /// Queue a read of `file` and record its label in `pending` and the runlist.
    pub fn load(
        self,
        file: PathBuf,
        pending: &mut PendingReads,
        runlist: &RunlistStore,
    ) -> IngestResult<()> {
        let label = self.label(&file);
        tracing::debug!(source = self.name(), file = %file.display(), label = %label, "queueing read");
        runlist
            .append(&label)
            .map_err(|e| IngestError::source_read(&file, e))?;
        pending.push(label, self.read(file));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn tabular_prefers_metrics_csv() {
        let dir = unique_temp_dir("kp_source_pref");
        fs::write(dir.join("results.txt"), "a\n1\n").unwrap();
        assert_eq!(
            MetricSource::Tabular.getfile(&dir),
            Some(dir.join("results.txt"))
        );
        fs::write(dir.join("metrics.csv"), "a\n1\n").unwrap();
        assert_eq!(
            MetricSource::Tabular.getfile(&dir),
            Some(dir.join("metrics.csv"))
        );
    }

    #[test]
    fn log_requires_existing_log_suffix() {
        let dir = unique_temp_dir("kp_source_log");
        let log = dir.join("train.log");
        let txt = dir.join("train.txt");
        fs::write(&log, "").unwrap();
        fs::write(&txt, "").unwrap();

        assert_eq!(MetricSource::Log.getfile(&log), Some(log.clone()));
        assert_eq!(MetricSource::Log.getfile(&txt), None);
        assert_eq!(MetricSource::Log.getfile(&dir.join("absent.log")), None);
    }

    #[test]
    fn resolve_tries_tabular_first() {
        let dir = unique_temp_dir("kp_source_resolve");
        let run = dir.join("run.log");
        fs::create_dir_all(&run).unwrap();
        fs::write(run.join("metrics.csv"), "a\n1\n").unwrap();

        let (source, file) = MetricSource::resolve(&run).expect("should resolve");
        assert_eq!(source, MetricSource::Tabular);
        assert_eq!(file, run.join("metrics.csv"));
        assert_eq!(MetricSource::resolve(&dir.join("nothing")), None);
    }

    #[test]
    fn labels_follow_directory_or_file_stem() {
        assert_eq!(
            MetricSource::Tabular.label(Path::new("runs/exp_1/metrics.csv")),
            "exp_1"
        );
        assert_eq!(
            MetricSource::Log.label(Path::new("logs/baseline.log")),
            "baseline"
        );
        assert_eq!(MetricSource::Log.label(Path::new("a.b.log")), "a.b");
    }

    #[tokio::test]
    async fn read_wraps_failures_with_path() {
        let dir = unique_temp_dir("kp_source_bad");
        fs::write(dir.join("metrics.csv"), "loss\nnot-a-number\n").unwrap();

        let err = MetricSource::Tabular
            .read(dir.join("metrics.csv"))
            .await
            .unwrap_err();
        match err {
            IngestError::SourceRead { path, source } => {
                assert_eq!(path, dir.join("metrics.csv"));
                assert!(source.to_string().contains("not-a-number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unreadable_log_is_a_source_read() {
        let dir = unique_temp_dir("kp_source_bad_log");
        let log = dir.join("broken.log");
        fs::write(&log, [b'l', b'o', 0xff, 0xfe, b'\n']).unwrap();

        match MetricSource::Log.read(log.clone()).await.unwrap_err() {
            IngestError::SourceRead { path, .. } => assert_eq!(path, log),
            other => panic!("unexpected error: {other}"),
        }

        // a directory that merely looks like a log
        let fake = dir.join("fake.log");
        fs::create_dir_all(&fake).unwrap();
        match MetricSource::Log.read(fake.clone()).await.unwrap_err() {
            IngestError::SourceRead { path, .. } => assert_eq!(path, fake),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn runlist_failure_during_load_names_the_source() {
        let dir = unique_temp_dir("kp_source_runlist");
        let run = dir.join("run_a");
        fs::create_dir_all(&run).unwrap();
        fs::write(run.join("metrics.csv"), "loss
1
").unwrap();
        // a directory cannot be appended to
        let runlist = RunlistStore::new(dir.join("runlist_dir"));
        fs::create_dir_all(runlist.path()).unwrap();

        let mut pending = PendingReads::new();
        let file = run.join("metrics.csv");
        let err = MetricSource::Tabular
            .load(file.clone(), &mut pending, &runlist)
            .unwrap_err();
        match err {
            IngestError::SourceRead { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {other}"),
        }
        assert!(pending.is_empty());
    }
}
