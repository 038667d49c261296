//! Runlist storage: the ordered labels a user wants plotted.
//!
//! One label per line. Lines starting with `#` stay in the file but are hidden.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{IngestError, IngestResult};

/// One runlist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunlistEntry {
    pub label: String,
    pub visible: bool,
}

impl RunlistEntry {
    fn parse(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        if let Some(rest) = line.strip_prefix('#') {
            let label = rest.trim_start_matches('#').trim();
            if label.is_empty() {
                return None;
            }
            return Some(Self {
                label: label.to_string(),
                visible: false,
            });
        }
        Some(Self {
            label: line.trim().to_string(),
            visible: true,
        })
    }

    fn to_line(&self) -> String {
        if self.visible {
            self.label.clone()
        } else {
            format!("#{}", self.label)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunlistStore {
    path: PathBuf,
}

impl RunlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> IngestError {
        IngestError::Runlist {
            path: self.path.clone(),
            source,
        }
    }

    /// Empty the backing file, creating it if needed.
    pub fn truncate(&self) -> IngestResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        fs::write(&self.path, "").map_err(|e| self.io_err(e))
    }

    /// Append a visible label. Labels already present are appended again.
    pub fn append(&self, label: &str) -> IngestResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        writeln!(file, "{}", label).map_err(|e| self.io_err(e))
    }

    fn read_lines(&self) -> IngestResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Every labelled line, hidden ones included, in file order.
    pub fn entries(&self) -> IngestResult<Vec<RunlistEntry>> {
        let content = self.read_lines()?;
        Ok(content.lines().filter_map(RunlistEntry::parse).collect())
    }

    /// Labels on lines that are not commented out, in file order.
    pub fn read_visible(&self) -> IngestResult<Vec<String>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|entry| entry.visible)
            .map(|entry| entry.label)
            .collect())
    }

    /// Show or hide every line carrying `label`. Returns how many lines matched.
    pub fn set_visible(&self, label: &str, visible: bool) -> IngestResult<usize> {
        let content = self.read_lines()?;
        let mut matched = 0;
        let mut out = String::with_capacity(content.len() + 8);
        for line in content.lines() {
            match RunlistEntry::parse(line) {
                Some(mut entry) if entry.label == label => {
                    matched += 1;
                    entry.visible = visible;
                    out.push_str(&entry.to_line());
                }
                _ => out.push_str(line),
            }
            out.push('\n');
        }
        if matched > 0 {
            fs::write(&self.path, out).map_err(|e| self.io_err(e))?;
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_path(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}", prefix, nanos)).join("runlist.txt")
    }

    #[test]
    fn append_and_read_visible() {
        let store = RunlistStore::new(unique_temp_path("kp_runlist_append"));
        store.truncate().expect("truncate");
        store.append("run_a").unwrap();
        store.append("run_b").unwrap();
        assert_eq!(store.read_visible().unwrap(), vec!["run_a", "run_b"]);
    }

    #[test]
    fn append_does_not_dedup() {
        let store = RunlistStore::new(unique_temp_path("kp_runlist_dup"));
        store.truncate().unwrap();
        store.append("run_a").unwrap();
        store.append("run_a").unwrap();
        assert_eq!(store.read_visible().unwrap(), vec!["run_a", "run_a"]);
    }

    #[test]
    fn truncate_clears_previous_entries() {
        let store = RunlistStore::new(unique_temp_path("kp_runlist_trunc"));
        store.truncate().unwrap();
        store.append("old").unwrap();
        store.truncate().unwrap();
        assert!(store.read_visible().unwrap().is_empty());
    }

    #[test]
    fn commented_lines_are_hidden_but_kept() {
        let path = unique_temp_path("kp_runlist_hidden");
        let store = RunlistStore::new(&path);
        store.truncate().unwrap();
        fs::write(&path, "run_a\n#run_b\n\n  run_c  \n").unwrap();

        assert_eq!(store.read_visible().unwrap(), vec!["run_a", "run_c"]);
        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[1],
            RunlistEntry {
                label: "run_b".to_string(),
                visible: false
            }
        );
    }

    #[test]
    fn set_visible_toggles_comment_prefix() {
        let path = unique_temp_path("kp_runlist_toggle");
        let store = RunlistStore::new(&path);
        store.truncate().unwrap();
        store.append("run_a").unwrap();
        store.append("run_b").unwrap();

        assert_eq!(store.set_visible("run_a", false).unwrap(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "#run_a\nrun_b\n");
        assert_eq!(store.read_visible().unwrap(), vec!["run_b"]);

        assert_eq!(store.set_visible("run_a", true).unwrap(), 1);
        assert_eq!(store.read_visible().unwrap(), vec!["run_a", "run_b"]);

        assert_eq!(store.set_visible("missing", true).unwrap(), 0);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = RunlistStore::new(unique_temp_path("kp_runlist_missing"));
        assert!(store.read_visible().unwrap().is_empty());
    }
}
