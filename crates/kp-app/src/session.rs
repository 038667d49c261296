//! Load → select → render session.

use std::path::Path;

use kp_core::Dataset;
use kp_ingest::{IngestReport, RunlistStore, ingest_with_report};
use kp_render::{GridOutput, GridRequest, PanelSpec, RenderDirective, parse_directives, plan_panels, render_grid};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::selector::MatchState;

/// A loaded dataset plus the metric selection made against it.
#[derive(Debug)]
pub struct Session {
    config: Config,
    runlist: RunlistStore,
    dataset: Dataset,
    selector: MatchState,
    not_found: Vec<std::path::PathBuf>,
    load_warning: Option<String>,
}

impl Session {
    /// Ingest `paths` on a single-threaded runtime and start a session over the result.
    ///
    /// The runlist is rewritten with the labels of everything loaded.
    pub fn load<P: AsRef<Path>>(config: Config, paths: &[P]) -> AppResult<Self> {
        config.ensure_settings_file()?;
        let runlist = config.runlist();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::Runtime(e.to_string()))?;
        let report: IngestReport = runtime.block_on(ingest_with_report(paths, &runlist))?;

        let load_warning = report.warning();
        Ok(Self {
            config,
            runlist,
            dataset: report.dataset,
            selector: MatchState::new(),
            not_found: report.not_found,
            load_warning,
        })
    }

    /// Session over an already built dataset.
    pub fn from_dataset(config: Config, dataset: Dataset) -> Self {
        let runlist = config.runlist();
        Self {
            config,
            runlist,
            dataset,
            selector: MatchState::new(),
            not_found: Vec::new(),
            load_warning: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selector(&self) -> &MatchState {
        &self.selector
    }

    pub fn runlist(&self) -> &RunlistStore {
        &self.runlist
    }

    /// Inputs no source could read.
    pub fn not_found(&self) -> &[std::path::PathBuf] {
        &self.not_found
    }

    /// One message naming every unreadable input, if there were any.
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Apply a metric pattern. Returns whether the selection changed.
    pub fn select(&mut self, pattern: &str) -> AppResult<bool> {
        Ok(self.selector.update(pattern, self.dataset.keys())?)
    }

    /// Directives from the settings file. A missing file means none.
    pub fn directives(&self) -> AppResult<Vec<RenderDirective>> {
        let path = &self.config.settings_path;
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(parse_directives(text.lines())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(AppError::SettingsRead {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Panels for the selected metrics and the runs visible in the runlist.
    pub fn plan(&self) -> AppResult<Vec<PanelSpec>> {
        let visible = self.runlist.read_visible()?;
        let metrics: Vec<&str> = self.selector.matches().iter().map(String::as_str).collect();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        Ok(plan_panels(&self.dataset, &metrics, &visible)?)
    }

    /// Draw the selected metrics to the configured plot path.
    ///
    /// Fails with [`AppError::NoMetrics`] when the selection is empty.
    pub fn render(&self, terminal_px: (u32, u32)) -> AppResult<GridOutput> {
        let panels = self.plan()?;
        let directives = self.directives()?;
        let request = GridRequest {
            panels: &panels,
            directives: &directives,
            terminal_px,
            pixel_scale: self.config.pixel_scale,
            output: self.config.plot_path.clone(),
        };
        let output = render_grid(&request)?;

        if let Some(pattern) = self.selector.pattern() {
            std::fs::write(&self.config.plot_name_path, pattern)?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_core::MetricTable;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("{}_{}", prefix, nanos));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            settings_path: dir.join("kp-mpl.txt"),
            runlist_path: dir.join("runlist.txt"),
            plot_path: dir.join("kp.png"),
            plot_name_path: dir.join("kp-name.txt"),
            ..Config::default()
        }
    }

    fn dataset() -> Dataset {
        let table = |names: &[&str]| -> MetricTable {
            names.iter().map(|n| (n.to_string(), vec![1.0, 2.0])).collect()
        };
        Dataset::from_parts(
            vec!["a".into(), "b".into()],
            vec![table(&["loss", "acc"]), table(&["loss", "lr"])],
        )
        .unwrap()
    }

    #[test]
    fn plan_uses_selection_and_visible_runs() {
        let dir = unique_temp_dir("kp_session_plan");
        let config = config_in(&dir);
        fs::write(&config.runlist_path, "a\n# b\n").unwrap();
        let mut session = Session::from_dataset(config, dataset());

        assert!(session.select("l").unwrap());
        let panels = session.plan().unwrap();
        let titles: Vec<&str> = panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["loss", "lr"]);
        assert_eq!(panels[0].series.len(), 1);
        assert_eq!(panels[1].series.len(), 0);
        assert!(!panels[0].legend);
    }

    #[test]
    fn nothing_selected_is_no_metrics() {
        let dir = unique_temp_dir("kp_session_empty");
        let mut session = Session::from_dataset(config_in(&dir), dataset());
        session.select("zzz").unwrap();
        let err = session.render((400, 300)).unwrap_err();
        assert!(err.is_empty_metric_set());
        assert!(!dir.join("kp-name.txt").exists());
    }

    #[test]
    fn invalid_pattern_keeps_previous_selection() {
        let dir = unique_temp_dir("kp_session_invalid");
        let mut session = Session::from_dataset(config_in(&dir), dataset());
        session.select("acc").unwrap();
        assert!(matches!(session.select("["), Err(AppError::Select(_))));
        assert_eq!(session.selector().matches(), ["acc"]);
    }

    #[test]
    fn directives_come_from_the_settings_file() {
        let dir = unique_temp_dir("kp_session_settings");
        let config = config_in(&dir);
        let session = Session::from_dataset(config.clone(), dataset());
        assert!(session.directives().unwrap().is_empty());

        fs::write(&config.settings_path, "ylog\nnot a directive at all\nxmax 3\n").unwrap();
        assert_eq!(
            session.directives().unwrap(),
            vec![RenderDirective::YLog, RenderDirective::XMax(3.0)]
        );
    }
}
