use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use kp_core::{Dataset, MetricTable};
use kp_render::{GridLayout, GridRequest, RenderError, parse_directives, plan_panels, render_grid};

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

fn table(columns: &[(&str, &[f64])]) -> MetricTable {
    columns
        .iter()
        .map(|(name, values)| (name.to_string(), values.to_vec()))
        .collect()
}

fn sample_dataset() -> Dataset {
    Dataset::from_parts(
        vec!["baseline".into(), "wide".into()],
        vec![
            table(&[
                ("loss", &[2.0, 1.5, 1.1, 0.9]),
                ("acc", &[0.1, 0.4, 0.6, 0.7]),
                ("reward_mean", &[1.0, 2.0, 3.0]),
                ("reward_min", &[0.5, 1.5, 2.0]),
                ("reward_max", &[1.5, 2.5, 4.0]),
                ("reward_std", &[0.04, 0.09, 0.25]),
            ]),
            table(&[("loss", &[2.2, 1.2, 0.8]), ("acc", &[0.2, 0.5, 0.8])]),
        ],
    )
    .expect("paired")
}

fn is_png(path: &std::path::Path) -> bool {
    fs::read(path)
        .map(|bytes| bytes.starts_with(&[0x89, b'P', b'N', b'G']))
        .unwrap_or(false)
}

#[test]
fn renders_one_cell_per_metric() {
    let dir = unique_temp_dir("kp_render_grid");
    let dataset = sample_dataset();
    let metrics: Vec<&str> = dataset.keys().iter().map(String::as_str).collect();
    let panels = plan_panels(&dataset, &metrics, &["baseline", "wide"]).unwrap();
    let directives = parse_directives(["style dark", "ymin 0", "legend lower right"]);

    let request = GridRequest {
        panels: &panels,
        directives: &directives,
        terminal_px: (641, 481),
        pixel_scale: 1.0,
        output: dir.join("out").join("grid.png"),
    };
    let output = render_grid(&request).expect("grid renders");

    assert_eq!(output.panels, vec!["acc", "loss", "reward"]);
    assert_eq!(output.layout, GridLayout { rows: 1, cols: 3 });
    assert_eq!((output.width, output.height), (639, 480));
    // hosts without fonts leave cells blank but still produce the image
    assert!(
        output
            .failed
            .iter()
            .all(|m| ["acc", "loss", "reward_mean"].contains(&m.as_str()))
    );
    assert!(is_png(&output.path));
}

#[test]
fn failing_directives_never_abort_the_grid() {
    let dir = unique_temp_dir("kp_render_directives");
    let dataset = Dataset::from_parts(
        vec!["a".into()],
        vec![table(&[("delta", &[-3.0, -1.0, -2.0])])],
    )
    .unwrap();
    let panels = plan_panels(&dataset, &["delta"], &["a"]).unwrap();
    // ylog has no positive data, xmin crosses xmax
    let directives = parse_directives(["ylog", "xmin 99", "bogus line here too"]);

    let request = GridRequest {
        panels: &panels,
        directives: &directives,
        terminal_px: (300, 200),
        pixel_scale: 1.0,
        output: dir.join("delta.png"),
    };
    let output = render_grid(&request).expect("grid renders");
    assert_eq!(output.layout, GridLayout { rows: 1, cols: 1 });
    assert!(is_png(&output.path));
}

#[test]
fn empty_metric_selection_reports_no_metrics() {
    let dataset = sample_dataset();
    let err = plan_panels(&dataset, &["reward_std", "reward_min"], &["baseline"]).unwrap_err();
    assert!(matches!(err, RenderError::EmptyMetricSet));
    assert_eq!(err.to_string(), "no metrics");
}
