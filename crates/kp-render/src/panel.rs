//! Single-panel axis resolution and rasterization.

use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use plotters_backend::DrawingBackend;

use crate::directives::{AxisBounds, LegendLocation, RenderDirective};
use crate::grid::RgbBitmap;
use crate::plan::{Band, PanelSpec};
use crate::theme::Theme;
use crate::{RenderError, RenderResult};

const PADDING: f64 = 0.05;
const BAND_ALPHA: f64 = 0.2;
const INNER_BAND_ALPHA: f64 = 0.35;
const FONT: &str = "sans-serif";

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Axis bounds for a panel: padded data extents, then the directives in order.
pub fn resolve_axes(panel: &PanelSpec, directives: &[RenderDirective]) -> AxisBounds {
    let mut longest = 0usize;
    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    let mut min_positive: Option<f64> = None;

    let mut visit = |values: &[f64]| {
        longest = longest.max(values.len());
        for &v in values.iter().filter(|v| v.is_finite()) {
            y_lo = y_lo.min(v);
            y_hi = y_hi.max(v);
            if v > 0.0 {
                min_positive = Some(min_positive.map_or(v, |m| m.min(v)));
            }
        }
    };

    for series in &panel.series {
        visit(&series.values);
        for band in [&series.band, &series.inner_band].into_iter().flatten() {
            visit(&band.lo);
            visit(&band.hi);
        }
    }

    let x = if longest == 0 {
        (0.0, 1.0)
    } else {
        padded(0.0, (longest - 1) as f64)
    };
    let y = if y_lo <= y_hi {
        padded(y_lo, y_hi)
    } else {
        (0.0, 1.0)
    };

    let mut axes = AxisBounds::new(x, y);
    axes.apply_all(directives, min_positive);
    axes
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - span * PADDING, hi + span * PADDING)
    } else {
        let pad = (lo.abs() * PADDING).max(0.5);
        (lo - pad, hi + pad)
    }
}

/// Draw one panel into a fresh bitmap of `size` pixels.
pub fn rasterize(
    panel: &PanelSpec,
    axes: &AxisBounds,
    theme: &Theme,
    size: (u32, u32),
) -> RenderResult<RgbBitmap> {
    let mut bitmap = RgbBitmap::filled(size.0, size.1, theme.background_rgb());
    draw_panel(bitmap.as_bytes_mut(), size, panel, axes, theme).map_err(|err| {
        RenderError::Draw {
            metric: panel.metric.clone(),
            message: err.to_string(),
        }
    })?;
    Ok(bitmap)
}

fn draw_panel(
    buffer: &mut [u8],
    size: (u32, u32),
    panel: &PanelSpec,
    axes: &AxisBounds,
    theme: &Theme,
) -> DrawResult {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&theme.background)?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(8)
        .caption(&panel.title, (FONT, 16).into_font().color(&theme.foreground))
        .x_label_area_size(28)
        .y_label_area_size(52);

    let x_range = axes.x.0..axes.x.1;
    if axes.y_log {
        let mut chart = builder.build_cartesian_2d(x_range, (axes.y.0..axes.y.1).log_scale())?;
        chart
            .configure_mesh()
            .light_line_style(theme.grid)
            .bold_line_style(theme.grid)
            .axis_style(theme.foreground)
            .label_style((FONT, 12).into_font().color(&theme.foreground))
            .y_label_formatter(&|v| format!("{v:.1e}"))
            .draw()?;
        draw_content(&mut chart, panel, axes, theme)?;
    } else {
        let mut chart = builder.build_cartesian_2d(x_range, axes.y.0..axes.y.1)?;
        chart
            .configure_mesh()
            .light_line_style(theme.grid)
            .bold_line_style(theme.grid)
            .axis_style(theme.foreground)
            .label_style((FONT, 12).into_font().color(&theme.foreground))
            .draw()?;
        draw_content(&mut chart, panel, axes, theme)?;
    }

    root.present()?;
    Ok(())
}

fn draw_content<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    panel: &PanelSpec,
    axes: &AxisBounds,
    theme: &Theme,
) -> DrawResult
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    // anything at or below zero has no place on a log axis
    let floor = if axes.y_log { Some(axes.y.0) } else { None };

    for (index, series) in panel.series.iter().enumerate() {
        let color = theme.series_color(index);

        if let Some(band) = &series.band {
            chart.draw_series(std::iter::once(Polygon::new(
                band_outline(band, floor),
                color.mix(BAND_ALPHA).filled(),
            )))?;
        }
        if let Some(band) = &series.inner_band {
            chart.draw_series(std::iter::once(Polygon::new(
                band_outline(band, floor),
                color.mix(INNER_BAND_ALPHA).filled(),
            )))?;
        }

        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .filter(|(_, v)| v.is_finite() && floor.is_none_or(|_| *v > 0.0))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
    }

    if panel.legend && !panel.series.is_empty() {
        chart
            .configure_series_labels()
            .position(legend_position(axes.legend))
            .background_style(theme.background.mix(0.8))
            .border_style(theme.foreground)
            .label_font((FONT, 12).into_font().color(&theme.foreground))
            .draw()?;
    }

    Ok(())
}

fn band_outline(band: &Band, floor: Option<f64>) -> Vec<(f64, f64)> {
    let clamp = |v: f64| floor.map_or(v, |f| v.max(f));
    let len = band.len();
    let mut outline = Vec::with_capacity(len * 2);
    for i in 0..len {
        outline.push((i as f64, clamp(band.lo[i])));
    }
    for i in (0..len).rev() {
        outline.push((i as f64, clamp(band.hi[i])));
    }
    outline.retain(|(_, y)| y.is_finite());
    outline
}

fn legend_position(location: LegendLocation) -> SeriesLabelPosition {
    match location {
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLocation::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLocation::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLocation::Center => SeriesLabelPosition::MiddleMiddle,
    }
}
