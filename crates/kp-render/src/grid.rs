//! Parallel panel rendering and grid compositing.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use kp_core::timing::Timer;
use plotters::prelude::BitMapBackend;
use plotters_backend::DrawingBackend;
use rayon::prelude::*;

use crate::directives::{RenderDirective, figure_style};
use crate::layout::{GridLayout, cell_pixels};
use crate::panel::{rasterize, resolve_axes};
use crate::plan::PanelSpec;
use crate::theme::Theme;
use crate::{RenderError, RenderResult};

/// Packed 8-bit RGB image, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbBitmap {
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 3);
        for _ in 0..count {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Copy `src` with its top-left corner at (`x0`, `y0`), clipped to this image.
    pub fn blit(&mut self, src: &RgbBitmap, x0: u32, y0: u32) {
        if x0 >= self.width || y0 >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x0) as usize;
        let rows = src.height.min(self.height - y0) as usize;
        for row in 0..rows {
            let from = row * src.width as usize * 3;
            let to = ((y0 as usize + row) * self.width as usize + x0 as usize) * 3;
            self.pixels[to..to + cols * 3].copy_from_slice(&src.pixels[from..from + cols * 3]);
        }
    }
}

/// Map `f` over `items` on the rayon pool, keeping input order in the output.
pub fn ordered_par_map<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Place panel bitmaps into a grid canvas, panel `i` at cell `(i / cols, i % cols)`.
///
/// Missing bitmaps and unused trailing cells keep the background.
pub fn composite(
    layout: GridLayout,
    cell: (u32, u32),
    bitmaps: &[Option<RgbBitmap>],
    background: [u8; 3],
) -> RgbBitmap {
    let width = cell.0 * layout.cols as u32;
    let height = cell.1 * layout.rows as u32;
    let mut canvas = RgbBitmap::filled(width, height, background);
    for (index, bitmap) in bitmaps.iter().enumerate().take(layout.capacity()) {
        if let Some(bitmap) = bitmap {
            let (row, col) = layout.cell(index);
            canvas.blit(bitmap, col as u32 * cell.0, row as u32 * cell.1);
        }
    }
    canvas
}

/// Write the canvas to `path` as a PNG.
pub fn encode_png(canvas: &RgbBitmap, path: &Path) -> RenderResult<()> {
    let encode_err = |message: String| RenderError::Encode {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| encode_err(e.to_string()))?;
    }

    let size = (canvas.width(), canvas.height());
    let mut backend = BitMapBackend::new(path, size);
    backend
        .blit_bitmap((0, 0), size, canvas.as_bytes())
        .map_err(|e| encode_err(e.to_string()))?;
    backend.present().map_err(|e| encode_err(e.to_string()))?;
    Ok(())
}

/// Everything needed to draw one figure.
#[derive(Debug, Clone)]
pub struct GridRequest<'a> {
    pub panels: &'a [PanelSpec],
    pub directives: &'a [RenderDirective],
    /// Terminal size in pixels.
    pub terminal_px: (u32, u32),
    pub pixel_scale: f64,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOutput {
    pub path: PathBuf,
    pub layout: GridLayout,
    pub width: u32,
    pub height: u32,
    /// Panel titles in grid order.
    pub panels: Vec<String>,
    /// Metrics whose panel could not be drawn and were left blank.
    pub failed: Vec<String>,
}

/// Render every panel in parallel and write the composited grid.
pub fn render_grid(request: &GridRequest<'_>) -> RenderResult<GridOutput> {
    let count = NonZeroUsize::new(request.panels.len()).ok_or(RenderError::EmptyMetricSet)?;
    let timer = Timer::start("render");

    let theme = Theme::for_style(figure_style(request.directives));
    let layout = GridLayout::for_count(count);
    let cell = cell_pixels(layout, request.terminal_px, request.pixel_scale);
    tracing::debug!(
        rows = layout.rows,
        cols = layout.cols,
        cell_w = cell.0,
        cell_h = cell.1,
        "grid layout"
    );

    let rendered = ordered_par_map(request.panels, |panel| {
        let axes = resolve_axes(panel, request.directives);
        rasterize(panel, &axes, &theme, cell)
    });

    let mut failed = Vec::new();
    let bitmaps: Vec<Option<RgbBitmap>> = rendered
        .into_iter()
        .zip(request.panels)
        .map(|(result, panel)| match result {
            Ok(bitmap) => Some(bitmap),
            Err(err) => {
                tracing::warn!(metric = %panel.metric, error = %err, "panel left blank");
                failed.push(panel.metric.clone());
                None
            }
        })
        .collect();

    let canvas = composite(layout, cell, &bitmaps, theme.background_rgb());
    encode_png(&canvas, &request.output)?;

    tracing::info!(
        path = %request.output.display(),
        panels = request.panels.len(),
        failed = failed.len(),
        "rendered grid"
    );
    timer.stop_and_log();

    Ok(GridOutput {
        path: request.output.clone(),
        layout,
        width: canvas.width(),
        height: canvas.height(),
        panels: request.panels.iter().map(|p| p.title.clone()).collect(),
        failed,
    })
}
