//! Grid sizing.

use std::num::NonZeroUsize;

/// Rows and columns of the panel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Grid for `count` panels.
    ///
    /// Even counts that are not multiples of six get two columns; everything
    /// else gets up to three. Rows follow from the column count.
    pub fn for_count(count: NonZeroUsize) -> Self {
        let n = count.get();
        let cols = if n % 2 == 0 && n % 6 != 0 { 2 } else { n.min(3) };
        let rows = n.div_ceil(cols);
        Self { rows, cols }
    }

    /// Row and column of panel `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

/// Figure size for a grid, in the units of `pixel_scale`.
///
/// The width spans the terminal. The height spans it for up to two rows and
/// grows with `rows / 2` beyond that so panels stay roughly square.
pub fn panel_size(
    rows: usize,
    _cols: usize,
    terminal_x: f64,
    terminal_y: f64,
    pixel_scale: f64,
) -> (f64, f64) {
    let width = terminal_x * pixel_scale - 1.0;
    let height = if rows <= 2 {
        terminal_y * pixel_scale - 1.0
    } else {
        (rows as f64 * terminal_y * pixel_scale) / 2.0 - 1.0
    };
    (width, height)
}

/// Smallest cell edge the renderer will draw into, in pixels.
pub const MIN_CELL_PX: u32 = 32;

/// Pixel size of one grid cell for a terminal of `terminal_px` pixels.
pub fn cell_pixels(layout: GridLayout, terminal_px: (u32, u32), pixel_scale: f64) -> (u32, u32) {
    let (width, height) = panel_size(
        layout.rows,
        layout.cols,
        terminal_px.0 as f64,
        terminal_px.1 as f64,
        pixel_scale,
    );
    let cell_w = (width.max(0.0) / layout.cols as f64).floor() as u32;
    let cell_h = (height.max(0.0) / layout.rows as f64).floor() as u32;
    (cell_w.max(MIN_CELL_PX), cell_h.max(MIN_CELL_PX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(n: usize) -> (usize, usize) {
        let grid = GridLayout::for_count(NonZeroUsize::new(n).expect("non-zero"));
        (grid.rows, grid.cols)
    }

    #[test]
    fn small_counts_match_table() {
        assert_eq!(layout(1), (1, 1));
        assert_eq!(layout(2), (1, 2));
        assert_eq!(layout(3), (1, 3));
        assert_eq!(layout(4), (2, 2));
        assert_eq!(layout(5), (2, 3));
        assert_eq!(layout(6), (2, 3));
        assert_eq!(layout(7), (3, 3));
        assert_eq!(layout(8), (4, 2));
    }

    #[test]
    fn multiples_of_six_use_three_columns() {
        assert_eq!(layout(12), (4, 3));
        assert_eq!(layout(18), (6, 3));
        assert_eq!(layout(10), (5, 2));
    }

    #[test]
    fn cells_fill_row_major() {
        let grid = GridLayout::for_count(NonZeroUsize::new(5).unwrap());
        assert_eq!(grid.cell(0), (0, 0));
        assert_eq!(grid.cell(2), (0, 2));
        assert_eq!(grid.cell(3), (1, 0));
        assert_eq!(grid.cell(4), (1, 1));
        assert_eq!(grid.capacity(), 6);
    }

    #[test]
    fn figure_height_grows_past_two_rows() {
        assert_eq!(panel_size(1, 1, 1000.0, 600.0, 1.0), (999.0, 599.0));
        assert_eq!(panel_size(2, 2, 1000.0, 600.0, 1.0), (999.0, 599.0));
        assert_eq!(panel_size(3, 3, 1000.0, 600.0, 1.0), (999.0, 899.0));
        assert_eq!(panel_size(4, 2, 1000.0, 600.0, 0.5), (499.0, 599.0));
    }

    #[test]
    fn cell_pixels_split_the_figure() {
        let grid = GridLayout::for_count(NonZeroUsize::new(4).unwrap());
        assert_eq!(cell_pixels(grid, (1001, 601), 1.0), (500, 300));
        // tiny terminals still get drawable cells
        assert_eq!(cell_pixels(grid, (10, 10), 1.0), (MIN_CELL_PX, MIN_CELL_PX));
    }

    #[test]
    fn layout_is_deterministic() {
        for n in 1..50 {
            assert_eq!(layout(n), layout(n));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn grid_holds_every_panel(n in 1usize..500) {
            let grid = GridLayout::for_count(NonZeroUsize::new(n).unwrap());
            prop_assert!(grid.rows * grid.cols >= n);
            prop_assert!(grid.cols >= 1 && grid.cols <= 3);
            // no fully empty trailing row
            prop_assert!((grid.rows - 1) * grid.cols < n);
        }
    }
}
