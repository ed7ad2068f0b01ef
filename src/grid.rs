//! Grid cell layout.
//!
//! The usable screen area is divided into `columns × rows` equal cells.  A
//! [`GridCell`] selects a block of cells by its top-left cell and its span;
//! [`cell_to_rect`] turns it into a pixel rectangle and [`rect_to_cell`]
//! snaps an arbitrary rectangle back to the nearest cell.
//!
//! Margins only shrink the visible rectangle inside its block of cells.  The
//! tiling itself always covers the usable area exactly, with no gaps and no
//! overlap.
//!
//! [`GridConfig::columns`] (the grid granularity) is the only value in here
//! that lives longer than a single call.  It changes through
//! [`resize_grid`] / [`GridConfig::resize`] only.

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Column count a fresh configuration starts with.
pub const DEFAULT_COLUMNS: u32 = 6;
/// Two horizontal bands: top half and bottom half.
pub const DEFAULT_ROWS: u32 = 2;
/// Inset applied on every side of a grid rectangle.
pub const DEFAULT_MARGIN: f64 = 5.0;

/// Grid granularity and margins.
///
/// # Example
///
/// ```json
/// { "columns": 6, "rows": 2, "margin_x": 5.0, "margin_y": 5.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of equal-width columns.  Always at least 1.
    pub columns: u32,
    /// Number of equal-height rows.  Always at least 1.
    pub rows: u32,
    /// Horizontal inset on the left and right of each grid rectangle.
    pub margin_x: f64,
    /// Vertical inset on the top and bottom of each grid rectangle.
    pub margin_y: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            margin_x: DEFAULT_MARGIN,
            margin_y: DEFAULT_MARGIN,
        }
    }
}

impl GridConfig {
    /// Size of one cell on `screen`.
    pub fn cell_size(&self, screen: Rect) -> Size {
        Size::new(
            screen.width / f64::from(self.columns.max(1)),
            screen.height / f64::from(self.rows.max(1)),
        )
    }

    /// Change the column count by `delta` in place, never going below 1.
    ///
    /// Returns the new column count.
    pub fn resize(&mut self, delta: i32) -> u32 {
        *self = resize_grid(*self, delta);
        self.columns
    }

    /// Copy with zero counts raised to 1 and negative (or NaN) margins set
    /// to 0.
    pub fn validated(self) -> Self {
        Self {
            columns: self.columns.max(1),
            rows: self.rows.max(1),
            margin_x: self.margin_x.max(0.0),
            margin_y: self.margin_y.max(0.0),
        }
    }
}

/// A block of grid cells.
///
/// `column`/`row` address the top-left cell (0-indexed); the spans count how
/// many cells the block covers.  Cells are derived from a window's frame on
/// demand and are not meant to be kept around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub column: i32,
    pub row: i32,
    pub column_span: i32,
    pub row_span: i32,
}

impl GridCell {
    pub fn new(column: i32, row: i32, column_span: i32, row_span: i32) -> Self {
        Self {
            column,
            row,
            column_span,
            row_span,
        }
    }
}

/// Pixel rectangle for `cell` on `screen`, with the margins applied.
///
/// The cell is used as given.  A cell that runs past the last column or row
/// yields a rectangle that runs past the screen edge; use [`clamp_cell`]
/// first when the cell comes from an untrusted source.  Margins large enough
/// to eat the whole block produce a zero-size rectangle.
pub fn cell_to_rect(cell: GridCell, screen: Rect, config: &GridConfig) -> Rect {
    let cell_size = config.cell_size(screen);
    Rect::new(
        f64::from(cell.column) * cell_size.width + screen.x + config.margin_x,
        f64::from(cell.row) * cell_size.height + screen.y + config.margin_y,
        f64::from(cell.column_span) * cell_size.width - 2.0 * config.margin_x,
        f64::from(cell.row_span) * cell_size.height - 2.0 * config.margin_y,
    )
    .clamped()
}

/// Nearest grid cell for `rect` on `screen`.
///
/// Every field is rounded on its own (half away from zero).  Spans are at
/// least 1; the position is not clamped to the grid.  A zero-size `screen`
/// makes the cell size zero and the result meaningless.
pub fn rect_to_cell(rect: Rect, screen: Rect, config: &GridConfig) -> GridCell {
    let cell_size = config.cell_size(screen);
    GridCell {
        column: round_to_i32((rect.x - screen.x) / cell_size.width),
        row: round_to_i32((rect.y - screen.y) / cell_size.height),
        column_span: round_to_i32(rect.width / cell_size.width).max(1),
        row_span: round_to_i32(rect.height / cell_size.height).max(1),
    }
}

/// `config` with `delta` added to its column count, floored at 1.
pub fn resize_grid(config: GridConfig, delta: i32) -> GridConfig {
    let columns = (i64::from(config.columns) + i64::from(delta)).clamp(1, i64::from(u32::MAX));
    GridConfig {
        columns: u32::try_from(columns).unwrap_or(u32::MAX),
        ..config
    }
}

/// Pull `cell` inside the grid.
///
/// Spans are limited to `1..=columns` / `1..=rows`, then the position is
/// moved so that `column + column_span <= columns` and
/// `row + row_span <= rows`.
pub fn clamp_cell(cell: GridCell, config: &GridConfig) -> GridCell {
    let columns = count_to_i32(config.columns);
    let rows = count_to_i32(config.rows);
    let column_span = cell.column_span.clamp(1, columns);
    let row_span = cell.row_span.clamp(1, rows);
    GridCell {
        column: cell.column.clamp(0, columns - column_span),
        row: cell.row.clamp(0, rows - row_span),
        column_span,
        row_span,
    }
}

/// Snap `rect` to the rectangle of its nearest in-bounds cell.
pub fn snap_rect(rect: Rect, screen: Rect, config: &GridConfig) -> Rect {
    let cell = clamp_cell(rect_to_cell(rect, screen, config), config);
    cell_to_rect(cell, screen, config)
}

//  Internal

/// `f64 as i32` saturates and maps NaN to 0.
fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

fn count_to_i32(count: u32) -> i32 {
    i32::try_from(count.max(1)).unwrap_or(i32::MAX)
}

//  Tests
