//! Column widths and row heights of a table.

use std::fmt;

use log::warn;

use crate::layout::coord::GridSize;

/// Width of one column as declared in `colWidths`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Share of the table width, in percent (`25%`).
    Relative(f32),
    /// Fixed width in points.
    Absolute(f32),
    /// Left to the document model.
    Auto,
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnWidth::Relative(percent) => write!(f, "{}%", percent),
            ColumnWidth::Absolute(points) => write!(f, "{}pt", points),
            ColumnWidth::Auto => f.write_str("auto"),
        }
    }
}

/// Height of one row as declared in `rowHeights`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    /// Fixed height in points.
    Fixed(f32),
    /// Sized to its content.
    Optimal,
}

impl fmt::Display for RowHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowHeight::Fixed(points) => write!(f, "{}pt", points),
            RowHeight::Optimal => f.write_str("optimal"),
        }
    }
}

/// One width per column and one height per row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDimensions {
    columns: Vec<ColumnWidth>,
    rows: Vec<RowHeight>,
}

impl TableDimensions {
    /// Auto widths and optimal heights for every column and row of `grid`.
    pub fn new(grid: GridSize) -> Self {
        TableDimensions {
            columns: vec![ColumnWidth::Auto; grid.columns],
            rows: vec![RowHeight::Optimal; grid.rows],
        }
    }

    /// Fits declared widths and heights onto `grid`.
    ///
    /// # Arguments
    ///
    /// * `grid` - The table extent the lists are matched against.
    /// * `widths` - Declared column widths, first column first.
    /// * `heights` - Declared row heights, `None` where a row is left to its content.
    ///
    /// # Returns
    ///
    /// Dimensions with exactly one entry per column and per row. A short list
    /// leaves the remaining columns `Auto` and rows `Optimal`. A width list whose
    /// length differs from the column count is logged, and extra entries dropped.
    pub fn fit(grid: GridSize, widths: &[ColumnWidth], heights: &[Option<f32>]) -> Self {
        let mut dimensions = TableDimensions::new(grid);
        if !widths.is_empty() && widths.len() != grid.columns {
            warn!(
                "colWidths has {} entries for {} columns",
                widths.len(),
                grid.columns
            );
        }
        for (slot, width) in dimensions.columns.iter_mut().zip(widths) {
            *slot = *width;
        }
        for (slot, height) in dimensions.rows.iter_mut().zip(heights) {
            if let Some(points) = height {
                *slot = RowHeight::Fixed(*points);
            }
        }
        dimensions
    }

    pub fn column_widths(&self) -> &[ColumnWidth] {
        &self.columns
    }

    pub fn row_heights(&self) -> &[RowHeight] {
        &self.rows
    }
}
