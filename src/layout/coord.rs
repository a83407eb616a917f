use std::fmt;
use thiserror::Error;

/// Errors raised while turning a raw `start`/`stop` pair into grid coordinates.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoordError {
    /// A component is a symbolic token (e.g. `splitlast`) rather than an integer.
    #[error("unsupported coordinate: {0}")]
    UnsupportedCoordinate(String),
    /// A component lies outside the grid after normalization.
    #[error("{axis} {value} is out of range for a grid with {len} {axis}s")]
    OutOfRange {
        axis: &'static str,
        value: i64,
        len: usize,
    },
}

/// One component of a raw coordinate as written in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordComponent {
    Index(i64),
    Symbol(String),
}

impl CoordComponent {
    fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.parse::<i64>() {
            Ok(value) => CoordComponent::Index(value),
            Err(_) => CoordComponent::Symbol(text.to_string()),
        }
    }
}

impl fmt::Display for CoordComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordComponent::Index(value) => write!(f, "{}", value),
            CoordComponent::Symbol(symbol) => f.write_str(symbol),
        }
    }
}

/// A `(col, row)` pair before normalization; either part may be negative or symbolic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCoord {
    pub col: CoordComponent,
    pub row: CoordComponent,
}

impl RawCoord {
    pub fn new(col: i64, row: i64) -> Self {
        RawCoord {
            col: CoordComponent::Index(col),
            row: CoordComponent::Index(row),
        }
    }

    /// The whole-table default for a missing `start` attribute.
    pub fn first() -> Self {
        RawCoord::new(0, 0)
    }

    /// The whole-table default for a missing `stop` attribute.
    pub fn last() -> Self {
        RawCoord::new(-1, -1)
    }

    /// Parses the `col,row` attribute form.
    ///
    /// Non-integer components are kept as symbols. Text that is not a pair at all
    /// becomes a symbol on both axes. Either way the failure only surfaces when the
    /// owning command is normalized against a grid, and only that command is lost.
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.trim().is_empty()) {
            let symbol = CoordComponent::Symbol(text.trim().to_string());
            return RawCoord {
                col: symbol.clone(),
                row: symbol,
            };
        }
        RawCoord {
            col: CoordComponent::parse(parts[0]),
            row: CoordComponent::parse(parts[1]),
        }
    }
}

impl fmt::Display for RawCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

/// Absolute, zero-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub col: usize,
    pub row: usize,
}

impl GridPos {
    pub fn new(col: usize, row: usize) -> Self {
        GridPos { col, row }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Extent of a table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn new(columns: usize, rows: usize) -> Self {
        GridSize { columns, rows }
    }

    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col < self.columns && pos.row < self.rows
    }

    /// Row-major offset of `pos` in a flat per-cell array.
    pub(crate) fn offset(&self, pos: GridPos) -> usize {
        pos.row * self.columns + pos.col
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| GridPos::new(col, row)))
    }
}

/// A normalized rectangle with `start <= stop` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: GridPos,
    pub stop: GridPos,
}

impl CellRange {
    pub fn new(start: GridPos, stop: GridPos) -> Self {
        CellRange {
            start: GridPos::new(start.col.min(stop.col), start.row.min(stop.row)),
            stop: GridPos::new(start.col.max(stop.col), start.row.max(stop.row)),
        }
    }

    /// Normalizes a raw `start`/`stop` pair against `grid`.
    ///
    /// Negative components count from the far edge. Both axes are sorted after
    /// normalization, so the result always satisfies `start <= stop`.
    pub fn normalize(
        start: &RawCoord,
        stop: &RawCoord,
        grid: GridSize,
    ) -> Result<Self, CoordError> {
        let (start_col, stop_col) = sort_pair(
            normalize_component(&start.col, grid.columns, "column")?,
            normalize_component(&stop.col, grid.columns, "column")?,
        );
        let (start_row, stop_row) = sort_pair(
            normalize_component(&start.row, grid.rows, "row")?,
            normalize_component(&stop.row, grid.rows, "row")?,
        );
        Ok(CellRange {
            start: GridPos::new(start_col, start_row),
            stop: GridPos::new(stop_col, stop_row),
        })
    }

    pub fn left(&self) -> usize {
        self.start.col
    }

    pub fn right(&self) -> usize {
        self.stop.col
    }

    pub fn top(&self) -> usize {
        self.start.row
    }

    pub fn bottom(&self) -> usize {
        self.stop.row
    }

    pub fn col_span(&self) -> usize {
        self.stop.col - self.start.col + 1
    }

    pub fn row_span(&self) -> usize {
        self.stop.row - self.start.row + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.stop
    }

    /// Positions inside the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> {
        let (left, right) = (self.left(), self.right());
        (self.top()..=self.bottom())
            .flat_map(move |row| (left..=right).map(move |col| GridPos::new(col, row)))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

fn sort_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn normalize_component(
    component: &CoordComponent,
    len: usize,
    axis: &'static str,
) -> Result<usize, CoordError> {
    let value = match component {
        CoordComponent::Index(value) => *value,
        CoordComponent::Symbol(symbol) => {
            return Err(CoordError::UnsupportedCoordinate(symbol.clone()))
        }
    };
    let absolute = if value < 0 { len as i64 + value } else { value };
    if absolute < 0 || absolute >= len as i64 {
        return Err(CoordError::OutOfRange { axis, value, len });
    }
    Ok(absolute as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: (i64, i64), stop: (i64, i64), grid: GridSize) -> Result<CellRange, CoordError> {
        CellRange::normalize(
            &RawCoord::new(start.0, start.1),
            &RawCoord::new(stop.0, stop.1),
            grid,
        )
    }

    #[test]
    fn test_raw_coord_parse() {
        assert_eq!(RawCoord::parse("0,1"), RawCoord::new(0, 1));
        assert_eq!(RawCoord::parse(" -2 , -1 "), RawCoord::new(-2, -1));

        let symbolic = RawCoord::parse("0,splitlast");
        assert_eq!(symbolic.col, CoordComponent::Index(0));
        assert_eq!(symbolic.row, CoordComponent::Symbol("splitlast".to_string()));

        let malformed = RawCoord::parse("3");
        assert_eq!(malformed.col, CoordComponent::Symbol("3".to_string()));
        assert_eq!(malformed.row, CoordComponent::Symbol("3".to_string()));
        assert_eq!(
            RawCoord::parse("1,2,3").col,
            CoordComponent::Symbol("1,2,3".to_string())
        );
    }

    #[test]
    fn test_malformed_coordinate_is_unsupported() {
        let grid = GridSize::new(5, 4);
        for text in ["0", "1,2,3", ",2"] {
            let err = CellRange::normalize(&RawCoord::parse(text), &RawCoord::last(), grid)
                .unwrap_err();
            assert_eq!(err, CoordError::UnsupportedCoordinate(text.to_string()));
        }
    }

    #[test]
    fn test_normalize_negative_coordinates() {
        let grid = GridSize::new(10, 9);
        let r = range((-2, 0), (-1, -1), grid).unwrap();
        assert_eq!(r.start, GridPos::new(8, 0));
        assert_eq!(r.stop, GridPos::new(9, 8));
        assert_eq!(r.col_span(), 2);
        assert_eq!(r.row_span(), 9);
    }

    #[test]
    fn test_normalize_sorts_components() {
        let grid = GridSize::new(5, 4);
        let r = range((-1, 3), (1, 0), grid).unwrap();
        assert_eq!(r.start, GridPos::new(1, 0));
        assert_eq!(r.stop, GridPos::new(4, 3));
    }

    #[test]
    fn test_normalize_symbolic_is_unsupported() {
        let grid = GridSize::new(5, 4);
        let start = RawCoord::parse("0,splitfirst");
        let err = CellRange::normalize(&start, &RawCoord::last(), grid).unwrap_err();
        assert_eq!(err, CoordError::UnsupportedCoordinate("splitfirst".to_string()));
    }

    #[test]
    fn test_normalize_out_of_range() {
        let grid = GridSize::new(5, 4);
        assert_eq!(
            range((0, 0), (5, 0), grid),
            Err(CoordError::OutOfRange {
                axis: "column",
                value: 5,
                len: 5
            })
        );
        assert!(range((0, -5), (0, 0), grid).is_err());
    }

    #[test]
    fn test_cells_row_major() {
        let r = CellRange::new(GridPos::new(1, 2), GridPos::new(0, 1));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                GridPos::new(0, 1),
                GridPos::new(1, 1),
                GridPos::new(0, 2),
                GridPos::new(1, 2)
            ]
        );
    }

    #[test]
    fn test_grid_positions() {
        let grid = GridSize::new(2, 2);
        assert_eq!(grid.cell_count(), 4);
        assert_eq!(grid.positions().count(), 4);
        assert_eq!(grid.offset(GridPos::new(1, 1)), 3);
        assert!(!grid.contains(GridPos::new(2, 0)));
    }
}
