//! Merge-aware border placement for `Line` commands.
//!
//! Borders of a merged region always land on its origin cell, the one cell the
//! emitter actually writes out. Hidden cells only receive borders from the
//! single-edge kinds, which apply per physical cell.

use crate::layout::command::LineKind;
use crate::layout::coord::{CellRange, GridPos};
use crate::layout::span::SpanMap;
use crate::layout::style::StyleMap;
use crate::layout::value::{Border, Edge};

pub(crate) fn apply_line(
    styles: &mut StyleMap,
    spans: &SpanMap,
    range: CellRange,
    kind: LineKind,
    border: &Border,
) {
    match kind {
        LineKind::Grid => {
            inner_grid(styles, spans, range, border);
            outline(styles, spans, range, border);
        }
        LineKind::InnerGrid => inner_grid(styles, spans, range, border),
        LineKind::Box | LineKind::Outline => outline(styles, spans, range, border),
        LineKind::Below => single_edge(styles, range, Edge::Bottom, border),
        LineKind::Above => single_edge(styles, range, Edge::Top, border),
        LineKind::Before => single_edge(styles, range, Edge::Left, border),
        LineKind::After => single_edge(styles, range, Edge::Right, border),
    }
}

/// Draws the lines between cells of `range`, excluding its outer box.
///
/// A right (bottom) border is added only where the merged region of a cell ends
/// strictly before the right (bottom) edge of `range`, so no border is ever
/// placed inside a merged region.
fn inner_grid(styles: &mut StyleMap, spans: &SpanMap, range: CellRange, border: &Border) {
    for pos in range.cells() {
        let origin = spans.origin_of(pos);
        let bottom_right = spans.bottom_right_of(pos);
        if bottom_right.col < range.right() {
            set(styles, origin, Edge::Right, border);
        }
        if bottom_right.row < range.bottom() {
            set(styles, origin, Edge::Bottom, border);
        }
    }
}

/// Draws the outer box of `range` on the origin cells along each side.
fn outline(styles: &mut StyleMap, spans: &SpanMap, range: CellRange, border: &Border) {
    for row in range.top()..=range.bottom() {
        set(styles, spans.origin_of(GridPos::new(range.left(), row)), Edge::Left, border);
        set(styles, spans.origin_of(GridPos::new(range.right(), row)), Edge::Right, border);
    }
    for col in range.left()..=range.right() {
        set(styles, spans.origin_of(GridPos::new(col, range.top())), Edge::Top, border);
        set(styles, spans.origin_of(GridPos::new(col, range.bottom())), Edge::Bottom, border);
    }
}

fn single_edge(styles: &mut StyleMap, range: CellRange, edge: Edge, border: &Border) {
    for pos in range.cells() {
        set(styles, pos, edge, border);
    }
}

fn set(styles: &mut StyleMap, pos: GridPos, edge: Edge, border: &Border) {
    if let Some(style) = styles.get_mut(pos) {
        style.set_border(edge, *border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::command::{CommandProps, CommandSet, RangeCommand};
    use crate::layout::coord::{GridSize, RawCoord};
    use crate::layout::span::SpanInfo;
    use crate::layout::value::{Color, LinePattern};
    use crate::layout::SpanPolicy;

    fn line(start: (i64, i64), stop: (i64, i64), kind: LineKind, border: Border) -> RangeCommand {
        RangeCommand::new(
            RawCoord::new(start.0, start.1),
            RawCoord::new(stop.0, stop.1),
            CommandProps::Line { kind, border },
        )
    }

    fn span(start: (i64, i64), stop: (i64, i64)) -> RangeCommand {
        RangeCommand::new(
            RawCoord::new(start.0, start.1),
            RawCoord::new(stop.0, stop.1),
            CommandProps::Span,
        )
    }

    fn resolve(grid: GridSize, commands: Vec<RangeCommand>) -> (SpanMap, StyleMap) {
        let commands: CommandSet = commands.into_iter().collect();
        let spans = SpanMap::build(grid, &commands, SpanPolicy::Compatible);
        let styles = StyleMap::build(grid, &commands, &spans);
        (spans, styles)
    }

    fn edges(styles: &StyleMap, col: usize, row: usize) -> Vec<Edge> {
        let style = styles.get(GridPos::new(col, row)).unwrap();
        Edge::ALL
            .into_iter()
            .filter(|edge| style.border(*edge).is_some())
            .collect()
    }

    #[test]
    fn test_grid_without_spans() {
        let (_, styles) = resolve(
            GridSize::new(2, 2),
            vec![line((0, 0), (-1, -1), LineKind::Grid, Border::default())],
        );
        assert_eq!(edges(&styles, 0, 0), vec![Edge::Left, Edge::Right, Edge::Top, Edge::Bottom]);
        assert_eq!(edges(&styles, 1, 0), vec![Edge::Right, Edge::Top, Edge::Bottom]);
        assert_eq!(edges(&styles, 0, 1), vec![Edge::Left, Edge::Right, Edge::Bottom]);
        assert_eq!(edges(&styles, 1, 1), vec![Edge::Right, Edge::Bottom]);
    }

    #[test]
    fn test_inner_grid_excludes_outer_box() {
        let (_, styles) = resolve(
            GridSize::new(3, 3),
            vec![line((0, 0), (-1, -1), LineKind::InnerGrid, Border::default())],
        );
        assert_eq!(edges(&styles, 0, 0), vec![Edge::Right, Edge::Bottom]);
        assert_eq!(edges(&styles, 2, 0), vec![Edge::Bottom]);
        assert_eq!(edges(&styles, 0, 2), vec![Edge::Right]);
        assert!(edges(&styles, 2, 2).is_empty());
    }

    #[test]
    fn test_grid_with_vertical_span_has_no_internal_border() {
        let (spans, styles) = resolve(
            GridSize::new(3, 4),
            vec![
                line((0, 0), (-1, -1), LineKind::Grid, Border::default()),
                span((1, 1), (1, 2)),
            ],
        );
        assert_eq!(
            *spans.get(GridPos::new(1, 2)).unwrap(),
            SpanInfo::Hidden {
                origin: GridPos::new(1, 1)
            }
        );
        // The merged cell's bottom border is its true bottom edge at row 2.
        assert_eq!(edges(&styles, 1, 1), vec![Edge::Right, Edge::Bottom]);
        // Nothing is drawn on the covered cell, so no line between rows 1 and 2.
        assert!(edges(&styles, 1, 2).is_empty());
        assert_eq!(edges(&styles, 1, 0), vec![Edge::Right, Edge::Top, Edge::Bottom]);
    }

    #[test]
    fn test_inner_grid_never_borders_inside_a_merge() {
        let (spans, styles) = resolve(
            GridSize::new(10, 9),
            vec![
                span((0, 0), (2, 0)),
                span((-2, 0), (-1, -1)),
                span((3, 3), (6, 6)),
                line((0, 0), (-1, -1), LineKind::InnerGrid, Border::default()),
            ],
        );
        for (pos, info) in spans.iter() {
            if let SpanInfo::Hidden { .. } = info {
                assert!(edges(&styles, pos.col, pos.row).is_empty());
            }
        }
        // (3,3)-(6,6) ends at column 6 and row 6, both inside the table.
        assert_eq!(edges(&styles, 3, 3), vec![Edge::Right, Edge::Bottom]);
        // (8,0)-(9,8) touches the right and bottom edges of the table.
        assert!(edges(&styles, 8, 0).is_empty());
        assert_eq!(edges(&styles, 0, 0), vec![Edge::Right, Edge::Bottom]);
    }

    #[test]
    fn test_outline_lands_on_origin_cells() {
        let (_, styles) = resolve(
            GridSize::new(4, 4),
            vec![
                span((2, 1), (3, 3)),
                line((1, 0), (-1, -1), LineKind::Outline, Border::default()),
            ],
        );
        // Right and bottom sides of the range run through hidden cells of the merge.
        assert_eq!(edges(&styles, 2, 1), vec![Edge::Right, Edge::Bottom]);
        assert!(edges(&styles, 3, 3).is_empty());
        assert_eq!(edges(&styles, 1, 0), vec![Edge::Left, Edge::Top]);
        assert_eq!(edges(&styles, 1, 3), vec![Edge::Left, Edge::Bottom]);
        assert_eq!(edges(&styles, 3, 0), vec![Edge::Right, Edge::Top]);
        assert!(edges(&styles, 0, 0).is_empty());
    }

    #[test]
    fn test_single_edge_lines_apply_per_physical_cell() {
        let below = Border {
            thickness: 2.0,
            pattern: LinePattern::Double,
            color: Some(Color::BLACK),
        };
        let (_, styles) = resolve(
            GridSize::new(3, 2),
            vec![
                span((0, 0), (1, 0)),
                line((0, 0), (-1, 0), LineKind::Below, below),
                line((0, 0), (0, -1), LineKind::Before, Border::default()),
            ],
        );
        for col in 0..3 {
            assert_eq!(
                styles.get(GridPos::new(col, 0)).unwrap().border(Edge::Bottom),
                Some(&below)
            );
        }
        assert_eq!(edges(&styles, 1, 0), vec![Edge::Bottom]);
        assert_eq!(edges(&styles, 0, 1), vec![Edge::Left]);
    }

    #[test]
    fn test_later_line_overwrites_border() {
        let thin = Border {
            thickness: 0.5,
            ..Border::default()
        };
        let thick = Border {
            thickness: 2.0,
            ..Border::default()
        };
        let (_, styles) = resolve(
            GridSize::new(2, 2),
            vec![
                line((0, 0), (-1, -1), LineKind::Grid, thin),
                line((0, 0), (-1, -1), LineKind::Outline, thick),
            ],
        );
        let top_left = styles.get(GridPos::new(0, 0)).unwrap();
        assert_eq!(top_left.border(Edge::Top), Some(&thick));
        assert_eq!(top_left.border(Edge::Right), Some(&thin));
    }
}
