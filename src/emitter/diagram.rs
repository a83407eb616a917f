use anyhow::Result;

use crate::emitter::base::CellEmitter;
use crate::layout::coord::GridPos;
use crate::layout::span::SpanInfo;
use crate::layout::style::CellStyle;

/// Renders the span map as a text grid.
///
/// Regular cells print as ` cell `, origins as `(cols, rows)`, covered cells
/// as blanks:
///
/// ```text
/// |(2, 1)|      | cell |
/// | cell | cell | cell |
/// ```
#[derive(Debug, Default)]
pub struct DiagramEmitter {
    output: String,
}

impl DiagramEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.output
    }
}

impl CellEmitter for DiagramEmitter {
    fn begin_row(&mut self, _row: usize) -> Result<()> {
        self.output.push('|');
        Ok(())
    }

    fn emit_cell(&mut self, _pos: GridPos, span: &SpanInfo, _style: &CellStyle) -> Result<()> {
        match span {
            SpanInfo::Regular => self.output.push_str(" cell "),
            SpanInfo::Origin {
                col_span, row_span, ..
            } => self
                .output
                .push_str(&format!("({}, {})", col_span, row_span)),
            SpanInfo::Hidden { .. } => self.output.push_str("      "),
        }
        self.output.push('|');
        Ok(())
    }

    fn end_row(&mut self, _row: usize) -> Result<()> {
        self.output.push('\n');
        Ok(())
    }
}
