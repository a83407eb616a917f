use anyhow::Result;

use crate::emitter::base::CellEmitter;
use crate::emitter::naming::StyleNamer;
use crate::layout::coord::GridPos;
use crate::layout::span::SpanInfo;
use crate::layout::style::CellStyle;
use crate::layout::value::Edge;
use crate::layout::ResolvedTable;

/// Lists the column and row styles of a table, its distinct cell styles, and
/// which cell uses which.
///
/// Every column and row gets its own style. Identical cell styles share one
/// name, the way a document model shares one automatic style between cells.
#[derive(Debug)]
pub struct StyleListEmitter {
    prefix: String,
    namer: StyleNamer,
    dimensions: Vec<String>,
    styles: Vec<(String, CellStyle)>,
    cells: Vec<String>,
}

impl Default for StyleListEmitter {
    fn default() -> Self {
        StyleListEmitter::new("TableCell")
    }
}

impl StyleListEmitter {
    pub fn new(prefix: &str) -> Self {
        StyleListEmitter {
            prefix: prefix.to_string(),
            namer: StyleNamer::new(),
            dimensions: Vec::new(),
            styles: Vec::new(),
            cells: Vec::new(),
        }
    }

    fn style_name(&mut self, style: &CellStyle) -> String {
        if let Some((name, _)) = self.styles.iter().find(|(_, known)| known == style) {
            return name.clone();
        }
        let name = self.namer.next_name(&self.prefix);
        self.styles.push((name.clone(), style.clone()));
        name
    }

    pub fn finish(self) -> String {
        let mut output = String::new();
        for line in &self.dimensions {
            output.push_str(line);
            output.push('\n');
        }
        for (name, style) in &self.styles {
            output.push_str(&format!("{}: {}\n", name, describe(style)));
        }
        for line in &self.cells {
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}

impl CellEmitter for StyleListEmitter {
    fn begin_table(&mut self, table: &ResolvedTable) -> Result<()> {
        for width in table.dimensions().column_widths() {
            let name = self.namer.next_name("TableColumn");
            self.dimensions.push(format!("{}: width={}", name, width));
        }
        for height in table.dimensions().row_heights() {
            let name = self.namer.next_name("TableRow");
            self.dimensions.push(format!("{}: height={}", name, height));
        }
        Ok(())
    }

    fn emit_cell(&mut self, pos: GridPos, span: &SpanInfo, style: &CellStyle) -> Result<()> {
        let line = match span {
            SpanInfo::Hidden { origin } => format!("{} covered by {}", pos, origin),
            SpanInfo::Regular => format!("{} {}", pos, self.style_name(style)),
            SpanInfo::Origin {
                col_span, row_span, ..
            } => format!(
                "{} {} span={}x{}",
                pos,
                self.style_name(style),
                col_span,
                row_span
            ),
        };
        self.cells.push(line);
        Ok(())
    }
}

/// One-line `key=value` description of a style.
pub fn describe(style: &CellStyle) -> String {
    let mut parts = Vec::new();
    if let Some(color) = style.cell.background {
        parts.push(format!("background={}", color));
    }
    if let Some(valign) = style.cell.vertical_align {
        parts.push(format!("valign={}", valign));
    }
    for edge in Edge::ALL {
        if let Some(border) = style.border(edge) {
            parts.push(format!("border-{}={}", edge.name(), border));
        }
    }
    for edge in Edge::ALL {
        if let Some(length) = style.cell.padding.get(edge) {
            parts.push(format!("padding-{}={}pt", edge.name(), length));
        }
    }
    if let Some(align) = style.paragraph.align {
        parts.push(format!("align={}", align));
    }
    if let Some(spacing) = style.paragraph.line_spacing {
        parts.push(format!("line-spacing={}pt", spacing));
    }
    if let Some(name) = &style.text.font_name {
        parts.push(format!("font-name={}", name));
    }
    if let Some(size) = style.text.font_size {
        parts.push(format!("font-size={}pt", size));
    }
    if let Some(color) = style.text.color {
        parts.push(format!("color={}", color));
    }
    if parts.is_empty() {
        "(default)".to_string()
    } else {
        parts.join(" ")
    }
}
