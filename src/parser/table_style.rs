use std::collections::HashMap;

use anyhow::Result;
use log::warn;

use crate::layout::command::{CommandProps, CommandSet, LineKind, RangeCommand, ZebraAxis};
use crate::layout::coord::RawCoord;
use crate::layout::value::{Alignment, Border, Edge, LinePattern, VerticalAlignment};
use crate::markup::Element;
use crate::parser::color::ColorParser;
use crate::parser::{parse_length, CommandError};

/// Tags recognized inside a `blockTableStyle`.
pub const COMMAND_TAGS: &[&str] = &[
    "blockFont",
    "blockTextColor",
    "blockLeading",
    "blockAlignment",
    "blockValign",
    "blockLeftPadding",
    "blockRightPadding",
    "blockTopPadding",
    "blockBottomPadding",
    "blockBackground",
    "blockRowBackground",
    "blockColBackground",
    "lineStyle",
    "blockSpan",
];

/// Named table styles declared in a document.
#[derive(Debug, Default)]
pub struct StyleSheet {
    styles: HashMap<String, CommandSet>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every `blockTableStyle` carrying an `id` under `root`.
    ///
    /// A later declaration with the same id replaces the earlier one.
    pub fn collect(root: &Element, parser: &TableStyleParser) -> Result<Self> {
        let mut sheet = StyleSheet::new();
        sheet.collect_from(root, parser)?;
        Ok(sheet)
    }

    fn collect_from(&mut self, element: &Element, parser: &TableStyleParser) -> Result<()> {
        if element.tag == "blockTableStyle" {
            if let Some(id) = element.attr("id") {
                self.insert(id, parser.parse(element)?);
            }
        }
        for child in &element.children {
            self.collect_from(child, parser)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, id: &str, commands: CommandSet) {
        self.styles.insert(id.to_string(), commands);
    }

    pub fn get(&self, id: &str) -> Option<&CommandSet> {
        self.styles.get(id)
    }
}

/// Reads `blockTableStyle` elements into ordered range commands.
pub struct TableStyleParser {
    colors: ColorParser,
}

impl TableStyleParser {
    pub fn new() -> Result<Self> {
        Ok(TableStyleParser {
            colors: ColorParser::new()?,
        })
    }

    /// Parses the commands of a `blockTableStyle` in declaration order.
    pub fn parse(&self, element: &Element) -> Result<CommandSet> {
        let mut commands = CommandSet::new();
        for child in &element.children {
            if let Some(command) = self.parse_command(child)? {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Parses one command element. Unknown tags are skipped.
    pub fn parse_command(&self, element: &Element) -> Result<Option<RangeCommand>> {
        let tag = element.tag.as_str();
        let props = match tag {
            "blockFont" => CommandProps::Font {
                name: element.attr("name").map(|s| s.to_string()),
                size: optional_length(element, "size")?,
                leading: optional_length(element, "leading")?,
            },
            "blockTextColor" => {
                CommandProps::TextColor(self.colors.parse(required(element, "colorName")?)?)
            }
            "blockLeading" => CommandProps::Leading(length(element, "length")?),
            "blockAlignment" => CommandProps::Align(alignment(element)?),
            "blockValign" => CommandProps::Valign(vertical_alignment(element)?),
            "blockLeftPadding" => padding(element, Edge::Left)?,
            "blockRightPadding" => padding(element, Edge::Right)?,
            "blockTopPadding" => padding(element, Edge::Top)?,
            "blockBottomPadding" => padding(element, Edge::Bottom)?,
            "blockBackground" => self.background(element)?,
            "blockRowBackground" => CommandProps::Zebra {
                axis: ZebraAxis::Rows,
                colors: self.colors.parse_list(required(element, "colorNames")?)?,
            },
            "blockColBackground" => CommandProps::Zebra {
                axis: ZebraAxis::Columns,
                colors: self.colors.parse_list(required(element, "colorNames")?)?,
            },
            "lineStyle" => self.line_style(element)?,
            "blockSpan" => CommandProps::Span,
            _ => {
                warn!("ignoring unknown table style command <{}>", tag);
                return Ok(None);
            }
        };

        let start = coordinate(element, "start").unwrap_or_else(RawCoord::first);
        let stop = coordinate(element, "stop").unwrap_or_else(RawCoord::last);
        Ok(Some(RangeCommand::new(start, stop, props)))
    }

    /// `colorsByRow` and `colorsByCol` turn a background into zebra striping.
    fn background(&self, element: &Element) -> Result<CommandProps> {
        if let Some(colors) = element.attr("colorsByRow") {
            return Ok(CommandProps::Zebra {
                axis: ZebraAxis::Rows,
                colors: self.colors.parse_list(colors)?,
            });
        }
        if let Some(colors) = element.attr("colorsByCol") {
            return Ok(CommandProps::Zebra {
                axis: ZebraAxis::Columns,
                colors: self.colors.parse_list(colors)?,
            });
        }
        Ok(CommandProps::Background(
            self.colors.parse(required(element, "colorName")?)?,
        ))
    }

    fn line_style(&self, element: &Element) -> Result<CommandProps> {
        let kind_attr = required(element, "kind")?;
        let kind = LineKind::parse(kind_attr).ok_or_else(|| invalid(element, "kind", kind_attr))?;

        let thickness = optional_length(element, "thickness")?
            .filter(|t| *t > 0.0)
            .unwrap_or(1.0);
        let count = match element.attr("count") {
            Some(count) => Some(
                count
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(element, "count", count))?,
            ),
            None => None,
        };
        let dash = match element.attr("dash") {
            Some(dash) => dash
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(|part| part.parse::<f32>().map_err(|_| invalid(element, "dash", dash)))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let color = match element.attr("colorName") {
            Some(color) => self.colors.parse(color)?,
            None => None,
        };

        Ok(CommandProps::Line {
            kind,
            border: Border {
                thickness,
                pattern: line_pattern(count, &dash),
                color,
            },
        })
    }
}

/// Maps stroke count and dash array onto the closest document line pattern.
fn line_pattern(count: Option<u32>, dash: &[f32]) -> LinePattern {
    if count == Some(2) {
        return LinePattern::Double;
    }
    match dash {
        [on, off] if on == off => match *on as u32 {
            1 | 2 => LinePattern::Dotted,
            3 | 4 => LinePattern::FineDashed,
            _ => LinePattern::Dashed,
        },
        [_, _] => LinePattern::DashDot,
        _ => LinePattern::Solid,
    }
}

fn alignment(element: &Element) -> Result<Alignment> {
    let value = required(element, "value")?;
    let align = match value.to_ascii_lowercase().as_str() {
        "left" => Alignment::Left,
        "center" | "centre" => Alignment::Center,
        // No decimal alignment in the target models; right is the nearest.
        "right" | "decimal" => Alignment::Right,
        "justify" => Alignment::Justify,
        _ => return Err(invalid(element, "value", value).into()),
    };
    Ok(align)
}

fn vertical_alignment(element: &Element) -> Result<VerticalAlignment> {
    let value = required(element, "value")?;
    parse_vertical_alignment(value).ok_or_else(|| invalid(element, "value", value).into())
}

pub(crate) fn parse_vertical_alignment(value: &str) -> Option<VerticalAlignment> {
    match value.to_ascii_lowercase().as_str() {
        "top" => Some(VerticalAlignment::Top),
        "middle" | "center" | "centre" => Some(VerticalAlignment::Middle),
        "bottom" => Some(VerticalAlignment::Bottom),
        _ => None,
    }
}

fn padding(element: &Element, edge: Edge) -> Result<CommandProps> {
    Ok(CommandProps::Padding {
        edge,
        length: length(element, "length")?,
    })
}

fn required<'a>(element: &'a Element, name: &str) -> Result<&'a str, CommandError> {
    element
        .attr(name)
        .ok_or_else(|| CommandError::MissingAttribute {
            tag: element.tag.clone(),
            name: name.to_string(),
        })
}

fn length(element: &Element, name: &str) -> Result<f32, CommandError> {
    parse_length(&element.tag, name, required(element, name)?)
}

fn optional_length(element: &Element, name: &str) -> Result<Option<f32>, CommandError> {
    element
        .attr(name)
        .map(|value| parse_length(&element.tag, name, value))
        .transpose()
}

fn coordinate(element: &Element, name: &str) -> Option<RawCoord> {
    element.attr(name).map(RawCoord::parse)
}

fn invalid(element: &Element, name: &str, value: &str) -> CommandError {
    CommandError::InvalidAttribute {
        tag: element.tag.clone(),
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::command::CommandKind;
    use crate::layout::value::Color;

    fn parse(input: &str) -> Result<CommandSet> {
        let parser = TableStyleParser::new()?;
        parser.parse(&Element::parse(input)?)
    }

    #[test]
    fn test_parse_style_commands() -> Result<()> {
        let commands = parse(
            r#"<blockTableStyle id="table">
    <blockAlignment value="center"/>
    <blockValign value="middle" start="-1,0" stop="-1,-1"/>
    <blockSpan start="0,0" stop="2,0"/>
    <lineStyle kind="GRID" colorName="black" start="0,1" stop="-2,-1"/>
    <lineStyle kind="OUTLINE" colorName="black" thickness="2"/>
    <blockFont name="Helvetica-Bold" size="9" leading="11" stop="-1,0"/>
    <blockTopPadding length="0.1cm"/>
</blockTableStyle>"#,
        )?;
        let kinds: Vec<_> = commands.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::Align,
                CommandKind::Valign,
                CommandKind::Span,
                CommandKind::Line,
                CommandKind::Line,
                CommandKind::Font,
                CommandKind::PaddingTop
            ]
        );

        let all: Vec<_> = commands.iter().collect();
        assert_eq!(all[0].start, RawCoord::first());
        assert_eq!(all[0].stop, RawCoord::last());
        assert_eq!(all[0].props, CommandProps::Align(Alignment::Center));
        assert_eq!(all[1].start, RawCoord::new(-1, 0));
        assert_eq!(all[3].stop, RawCoord::new(-2, -1));
        assert_eq!(
            all[4].props,
            CommandProps::Line {
                kind: LineKind::Outline,
                border: Border {
                    thickness: 2.0,
                    pattern: LinePattern::Solid,
                    color: Some(Color::BLACK),
                },
            }
        );
        assert_eq!(
            all[5].props,
            CommandProps::Font {
                name: Some("Helvetica-Bold".to_string()),
                size: Some(9.0),
                leading: Some(11.0),
            }
        );
        assert_eq!(all[5].start, RawCoord::first());
        Ok(())
    }

    #[test]
    fn test_background_variants() -> Result<()> {
        let commands = parse(
            r#"<blockTableStyle id="t">
    <blockBackground colorName="palegreen" start="0,0" stop="1,1"/>
    <blockBackground colorsByRow="0xD0FFD0;None" start="0,1" stop="-1,-1"/>
    <blockBackground colorsByCol="white;grey"/>
    <blockRowBackground colorNames="red blue"/>
    <blockColBackground colorNames="red,blue"/>
</blockTableStyle>"#,
        )?;
        let kinds: Vec<_> = commands.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::Background,
                CommandKind::RowZebra,
                CommandKind::ColZebra,
                CommandKind::RowZebra,
                CommandKind::ColZebra
            ]
        );
        let zebra = commands.of_kind(CommandKind::RowZebra).next().unwrap();
        assert_eq!(
            zebra.props,
            CommandProps::Zebra {
                axis: ZebraAxis::Rows,
                colors: vec![Some(Color::from_hex(0xd0ffd0)), None],
            }
        );
        Ok(())
    }

    #[test]
    fn test_line_patterns() {
        assert_eq!(line_pattern(Some(2), &[]), LinePattern::Double);
        assert_eq!(line_pattern(None, &[]), LinePattern::Solid);
        assert_eq!(line_pattern(None, &[2.0, 2.0]), LinePattern::Dotted);
        assert_eq!(line_pattern(None, &[4.0, 4.0]), LinePattern::FineDashed);
        assert_eq!(line_pattern(None, &[6.0, 6.0]), LinePattern::Dashed);
        assert_eq!(line_pattern(None, &[6.0, 2.0]), LinePattern::DashDot);
        assert_eq!(line_pattern(Some(1), &[1.0, 2.0, 3.0]), LinePattern::Solid);
    }

    #[test]
    fn test_line_style_dash_and_default_thickness() -> Result<()> {
        let commands = parse(
            r#"<blockTableStyle id="t">
    <lineStyle kind="LINEBELOW" dash="3,3" colorName="grey"/>
</blockTableStyle>"#,
        )?;
        let line = commands.iter().next().unwrap();
        assert_eq!(
            line.props,
            CommandProps::Line {
                kind: LineKind::Below,
                border: Border {
                    thickness: 1.0,
                    pattern: LinePattern::FineDashed,
                    color: Some(Color::from_hex(0x808080)),
                },
            }
        );
        Ok(())
    }

    #[test]
    fn test_symbolic_coordinates_are_kept() -> Result<()> {
        let commands = parse(
            r#"<blockTableStyle id="t">
    <blockBackground colorName="red" start="0,splitlast" stop="-1,splitlast"/>
</blockTableStyle>"#,
        )?;
        assert_eq!(commands.len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_coordinate_is_kept_for_the_resolver() -> Result<()> {
        let commands = parse(
            r#"<blockTableStyle id="t">
    <blockSpan start="0" stop="1,0"/>
    <blockSpan start="0,1" stop="1,1"/>
</blockTableStyle>"#,
        )?;
        assert_eq!(commands.len(), 2);
        let first = commands.iter().next().unwrap();
        assert_eq!(first.start, RawCoord::parse("0"));
        assert_eq!(first.stop, RawCoord::new(1, 0));
        Ok(())
    }

    #[test]
    fn test_errors() -> Result<()> {
        let style = |body: &str| parse(&format!("<blockTableStyle>{}</blockTableStyle>", body));
        assert!(style(r#"<blockLeading/>"#).is_err());
        assert!(style(r#"<lineStyle kind="ZIGZAG"/>"#).is_err());
        assert!(style(r#"<blockAlignment value="sideways"/>"#).is_err());
        assert!(style(r#"<blockTextColor colorName="mauvish"/>"#).is_err());
        // A bad coordinate only costs its own command, later, at resolution.
        assert_eq!(style(r#"<blockSpan start="0"/>"#)?.len(), 1);
        // Unknown tags are skipped rather than rejected.
        assert!(style(r#"<blockWobble/>"#)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_style_sheet_collects_by_id() -> Result<()> {
        let root = Element::parse(
            r#"<document>
  <stylesheet>
    <blockTableStyle id="a"><blockSpan start="0,0" stop="1,0"/></blockTableStyle>
    <blockTableStyle id="b"/>
  </stylesheet>
</document>"#,
        )?;
        let sheet = StyleSheet::collect(&root, &TableStyleParser::new()?)?;
        assert_eq!(sheet.get("a").map(|c| c.len()), Some(1));
        assert_eq!(sheet.get("b").map(|c| c.len()), Some(0));
        assert!(sheet.get("c").is_none());
        Ok(())
    }
}
