use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use log::warn;

use crate::emitter::base::emit_table;
use crate::emitter::diagram::DiagramEmitter;
use crate::emitter::style_list::StyleListEmitter;
use crate::emitter::OutputType;
use crate::layout::ResolveOptions;
use crate::markup::Element;
use crate::parser::parse_tables;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionOptions {
    pub to_type: OutputType,
    pub resolve: ResolveOptions,
}

/// Reads markup from `input_path` (stdin when `None` or `-`) and writes one
/// rendering per table to `output_writer`.
pub fn run_conversion(
    input_path: &Option<String>,
    output_writer: &mut dyn Write,
    options: &ConversionOptions,
) -> Result<()> {
    let input = match input_path {
        Some(path) if path != "-" => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    convert(&input, output_writer, options)
}

pub fn convert(
    input: &str,
    output_writer: &mut dyn Write,
    options: &ConversionOptions,
) -> Result<()> {
    let root = Element::parse(input)?;
    let tables = parse_tables(&root)?;
    if tables.is_empty() {
        warn!("no <blockTable> found in input");
    }

    for (index, definition) in tables.iter().enumerate() {
        let table = definition
            .resolve(options.resolve)
            .with_context(|| format!("failed to resolve table {}", index + 1))?;
        let grid = table.grid();

        if index > 0 {
            writeln!(output_writer)?;
        }
        writeln!(
            output_writer,
            "table {}: {} columns x {} rows",
            index + 1,
            grid.columns,
            grid.rows
        )?;

        let rendered = match options.to_type {
            OutputType::Diagram => {
                let mut emitter = DiagramEmitter::new();
                emit_table(&table, &mut emitter)?;
                emitter.finish()
            }
            OutputType::Styles => {
                let mut emitter = StyleListEmitter::default();
                emit_table(&table, &mut emitter)?;
                emitter.finish()
            }
        };
        output_writer.write_all(rendered.as_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{SpanPolicy, TableError};
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"<document>
  <stylesheet>
    <blockTableStyle id="table">
      <lineStyle start="0,0" stop="-1,-1" kind="GRID" thickness="0.5" colorName="grey"/>
      <blockBackground start="0,0" stop="1,1" colorName="palegreen"/>
      <blockSpan start="0,0" stop="1,1"/>
      <blockBackground start="-2,-2" stop="-1,-1" colorName="pink"/>
      <blockSpan start="-2,-2" stop="-1,-1"/>
    </blockTableStyle>
  </stylesheet>
  <story>
    <blockTable style="table">
      <tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
      <tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
      <tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
      <tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr>
    </blockTable>
    <blockTable>
      <bulkData>
        a,b
      </bulkData>
    </blockTable>
  </story>
</document>"#;

    #[test]
    fn test_run_conversion_from_file() -> Result<()> {
        let mut input = NamedTempFile::new()?;
        input.write_all(DOCUMENT.as_bytes())?;
        let path = input.path().to_string_lossy().into_owned();

        let mut output = Vec::new();
        run_conversion(&Some(path), &mut output, &ConversionOptions::default())?;

        let expected = "\
table 1: 5 columns x 4 rows
|(2, 2)|      | cell | cell | cell |
|      |      | cell | cell | cell |
| cell | cell | cell |(2, 2)|      |
| cell | cell | cell |      |      |

table 2: 2 columns x 1 rows
| cell | cell |
";
        assert_eq!(String::from_utf8(output)?, expected);
        Ok(())
    }

    #[test]
    fn test_convert_styles_output() -> Result<()> {
        let mut output = Vec::new();
        let options = ConversionOptions {
            to_type: OutputType::Styles,
            resolve: ResolveOptions {
                span_policy: SpanPolicy::Strict,
            },
        };
        convert(DOCUMENT, &mut output, &options)?;
        let text = String::from_utf8(output)?;
        assert!(text.contains("(0, 0) TableCell1 span=2x2"));
        assert!(text.contains("(1, 1) covered by (0, 0)"));
        assert!(text.contains("background=#98fb98"));
        assert!(text.contains("background=#ffc0cb"));
        Ok(())
    }

    #[test]
    fn test_convert_keeps_going_past_local_style_errors() -> Result<()> {
        let input = r#"<document>
  <blockTableStyle id="broken">
    <blockSpan start="0" stop="1,0"/>
    <blockSpan start="0,1" stop="1,1"/>
  </blockTableStyle>
  <story>
    <blockTable style="broken">
      <tr><td>a</td><td>b</td></tr>
      <tr><td>c</td><td>d</td></tr>
    </blockTable>
    <blockTable style="nope" colWidths="40% 60%">
      <tr><td>a</td><td>b</td></tr>
    </blockTable>
  </story>
</document>"#;
        let mut output = Vec::new();
        convert(input, &mut output, &ConversionOptions::default())?;

        let expected = "\
table 1: 2 columns x 2 rows
| cell | cell |
|(2, 1)|      |

table 2: 2 columns x 1 rows
| cell | cell |
";
        assert_eq!(String::from_utf8(output)?, expected);

        let mut output = Vec::new();
        let options = ConversionOptions {
            to_type: OutputType::Styles,
            ..ConversionOptions::default()
        };
        convert(input, &mut output, &options)?;
        let text = String::from_utf8(output)?;
        assert!(text.contains("TableColumn1: width=40%"));
        assert!(text.contains("TableColumn2: width=60%"));
        Ok(())
    }

    #[test]
    fn test_convert_empty_table_fails() {
        let mut output = Vec::new();
        let err = convert(
            "<story><blockTable/></story>",
            &mut output,
            &ConversionOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::EmptyTable)
        );
    }

    #[test]
    fn test_missing_input_file() {
        let mut output = Vec::new();
        let result = run_conversion(
            &Some("/nonexistent/input.rml".to_string()),
            &mut output,
            &ConversionOptions::default(),
        );
        assert!(result.is_err());
    }
}
