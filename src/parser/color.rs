use anyhow::Result;
use regex::Regex;

use crate::layout::value::Color;
use crate::parser::CommandError;

/// Named colors accepted in color attributes.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aqua", 0x00ffff),
    ("black", 0x000000),
    ("blue", 0x0000ff),
    ("brown", 0xa52a2a),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkred", 0x8b0000),
    ("gold", 0xffd700),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("grey", 0x808080),
    ("lavender", 0xe6e6fa),
    ("lightblue", 0xadd8e6),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("navy", 0x000080),
    ("olive", 0x808000),
    ("orange", 0xffa500),
    ("palegreen", 0x98fb98),
    ("pink", 0xffc0cb),
    ("purple", 0x800080),
    ("red", 0xff0000),
    ("silver", 0xc0c0c0),
    ("teal", 0x008080),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
];

/// Parses color attributes: names, `#RRGGBB`, `0xRRGGBB` and `None`.
pub struct ColorParser {
    hex_regexp: Regex,
    list_regexp: Regex,
}

impl ColorParser {
    pub fn new() -> Result<Self> {
        Ok(ColorParser {
            hex_regexp: Regex::new(r"^(?:#|0[xX])(?P<hex>[0-9a-fA-F]{6})$")?,
            list_regexp: Regex::new(r"[;,\s]+")?,
        })
    }

    /// Parses one color. `None` (any case) yields `Ok(None)`.
    pub fn parse(&self, value: &str) -> Result<Option<Color>, CommandError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("transparent") {
            return Ok(None);
        }
        if let Some(captures) = self.hex_regexp.captures(value) {
            let hex = u32::from_str_radix(&captures["hex"], 16)
                .map_err(|_| CommandError::InvalidColor(value.to_string()))?;
            return Ok(Some(Color::from_hex(hex)));
        }
        let name = value.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, hex)| Some(Color::from_hex(*hex)))
            .ok_or_else(|| CommandError::InvalidColor(value.to_string()))
    }

    /// Parses a list of colors separated by `;`, `,` or whitespace.
    pub fn parse_list(&self, value: &str) -> Result<Vec<Option<Color>>, CommandError> {
        self.list_regexp
            .split(value.trim())
            .filter(|part| !part.is_empty())
            .map(|part| self.parse(part))
            .collect()
    }
}
