use std::collections::BTreeMap;

use crate::layout::coord::RawCoord;
use crate::layout::value::{Alignment, Border, Color, Edge, VerticalAlignment};

/// The closed set of range command kinds, decided once when a command is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Align,
    Valign,
    Span,
    Background,
    RowZebra,
    ColZebra,
    Font,
    TextColor,
    Leading,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    PaddingBottom,
    Line,
}

/// Direction in which zebra colors cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZebraAxis {
    Rows,
    Columns,
}

/// Sub-kind of a `Line` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Grid,
    InnerGrid,
    Box,
    Outline,
    Below,
    Above,
    Before,
    After,
}

impl LineKind {
    pub fn parse(kind: &str) -> Option<Self> {
        let kind = match kind.to_ascii_uppercase().as_str() {
            "GRID" => LineKind::Grid,
            "INNERGRID" => LineKind::InnerGrid,
            "BOX" => LineKind::Box,
            "OUTLINE" => LineKind::Outline,
            "LINEBELOW" | "BELOW" => LineKind::Below,
            "LINEABOVE" | "ABOVE" => LineKind::Above,
            "LINEBEFORE" | "BEFORE" => LineKind::Before,
            "LINEAFTER" | "AFTER" => LineKind::After,
            _ => return None,
        };
        Some(kind)
    }
}

/// Kind-specific payload of a range command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandProps {
    Align(Alignment),
    Valign(VerticalAlignment),
    Span,
    /// `None` clears the background.
    Background(Option<Color>),
    Zebra {
        axis: ZebraAxis,
        colors: Vec<Option<Color>>,
    },
    Font {
        name: Option<String>,
        size: Option<f32>,
        leading: Option<f32>,
    },
    TextColor(Option<Color>),
    Leading(f32),
    Padding {
        edge: Edge,
        length: f32,
    },
    Line {
        kind: LineKind,
        border: Border,
    },
}

/// A style instruction scoped to the rectangle between `start` and `stop`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCommand {
    pub start: RawCoord,
    pub stop: RawCoord,
    pub props: CommandProps,
}

impl RangeCommand {
    pub fn new(start: RawCoord, stop: RawCoord, props: CommandProps) -> Self {
        RangeCommand { start, stop, props }
    }

    /// A command covering the whole table.
    pub fn whole_table(props: CommandProps) -> Self {
        RangeCommand::new(RawCoord::first(), RawCoord::last(), props)
    }

    pub fn kind(&self) -> CommandKind {
        match &self.props {
            CommandProps::Align(_) => CommandKind::Align,
            CommandProps::Valign(_) => CommandKind::Valign,
            CommandProps::Span => CommandKind::Span,
            CommandProps::Background(_) => CommandKind::Background,
            CommandProps::Zebra {
                axis: ZebraAxis::Rows,
                ..
            } => CommandKind::RowZebra,
            CommandProps::Zebra {
                axis: ZebraAxis::Columns,
                ..
            } => CommandKind::ColZebra,
            CommandProps::Font { .. } => CommandKind::Font,
            CommandProps::TextColor(_) => CommandKind::TextColor,
            CommandProps::Leading(_) => CommandKind::Leading,
            CommandProps::Padding { edge, .. } => match edge {
                Edge::Left => CommandKind::PaddingLeft,
                Edge::Right => CommandKind::PaddingRight,
                Edge::Top => CommandKind::PaddingTop,
                Edge::Bottom => CommandKind::PaddingBottom,
            },
            CommandProps::Line { .. } => CommandKind::Line,
        }
    }
}

/// The ordered command list of one table style, grouped by kind.
///
/// Declaration order is kept both overall and within each kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSet {
    commands: Vec<RangeCommand>,
    by_kind: BTreeMap<CommandKind, Vec<usize>>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RangeCommand) {
        self.by_kind
            .entry(command.kind())
            .or_default()
            .push(self.commands.len());
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RangeCommand> {
        self.commands.iter()
    }

    /// Commands of one kind in declaration order.
    pub fn of_kind(&self, kind: CommandKind) -> impl Iterator<Item = &RangeCommand> {
        self.by_kind
            .get(&kind)
            .map(|indexes| indexes.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&index| &self.commands[index])
    }
}

impl Extend<RangeCommand> for CommandSet {
    fn extend<I: IntoIterator<Item = RangeCommand>>(&mut self, iter: I) {
        for command in iter {
            self.push(command);
        }
    }
}

impl FromIterator<RangeCommand> for CommandSet {
    fn from_iter<I: IntoIterator<Item = RangeCommand>>(iter: I) -> Self {
        let mut set = CommandSet::new();
        set.extend(iter);
        set
    }
}
