use std::collections::HashMap;

/// Hands out unique style names per prefix: `TableCell1`, `TableCell2`, ...
///
/// One namer belongs to one emitter run; nothing is shared between runs.
#[derive(Debug, Default)]
pub struct StyleNamer {
    counters: HashMap<String, usize>,
}

impl StyleNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_prefix() {
        let mut namer = StyleNamer::new();
        assert_eq!(namer.next_name("TableCell"), "TableCell1");
        assert_eq!(namer.next_name("TableCell"), "TableCell2");
        assert_eq!(namer.next_name("CellContent"), "CellContent1");

        let mut other = StyleNamer::new();
        assert_eq!(other.next_name("TableCell"), "TableCell1");
    }
}
