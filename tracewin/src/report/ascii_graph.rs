//! Horizontal ASCII bar graphs
//!
//! ```text
//! Syscalls by name
//! ###############################################################################
//! ██████████████████████████████████████████████████  1234.00  read
//! ████████████████████                                 531.00  write
//! ```
//!
//! Layout: bar, then the value right-aligned in its column, then the label.
//! When the widest label and value fit next to a bar of `min_graph_length`
//! inside `line_length`, the columns are pushed to the right edge and the bar
//! takes the remaining width; otherwise the bar gets exactly
//! `min_graph_length` cells and the line grows.

// Bar lengths are computed in f64 and truncated to whole cells
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

const BAR: char = '█';
const DEFAULT_CONSOLE_WIDTH: usize = 80;

/// Row ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// As given
    #[default]
    None,
    Increasing,
    Decreasing,
}

/// Bar graph renderer
#[derive(Debug, Clone)]
pub struct AsciiGraph {
    line_length: usize,
    min_graph_length: usize,
    separator_length: usize,
    max_width: usize,
}

impl Default for AsciiGraph {
    fn default() -> Self {
        Self {
            line_length: 79,
            min_graph_length: 50,
            separator_length: 2,
            max_width: DEFAULT_CONSOLE_WIDTH - 1,
        }
    }
}

/// Column positions of one rendering
struct Layout {
    line_length: usize,
    start_value: usize,
    start_info: usize,
    graph_length: usize,
    value_width: usize,
}

impl AsciiGraph {
    #[must_use]
    pub fn new(line_length: usize, min_graph_length: usize, separator_length: usize) -> Self {
        Self { line_length, min_graph_length, separator_length, ..Self::default() }
    }

    /// Cap the rendered line at the terminal width from `$COLUMNS` (minus one)
    #[must_use]
    pub fn fit_terminal(self) -> Self {
        let columns = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_CONSOLE_WIDTH);
        self.with_max_width(columns.saturating_sub(1))
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Render `data` as lines: the label, a `#` rule, then one line per row
    #[must_use]
    pub fn graph(
        &self,
        label: &str,
        data: &[(String, f64)],
        sort: SortOrder,
        unit: &str,
    ) -> Vec<String> {
        let mut rows: Vec<(&str, f64)> = data.iter().map(|(info, v)| (info.as_str(), *v)).collect();
        match sort {
            SortOrder::None => {}
            SortOrder::Increasing => rows.sort_by(|a, b| a.1.total_cmp(&b.1)),
            SortOrder::Decreasing => rows.sort_by(|a, b| b.1.total_cmp(&a.1)),
        }

        let values: Vec<String> = rows.iter().map(|(_, v)| format!("{v:.2}{unit}")).collect();
        let layout = self.layout(label, &rows, &values);
        let max_value = rows.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(label.to_string());
        lines.push("#".repeat(layout.line_length));

        for ((info, value), value_str) in rows.iter().zip(&values) {
            let mut line = self.bar(*value, max_value, &layout);
            line.push_str(&self.value_column(value_str, &layout));
            line.push_str(info);
            lines.push(line);
        }
        lines
    }

    fn layout(&self, label: &str, rows: &[(&str, f64)], values: &[String]) -> Layout {
        let info_width = rows.iter().map(|(info, _)| info.chars().count()).max().unwrap_or(0);
        let value_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);

        let mut line_length = self.line_length.max(label.chars().count());
        let min_line_length =
            self.min_graph_length + 2 * self.separator_length + value_width + info_width;

        let (start_value, start_info, graph_length) = if min_line_length < line_length {
            let start_info = self.line_length.saturating_sub(info_width);
            let start_value = start_info.saturating_sub(self.separator_length + value_width);
            (start_value, start_info, start_value.saturating_sub(self.separator_length))
        } else {
            line_length = min_line_length;
            let start_value = self.min_graph_length + self.separator_length;
            (start_value, start_value + value_width + self.separator_length, self.min_graph_length)
        };

        Layout {
            line_length: line_length.min(self.max_width),
            start_value,
            start_info,
            graph_length,
            value_width,
        }
    }

    fn bar(&self, value: f64, max_value: f64, layout: &Layout) -> String {
        let value = value.max(0.0);
        let cells = if max_value > 0.0 {
            (value * layout.graph_length as f64 / max_value) as usize
        } else {
            0
        };
        let cells = cells.min(layout.graph_length);

        let mut out = String::with_capacity(layout.start_value * BAR.len_utf8());
        out.extend(std::iter::repeat(BAR).take(cells));
        out.extend(std::iter::repeat(' ').take(layout.start_value.saturating_sub(cells)));
        out
    }

    fn value_column(&self, value: &str, layout: &Layout) -> String {
        let pad = layout.value_width.saturating_sub(value.chars().count());
        let lead = layout
            .start_info
            .saturating_sub(layout.start_value + layout.value_width + self.separator_length);
        format!(
            "{}{}{value}{}",
            " ".repeat(lead),
            " ".repeat(pad),
            " ".repeat(self.separator_length)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Vec<(String, f64)> {
        vec![
            ("long_label".to_string(), 423.0),
            ("sl".to_string(), 1234.0),
            ("line3".to_string(), 531.0),
        ]
    }

    #[test]
    fn test_header_lines() {
        let lines = AsciiGraph::default().graph("test print", &data(), SortOrder::None, "");
        assert_eq!(lines[0], "test print");
        assert_eq!(lines[1], "#".repeat(79));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_columns_are_aligned_to_line_length() {
        let lines = AsciiGraph::default().graph("g", &data(), SortOrder::None, "");
        // widest label is 10 chars, so labels start at column 69
        for (line, info) in lines[2..].iter().zip(["long_label", "sl", "line3"]) {
            let prefix: String = line.chars().take(69).collect();
            let rest: String = line.chars().skip(69).collect();
            assert_eq!(rest, info);
            assert!(prefix.ends_with("  "), "separator before label: {line:?}");
        }
    }

    #[test]
    fn test_largest_value_fills_graph() {
        let lines = AsciiGraph::default().graph("g", &data(), SortOrder::Decreasing, "");
        let full = lines[2].chars().filter(|&c| c == BAR).count();
        let next = lines[3].chars().filter(|&c| c == BAR).count();

        // 79 - 10 (label) - 2 - 7 ("1234.00") - 2 = 58 cells
        assert_eq!(full, 58);
        assert_eq!(next, (531.0 * 58.0 / 1234.0) as usize);
        assert!(lines[2].ends_with("1234.00  sl"));
    }

    #[test]
    fn test_increasing_sort_and_unit() {
        let lines = AsciiGraph::default().graph("g", &data(), SortOrder::Increasing, "ms");
        assert!(lines[2].ends_with("423.00ms  long_label"));
        assert!(lines[4].ends_with("1234.00ms  sl"));
    }

    #[test]
    fn test_narrow_line_uses_min_graph_length() {
        let graph = AsciiGraph::new(20, 10, 1);
        let lines = graph.graph("g", &data(), SortOrder::None, "");
        let full = lines[3].chars().filter(|&c| c == BAR).count();
        assert_eq!(full, 10);
        // 10 + 2 * 1 + 7 + 10
        assert_eq!(lines[1].len(), 29);
    }

    #[test]
    fn test_all_zero_values_draw_no_bars() {
        let zeros = vec![("a".to_string(), 0.0), ("b".to_string(), 0.0)];
        let lines = AsciiGraph::default().graph("g", &zeros, SortOrder::None, "");
        assert!(lines[2..].iter().all(|l| !l.contains(BAR)));
    }

    #[test]
    fn test_rule_is_capped_by_max_width() {
        let lines = AsciiGraph::default().with_max_width(40).graph("g", &data(), SortOrder::None, "");
        assert_eq!(lines[1].len(), 40);
    }
}
