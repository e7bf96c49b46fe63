//! Text bar charts.

use serde::{Deserialize, Serialize};

/// Width of the longest bar, in characters.
pub const DEFAULT_BAR_WIDTH: usize = 40;

const BAR: char = '█';
const NEGATIVE_BAR: char = '░';

/// One labelled bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Label shown left of the bar.
    pub label: String,
    /// Bar value.
    pub value: f64,
}

/// A horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Chart title.
    pub title: String,
    /// Name of the plotted value.
    pub value_label: String,
    /// Bars, top to bottom.
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Create an empty chart.
    pub fn new(title: impl Into<String>, value_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value_label: value_label.into(),
            bars: Vec::new(),
        }
    }

    /// Append a bar.
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.bars.push(Bar {
            label: label.into(),
            value,
        });
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the chart has no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar length for `value`, scaled so the largest magnitude spans `width`.
    fn bar_length(&self, value: f64, width: usize) -> usize {
        let max = self
            .bars
            .iter()
            .map(|b| b.value.abs())
            .fold(0.0_f64, f64::max);
        if max <= 0.0 || !value.is_finite() {
            return 0;
        }
        ((value.abs() / max) * width as f64).round() as usize
    }

    /// Render as plain text with bars at most `width` characters long.
    pub fn render_text(&self, width: usize) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(width + 40));
        output.push('\n');

        if self.bars.is_empty() {
            output.push_str("(no data)\n");
            return output;
        }

        let label_width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);

        for bar in &self.bars {
            let fill = if bar.value < 0.0 { NEGATIVE_BAR } else { BAR };
            let length = self.bar_length(bar.value, width);
            output.push_str(&format!(
                "{:<label_width$} {:<width$} {:>14.4}\n",
                bar.label,
                fill.to_string().repeat(length),
                bar.value,
            ));
        }

        output.push_str(&"-".repeat(width + 40));
        output.push('\n');
        output
    }

    /// Render as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", self.title));
        output.push_str(&format!("| # | 股票简称 | {} |\n", self.value_label));
        output.push_str("|---|----------|------|\n");

        for (i, bar) in self.bars.iter().enumerate() {
            output.push_str(&format!("| {} | {} | {:.4} |\n", i + 1, bar.label, bar.value));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> BarChart {
        let mut chart = BarChart::new("营业收入最高的前3家公司", "营业收入");
        chart.push("贵州茅台", 100.0);
        chart.push("五粮液", 50.0);
        chart.push("亏损公司", -25.0);
        chart
    }

    #[test]
    fn test_bar_lengths_are_proportional() {
        let text = chart().render_text(20);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "营业收入最高的前3家公司");
        assert_eq!(lines[3].matches(BAR).count(), 20);
        assert_eq!(lines[4].matches(BAR).count(), 10);
        assert_eq!(lines[5].matches(NEGATIVE_BAR).count(), 5);
        assert!(lines[5].contains("-25.0000"));
    }

    #[test]
    fn test_empty_chart() {
        let chart = BarChart::new("empty", "v");
        assert!(chart.is_empty());
        assert!(chart.render_text(DEFAULT_BAR_WIDTH).contains("(no data)"));
    }

    #[test]
    fn test_all_zero_values() {
        let mut chart = BarChart::new("zeros", "v");
        chart.push("a", 0.0);
        let text = chart.render_text(10);
        assert_eq!(text.matches(BAR).count(), 0);
    }

    #[test]
    fn test_markdown() {
        let md = chart().to_markdown();
        assert!(md.starts_with("## 营业收入最高的前3家公司"));
        assert!(md.contains("| 股票简称 | 营业收入 |"));
        assert!(md.contains("| 1 | 贵州茅台 | 100.0000 |"));
        assert!(md.contains("| 3 | 亏损公司 | -25.0000 |"));
    }
}
