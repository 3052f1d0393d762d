//! Horizontal bar charts drawn with block characters.
use console::Style;

const FILLED: char = '█';
const DEFAULT_BAR_WIDTH: usize = 40;

/// One row group per label, one bar per series in each group.
pub struct Series<'a> {
    pub name: &'a str,
    pub style: Style,
    pub values: Vec<f64>,
}

fn bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 && value > 0.0 {
        ((value / max) * width as f64).round() as usize
    } else {
        0
    };
    FILLED.to_string().repeat(filled.min(width))
}

pub fn bar_width(term_width: usize, label_width: usize) -> usize {
    term_width
        .saturating_sub(label_width + 30)
        .clamp(10, DEFAULT_BAR_WIDTH)
}

/// Renders grouped bars, e.g. income and expenses per month.
pub fn grouped_bars(title: &str, labels: &[String], series: &[Series], width: usize) -> String {
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let name_width = series.iter().map(|s| s.name.len()).max().unwrap_or(0);

    let mut output = format!("{title}\n");
    for (idx, label) in labels.iter().enumerate() {
        for (pos, s) in series.iter().enumerate() {
            let value = s.values.get(idx).copied().unwrap_or(0.0);
            let shown_label = if pos == 0 { label.as_str() } else { "" };
            output.push_str(&format!(
                "{shown_label:<label_width$}  {:<name_width$} {} {value:.2}\n",
                s.name,
                s.style.apply_to(bar(value, max, width)),
            ));
        }
    }
    output
}

/// Renders each item's share of the total with a percentage, like a pie
/// chart laid out as bars.
pub fn share_bars(title: &str, items: &[(String, f64)], width: usize, style: &Style) -> String {
    let total: f64 = items.iter().map(|(_, v)| *v).sum();
    let label_width = items.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut output = format!("{title}\n");
    for (label, value) in items {
        let pct = if total > 0.0 {
            value / total * 100.0
        } else {
            0.0
        };
        output.push_str(&format!(
            "{label:<label_width$}  {} {pct:.1}%\n",
            style.apply_to(bar(pct, 100.0, width)),
        ));
    }
    output
}
