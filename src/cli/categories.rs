use super::{chart, ui};
use crate::core::categories::rank_categories;
use comfy_table::Cell;
use console::Style;
use std::collections::HashMap;

/// Category totals, largest first, with each category's share of spending.
pub fn display_as_table(totals: &HashMap<String, f64>) -> String {
    let ranked = rank_categories(totals);
    let total: f64 = ranked.iter().map(|(_, v)| v).sum();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Spent"),
        ui::header_cell("Share (%)"),
    ]);
    for (category, value) in &ranked {
        let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(category),
            ui::amount_cell(*value),
            ui::amount_cell(share),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Category-wise expense breakdown", ui::StyleType::Title),
        table
    )
}

pub fn display_as_chart(totals: &HashMap<String, f64>, width: usize) -> String {
    chart::share_bars(
        &ui::style_text("Expense by Category", ui::StyleType::Title),
        &rank_categories(totals),
        width,
        &Style::new().magenta(),
    )
}

pub fn run(totals: &HashMap<String, f64>) {
    print_table(totals);
    print_chart(totals);
}

pub fn print_table(totals: &HashMap<String, f64>) {
    if !totals.is_empty() {
        println!("{}", display_as_table(totals));
    }
}

pub fn print_chart(totals: &HashMap<String, f64>) {
    if totals.is_empty() {
        println!("No expense categories to plot.");
        return;
    }
    println!();
    let label_width = totals.keys().map(|k| k.len()).max().unwrap_or(0);
    println!(
        "{}",
        display_as_chart(totals, chart::bar_width(ui::term_width(), label_width))
    );
}
