use super::{chart, ui};
use crate::core::projection::{GrowthPlan, project_growth};
use comfy_table::Cell;
use console::Style;

pub fn display_as_table(plan: &GrowthPlan) -> String {
    let balances = project_growth(plan);

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Year"), ui::header_cell("Balance")]);
    for yb in &balances {
        table.add_row(vec![Cell::new(yb.year), ui::amount_cell(yb.balance)]);
    }

    let title = format!(
        "Growth of {:.2} at {:.2}% with {:.2}/month over {} years",
        plan.principal, plan.annual_rate_pct, plan.monthly_contribution, plan.years
    );
    format!(
        "{}\n\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        table
    )
}

pub fn display_as_chart(plan: &GrowthPlan, width: usize) -> String {
    let balances = project_growth(plan);
    let labels: Vec<String> = balances.iter().map(|yb| format!("Year {}", yb.year)).collect();
    let series = vec![chart::Series {
        name: "Balance",
        style: Style::new().cyan(),
        values: balances.iter().map(|yb| yb.balance).collect(),
    }];
    chart::grouped_bars(
        &ui::style_text("Investment Growth Over Time", ui::StyleType::Title),
        &labels,
        &series,
        width,
    )
}

pub fn run(plan: &GrowthPlan) {
    if plan.years == 0 {
        println!("Nothing to project for 0 years.");
        return;
    }
    println!("{}", display_as_table(plan));
    println!();
    println!(
        "{}",
        display_as_chart(plan, chart::bar_width(ui::term_width(), 8))
    );
}
