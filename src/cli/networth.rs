use super::ui;
use crate::core::valuation::net_worth;
use comfy_table::Cell;

pub fn display_as_table(balances: &[f64], portfolio_value: f64) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Account"), ui::header_cell("Balance")]);
    for (i, balance) in balances.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("Balance {}", i + 1)),
            ui::signed_amount_cell(*balance),
        ]);
    }
    table.add_row(vec![
        ui::header_cell("Total cash/balances"),
        ui::signed_amount_cell(balances.iter().sum()),
    ]);
    table.add_row(vec![
        ui::header_cell("Portfolio value"),
        ui::amount_cell(portfolio_value),
    ]);

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Net Worth", ui::StyleType::Title),
        table,
        ui::total_line("TOTAL net worth", net_worth(balances, portfolio_value))
    )
}

pub fn run(balances: &[f64], portfolio_value: f64) {
    println!("{}", display_as_table(balances, portfolio_value));
}
