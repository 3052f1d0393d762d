use super::ui;
use crate::core::valuation::PortfolioValue;
use comfy_table::{Cell, CellAlignment};

impl PortfolioValue {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Symbol"),
            ui::header_cell("Quantity"),
            ui::header_cell("Price"),
            ui::header_cell("Value"),
        ]);

        for holding in &self.holdings {
            let price_cell = if holding.price > 0.0 {
                ui::amount_cell(holding.price)
            } else {
                Cell::new(ui::style_text("0.00", ui::StyleType::Subtle))
                    .set_alignment(CellAlignment::Right)
            };
            table.add_row(vec![
                Cell::new(&holding.symbol),
                Cell::new(format!("{:.4}", holding.quantity)).set_alignment(CellAlignment::Right),
                price_cell,
                ui::amount_cell(holding.value),
            ]);
        }

        format!(
            "{}\n\n{}\n\n{}",
            ui::style_text("Portfolio Details", ui::StyleType::Title),
            table,
            ui::total_line("Total portfolio value", self.total)
        )
    }
}

pub fn run(portfolio: &PortfolioValue) {
    if portfolio.holdings.is_empty() {
        println!("No holdings found.");
        return;
    }
    println!("{}", portfolio.display_as_table());
}
