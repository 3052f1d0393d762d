use super::{chart, ui};
use crate::core::cashflow::CashFlow;
use comfy_table::Cell;
use console::Style;

impl CashFlow {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Month"),
            ui::header_cell("Income"),
            ui::header_cell("Expenses"),
            ui::header_cell("Savings"),
        ]);

        for month in self.months() {
            table.add_row(vec![
                Cell::new(&month),
                ui::amount_cell(self.income_for(&month)),
                ui::amount_cell(self.expense_for(&month)),
                ui::signed_amount_cell(self.savings_for(&month)),
            ]);
        }

        let (income, expense, savings) = self.totals();
        table.add_row(vec![
            ui::header_cell("Total"),
            ui::amount_cell(income),
            ui::amount_cell(expense),
            ui::signed_amount_cell(savings),
        ]);

        format!(
            "{}\n\n{}",
            ui::style_text("Monthly Cash Flow Report", ui::StyleType::Title),
            table
        )
    }

    pub fn display_as_chart(&self, width: usize) -> String {
        let months = self.months();
        let series = vec![
            chart::Series {
                name: "Income",
                style: Style::new().green(),
                values: months.iter().map(|m| self.income_for(m)).collect(),
            },
            chart::Series {
                name: "Expenses",
                style: Style::new().red(),
                values: months.iter().map(|m| self.expense_for(m)).collect(),
            },
        ];
        chart::grouped_bars(
            &ui::style_text("Income vs Expenses per Month", ui::StyleType::Title),
            &months,
            &series,
            width,
        )
    }
}

pub fn run(flow: &CashFlow) {
    print_table(flow);
    print_chart(flow);
}

pub fn print_table(flow: &CashFlow) {
    if flow.months().is_empty() {
        println!("No transactions to report.");
        return;
    }
    println!("{}", flow.display_as_table());
}

pub fn print_chart(flow: &CashFlow) {
    if flow.months().is_empty() {
        return;
    }
    println!();
    println!("{}", flow.display_as_chart(chart::bar_width(ui::term_width(), 7)));
}
