//! Monthly cash-flow aggregation.
use crate::core::records::Transaction;
use std::collections::{BTreeMap, BTreeSet};

/// Income, expense and savings totals keyed by `YYYY-MM` month bucket.
///
/// Keys are zero-padded so the maps iterate in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlow {
    pub income: BTreeMap<String, f64>,
    pub expense: BTreeMap<String, f64>,
    pub savings: BTreeMap<String, f64>,
}

impl CashFlow {
    /// Sorted union of the months seen in income or expense.
    pub fn months(&self) -> Vec<String> {
        self.income
            .keys()
            .chain(self.expense.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn income_for(&self, month: &str) -> f64 {
        self.income.get(month).copied().unwrap_or(0.0)
    }

    pub fn expense_for(&self, month: &str) -> f64 {
        self.expense.get(month).copied().unwrap_or(0.0)
    }

    pub fn savings_for(&self, month: &str) -> f64 {
        self.savings.get(month).copied().unwrap_or(0.0)
    }

    /// Overall (income, expense, savings) across all months.
    pub fn totals(&self) -> (f64, f64, f64) {
        let income: f64 = self.income.values().sum();
        let expense: f64 = self.expense.values().sum();
        (income, expense, income - expense)
    }
}

/// Buckets transactions by month. Non-negative amounts count as income,
/// negative amounts contribute their magnitude to expenses.
pub fn monthly_cashflow(transactions: &[Transaction]) -> CashFlow {
    let mut flow = CashFlow::default();

    for txn in transactions {
        let month = txn.month_key();
        if txn.is_income() {
            *flow.income.entry(month).or_insert(0.0) += txn.amount;
        } else {
            *flow.expense.entry(month).or_insert(0.0) += -txn.amount;
        }
    }

    for month in flow.months() {
        let savings = flow.income_for(&month) - flow.expense_for(&month);
        flow.savings.insert(month, savings);
    }

    flow
}
