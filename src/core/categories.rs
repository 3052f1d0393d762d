use crate::core::records::Transaction;
use std::collections::HashMap;

/// Sums expense magnitudes per category. Income never contributes, and
/// categories without any expense are absent.
pub fn category_breakdown(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();
    for txn in transactions.iter().filter(|t| !t.is_income()) {
        *totals.entry(txn.category.clone()).or_insert(0.0) += -txn.amount;
    }
    totals
}

/// Orders category totals from largest to smallest. Equal totals are
/// ordered by category name.
pub fn rank_categories(totals: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| a.0.cmp(&b.0));
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
