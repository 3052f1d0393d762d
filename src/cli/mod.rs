//! Terminal presentation of reports

pub mod cashflow;
pub mod categories;
pub mod chart;
pub mod networth;
pub mod portfolio;
pub mod project;
pub mod ui;
