//! Compound growth of a savings plan with monthly contributions.
use anyhow::{Result, bail};

/// Longest horizon a plan may cover.
pub const MAX_PROJECTION_YEARS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPlan {
    pub principal: f64,
    /// Annual interest rate in percent, compounded monthly.
    pub annual_rate_pct: f64,
    pub monthly_contribution: f64,
    pub years: u32,
}

impl GrowthPlan {
    pub fn validate(&self) -> Result<()> {
        if self.years > MAX_PROJECTION_YEARS {
            bail!(
                "Projection horizon of {} years exceeds the maximum of {}",
                self.years,
                MAX_PROJECTION_YEARS
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearBalance {
    pub year: u32,
    pub balance: f64,
}

/// Year-end balances. Each month interest is applied before the
/// contribution is added.
pub fn project_growth(plan: &GrowthPlan) -> Vec<YearBalance> {
    let monthly_rate = plan.annual_rate_pct / 12.0 / 100.0;
    let mut balance = plan.principal;
    (1..=plan.years)
        .map(|year| {
            for _ in 0..12 {
                balance *= 1.0 + monthly_rate;
                balance += plan.monthly_contribution;
            }
            YearBalance { year, balance }
        })
        .collect()
}
