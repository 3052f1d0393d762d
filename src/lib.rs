pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cashflow::{CashFlow, monthly_cashflow};
use crate::core::categories::category_breakdown;
use crate::core::config::{AppConfig, ConfigOverrides};
use crate::core::projection::GrowthPlan;
use crate::core::records::{self, DataFiles, Holding, Transaction};
use crate::core::valuation::{self, PortfolioValue};
use crate::providers::YahooFinanceSource;
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

pub enum AppCommand {
    Report,
    Cashflow,
    Categories,
    Portfolio,
    NetWorth,
    Project(GrowthPlan),
}

/// Everything read from the data directory.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub transactions: Vec<Transaction>,
    pub balances: Vec<f64>,
    pub holdings: Vec<Holding>,
}

impl Inputs {
    pub fn load(files: &DataFiles) -> Result<Self> {
        Ok(Inputs {
            transactions: records::read_transactions(&files.transactions)?,
            balances: records::read_balances(&files.balances)?,
            holdings: records::read_portfolio(&files.portfolio)?,
        })
    }
}

/// Output of the full pipeline, ready for presentation.
#[derive(Debug, Clone)]
pub struct FinanceReport {
    pub cashflow: CashFlow,
    pub categories: HashMap<String, f64>,
    pub balances: Vec<f64>,
    pub portfolio: PortfolioValue,
}

impl FinanceReport {
    pub fn net_worth(&self) -> f64 {
        valuation::net_worth(&self.balances, self.portfolio.total)
    }
}

pub async fn value_holdings(
    holdings: Vec<Holding>,
    config: &AppConfig,
    on_progress: &(dyn Fn() + Send + Sync),
) -> PortfolioValue {
    let options = config.lookup_options();
    let source = YahooFinanceSource::new(config.yahoo_base_url(), options.timeout);
    valuation::value_portfolio(
        holdings,
        config.price_mode(),
        &source,
        &options,
        on_progress,
    )
    .await
}

pub async fn build_report(
    inputs: Inputs,
    config: &AppConfig,
    on_progress: &(dyn Fn() + Send + Sync),
) -> FinanceReport {
    let cashflow = monthly_cashflow(&inputs.transactions);
    let categories = category_breakdown(&inputs.transactions);
    let portfolio = value_holdings(inputs.holdings, config, on_progress).await;

    FinanceReport {
        cashflow,
        categories,
        balances: inputs.balances,
        portfolio,
    }
}

async fn value_with_progress(holdings: Vec<Holding>, config: &AppConfig) -> PortfolioValue {
    let pb = cli::ui::new_progress_bar(valuation::distinct_symbols(&holdings).len() as u64);
    pb.set_message(format!("Fetching {} prices...", config.price_mode()));
    let portfolio = value_holdings(holdings, config, &|| pb.inc(1)).await;
    pb.finish_and_clear();
    portfolio
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<()> {
    info!("fintrack starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    }
    .apply(overrides);
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Project(plan) => {
            plan.validate()?;
            cli::project::run(&plan);
        }
        command => run_data_command(command, &config).await?,
    }

    Ok(())
}

async fn run_data_command(command: AppCommand, config: &AppConfig) -> Result<()> {
    let files = DataFiles::locate(config.data_path())?;
    let inputs = Inputs::load(&files)?;

    match command {
        AppCommand::Cashflow => cli::cashflow::run(&monthly_cashflow(&inputs.transactions)),
        AppCommand::Categories => cli::categories::run(&category_breakdown(&inputs.transactions)),
        AppCommand::Portfolio => {
            let portfolio = value_with_progress(inputs.holdings, config).await;
            cli::portfolio::run(&portfolio);
        }
        AppCommand::NetWorth => {
            let portfolio = value_with_progress(inputs.holdings, config).await;
            cli::networth::run(&inputs.balances, portfolio.total);
        }
        AppCommand::Report => {
            let pb = cli::ui::new_progress_bar(
                valuation::distinct_symbols(&inputs.holdings).len() as u64,
            );
            pb.set_message(format!("Fetching {} prices...", config.price_mode()));
            let report = build_report(inputs, config, &|| pb.inc(1)).await;
            pb.finish_and_clear();

            cli::cashflow::print_table(&report.cashflow);
            cli::ui::print_separator();
            cli::networth::run(&report.balances, report.portfolio.total);
            cli::ui::print_separator();
            cli::portfolio::run(&report.portfolio);
            cli::ui::print_separator();
            cli::categories::print_table(&report.categories);
            cli::ui::print_separator();

            cli::cashflow::print_chart(&report.cashflow);
            cli::categories::print_chart(&report.categories);
        }
        AppCommand::Project(plan) => cli::project::run(&plan),
    }

    Ok(())
}
