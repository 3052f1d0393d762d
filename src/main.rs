use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fintrack::core::config::ConfigOverrides;
use fintrack::core::log::init_logging;
use fintrack::core::projection::{GrowthPlan, MAX_PROJECTION_YEARS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Directory containing transactions.csv, balances.txt and portfolio.csv
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use deterministic offline prices instead of live market data
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display every report
    Report,
    /// Display monthly income, expenses and savings
    Cashflow,
    /// Display expenses by category
    Categories,
    /// Display portfolio holdings and value
    Portfolio,
    /// Display balances, portfolio value and net worth
    Networth,
    /// Project compound growth of a savings plan
    Project {
        /// Initial investment
        #[arg(long, default_value_t = 10000.0)]
        principal: f64,
        /// Annual interest rate in percent
        #[arg(long, default_value_t = 6.0)]
        rate: f64,
        /// Amount added every month
        #[arg(long, default_value_t = 200.0)]
        contribution: f64,
        /// Duration in years
        #[arg(
            long,
            default_value_t = 20,
            value_parser = clap::value_parser!(u32).range(0..=MAX_PROJECTION_YEARS as i64)
        )]
        years: u32,
    },
}

impl From<Commands> for fintrack::AppCommand {
    fn from(cmd: Commands) -> fintrack::AppCommand {
        match cmd {
            Commands::Report => fintrack::AppCommand::Report,
            Commands::Cashflow => fintrack::AppCommand::Cashflow,
            Commands::Categories => fintrack::AppCommand::Categories,
            Commands::Portfolio => fintrack::AppCommand::Portfolio,
            Commands::Networth => fintrack::AppCommand::NetWorth,
            Commands::Project {
                principal,
                rate,
                contribution,
                years,
            } => fintrack::AppCommand::Project(GrowthPlan {
                principal,
                annual_rate_pct: rate,
                monthly_contribution: contribution,
                years,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = ConfigOverrides {
        data_dir: cli.data_dir,
        offline: cli.offline,
    };

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => {
            fintrack::run_command(cmd.into(), cli.config_path.as_deref(), &overrides).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fintrack::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
data_dir: "data"
offline: false
lookup_timeout_secs: 10

providers:
  yahoo:
    base_url: "https://query1.finance.yahoo.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    println!("Created default configuration at {}", path.display());
    Ok(())
}
