//! Turns raw rows from the data files into transactions, balances and holdings.
//!
//! Ingestion is best effort: a row that cannot be understood is dropped and
//! never reported as an error. Only I/O failures on the files themselves are
//! surfaced to the caller.
use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TRANSACTIONS_FILE: &str = "transactions.csv";
pub const BALANCES_FILE: &str = "balances.txt";
pub const PORTFOLIO_FILE: &str = "portfolio.csv";

const DEFAULT_CATEGORY: &str = "Uncategorized";
const COMMENT_MARKER: char = '#';

/// A single CSV row keyed by header name.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

impl Transaction {
    /// Year-month bucket, e.g. `2024-01`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_income(&self) -> bool {
        self.amount >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
}

/// Paths of the three input files inside a data directory.
#[derive(Debug, Clone)]
pub struct DataFiles {
    pub transactions: PathBuf,
    pub balances: PathBuf,
    pub portfolio: PathBuf,
}

impl DataFiles {
    /// Resolves the input files in `dir`, failing if any of them is absent.
    pub fn locate<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let files = DataFiles {
            transactions: dir.join(TRANSACTIONS_FILE),
            balances: dir.join(BALANCES_FILE),
            portfolio: dir.join(PORTFOLIO_FILE),
        };

        let missing: Vec<&str> = [
            (&files.transactions, TRANSACTIONS_FILE),
            (&files.balances, BALANCES_FILE),
            (&files.portfolio, PORTFOLIO_FILE),
        ]
        .into_iter()
        .filter(|(path, _)| !path.is_file())
        .map(|(_, name)| name)
        .collect();

        if !missing.is_empty() {
            bail!(
                "One or more data files are missing in {}: {} (expected: {}, {}, {})",
                dir.display(),
                missing.join(", "),
                TRANSACTIONS_FILE,
                BALANCES_FILE,
                PORTFOLIO_FILE
            );
        }

        debug!("Located data files in {}", dir.display());
        Ok(files)
    }
}

/// Accepts ISO-8601 calendar dates (`YYYY-MM-DD` or `YYYYMMDD`), optionally
/// followed by a time of day after `T` or a space, and an optional `Z` or
/// `+HH[:MM]` offset. Only the calendar date is kept.
fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let (date_part, time_part) = match text.find(['T', ' ']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };
    let date = parse_calendar_date(date_part)?;
    if let Some(time) = time_part {
        parse_time_of_day(time)?;
    }
    Some(date)
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(
        text[..4].parse().ok()?,
        text[4..6].parse().ok()?,
        text[6..].parse().ok()?,
    )
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let clock = match text.strip_suffix('Z') {
        Some(clock) => clock,
        None => match text.rfind(['+', '-']) {
            Some(idx) if is_utc_offset(&text[idx + 1..]) => &text[..idx],
            Some(_) => return None,
            None => text,
        },
    };
    // Hour-only times carry no minutes for the parser to find
    let clock = if clock.len() == 2 {
        format!("{clock}:00")
    } else {
        clock.to_string()
    };
    ["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"]
        .into_iter()
        .find_map(|format| NaiveTime::parse_from_str(&clock, format).ok())
}

fn is_utc_offset(text: &str) -> bool {
    let digits = text.replace(':', "");
    matches!(digits.len(), 2 | 4 | 6)
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits[..2].parse::<u32>().is_ok_and(|hours| hours < 24)
}

fn parse_decimal(text: Option<&String>) -> f64 {
    text.and_then(|t| t.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn trimmed(row: &RawRow, key: &str) -> Option<String> {
    row.get(key).map(|v| v.trim().to_string())
}

/// Parses one transaction row, or `None` when the row must be skipped.
pub fn parse_transaction_row(row: &RawRow) -> Option<Transaction> {
    let date_field = trimmed(row, "Date").unwrap_or_default();
    if date_field.is_empty() || date_field.starts_with(COMMENT_MARKER) {
        return None;
    }
    let Some(date) = parse_iso_date(&date_field) else {
        debug!("Skipping transaction with malformed date: {date_field}");
        return None;
    };

    let category = trimmed(row, "Category")
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    Some(Transaction {
        date,
        description: trimmed(row, "Description").unwrap_or_default(),
        amount: parse_decimal(row.get("Amount")),
        category,
    })
}

pub fn parse_transactions<I>(rows: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = RawRow>,
{
    rows.into_iter()
        .filter_map(|row| parse_transaction_row(&row))
        .collect()
}

/// Parses the leading numeric token of a balance line.
pub fn parse_balance_line(line: &str) -> Option<f64> {
    let token = line.split_whitespace().next()?;
    match token.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Skipping balance line: {line}");
            None
        }
    }
}

pub fn parse_balances<I, S>(lines: I) -> Vec<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_balance_line(line.as_ref()))
        .collect()
}

/// Parses one portfolio row. `Symbol` wins over `symbol` unless it is empty.
pub fn parse_holding_row(row: &RawRow) -> Option<Holding> {
    let symbol = [row.get("Symbol"), row.get("symbol")]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())?
        .trim()
        .to_string();
    if symbol.is_empty() {
        return None;
    }

    Some(Holding {
        symbol,
        quantity: parse_decimal(row.get("Quantity")),
    })
}

pub fn parse_holdings<I>(rows: I) -> Vec<Holding>
where
    I: IntoIterator<Item = RawRow>,
{
    rows.into_iter()
        .filter_map(|row| parse_holding_row(&row))
        .collect()
}

/// Reads a CSV file with a header row into raw rows. Records the reader
/// cannot decode are skipped like any other malformed row.
fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers: {}", path.display()))?
        .clone();

    let rows: Vec<RawRow> = reader
        .records()
        .enumerate()
        .filter_map(|(idx, record)| match record {
            Ok(record) => Some(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.to_string(), v.to_string()))
                    .collect(),
            ),
            Err(e) => {
                debug!("Skipping unreadable CSV record {}: {}", idx + 2, e);
                None
            }
        })
        .collect();
    Ok(rows)
}

pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let transactions = parse_transactions(read_csv_rows(path.as_ref())?);
    info!("Loaded {} transactions", transactions.len());
    Ok(transactions)
}

pub fn read_balances<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read balances file: {}", path.display()))?;
    let balances = parse_balances(content.lines());
    info!("Loaded {} balances", balances.len());
    Ok(balances)
}

pub fn read_portfolio<P: AsRef<Path>>(path: P) -> Result<Vec<Holding>> {
    let holdings = parse_holdings(read_csv_rows(path.as_ref())?);
    info!("Loaded {} holdings", holdings.len());
    Ok(holdings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_transaction_row() {
        let txn = parse_transaction_row(&row(&[
            ("Date", " 2024-01-05 "),
            ("Description", "  Paycheck "),
            ("Amount", "1000.50"),
            ("Category", " Salary "),
        ]))
        .unwrap();

        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(txn.description, "Paycheck");
        assert_eq!(txn.amount, 1000.5);
        assert_eq!(txn.category, "Salary");
        assert_eq!(txn.month_key(), "2024-01");
        assert!(txn.is_income());
    }

    #[test]
    fn test_skips_empty_and_comment_dates() {
        let rows = vec![
            row(&[("Date", ""), ("Amount", "10")]),
            row(&[("Date", "   "), ("Amount", "10")]),
            row(&[("Date", "# header note"), ("Amount", "10")]),
            row(&[("Amount", "10")]),
        ];
        assert!(parse_transactions(rows).is_empty());
    }

    #[test]
    fn test_skips_malformed_dates() {
        let rows = vec![
            row(&[("Date", "05/01/2024"), ("Amount", "10")]),
            row(&[("Date", "2024-13-01"), ("Amount", "10")]),
            row(&[("Date", "yesterday"), ("Amount", "10")]),
            row(&[("Date", "2024-01-05T25"), ("Amount", "10")]),
            row(&[("Date", "2024-01-05T10:15+"), ("Amount", "10")]),
            row(&[("Date", "2024-01-05T"), ("Amount", "10")]),
            row(&[("Date", "20241301"), ("Amount", "10")]),
        ];
        assert!(parse_transactions(rows).is_empty());
    }

    #[test]
    fn test_accepts_iso_datetimes() {
        for text in [
            "2024-03-09T10:15:00",
            "2024-03-09 10:15",
            "2024-03-09T10:15:00.250",
            "2024-03-09T10:15:00+02:00",
        ] {
            let txn = parse_transaction_row(&row(&[("Date", text), ("Amount", "1")]))
                .unwrap_or_else(|| panic!("expected {text} to parse"));
            assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        }

        for text in [
            "2024-01-05T10",
            "2024-01-05T10:15Z",
            "2024-01-05T10:15+02:00",
            "2024-01-05T10:15:00+0200",
            "2024-01-05T10:15:00.123456-05:30",
            "20240105",
            "20240105T1015",
        ] {
            assert_eq!(
                parse_iso_date(text),
                NaiveDate::from_ymd_opt(2024, 1, 5),
                "expected {text} to parse"
            );
        }
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let txn = parse_transaction_row(&row(&[("Date", "2024-02-01"), ("Amount", "abc")]))
            .unwrap();
        assert_eq!(txn.amount, 0.0);
        assert_eq!(txn.description, "");
        assert_eq!(txn.category, "Uncategorized");

        let txn = parse_transaction_row(&row(&[("Date", "2024-02-01"), ("Category", "  ")]))
            .unwrap();
        assert_eq!(txn.amount, 0.0);
        assert_eq!(txn.category, "Uncategorized");
    }

    #[test]
    fn test_parse_balances() {
        let lines = [
            "1500.25 checking",
            "",
            "   ",
            "savings 300",
            "-42",
            "2000\tbrokerage cash",
        ];
        assert_eq!(parse_balances(lines), vec![1500.25, -42.0, 2000.0]);
    }

    #[test]
    fn test_non_numeric_balance_line_is_skipped() {
        assert_eq!(parse_balance_line("n/a"), None);
        assert!(parse_balances(["not a number"]).is_empty());
    }

    #[test]
    fn test_parse_holdings() {
        let rows = vec![
            row(&[("Symbol", " AAPL "), ("Quantity", "2.5")]),
            row(&[("symbol", "TSLA"), ("Quantity", "x")]),
            row(&[("Symbol", ""), ("symbol", "MSFT"), ("Quantity", "1")]),
            row(&[("Quantity", "3")]),
            row(&[("Symbol", "   "), ("Quantity", "3")]),
        ];
        let holdings = parse_holdings(rows);
        assert_eq!(
            holdings,
            vec![
                Holding {
                    symbol: "AAPL".to_string(),
                    quantity: 2.5
                },
                Holding {
                    symbol: "TSLA".to_string(),
                    quantity: 0.0
                },
                Holding {
                    symbol: "MSFT".to_string(),
                    quantity: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_read_files() {
        let dir = tempfile::tempdir().unwrap();
        let txn_path = dir.path().join(TRANSACTIONS_FILE);
        fs::write(
            &txn_path,
            "Date,Description,Amount,Category\n\
             # comment,ignored,1,X\n\
             2024-01-05,Salary,1000,Salary\n\
             2024-01-10,Shop,-200\n\
             bad-date,Oops,5,Misc\n",
        )
        .unwrap();
        let bal_path = dir.path().join(BALANCES_FILE);
        fs::write(&bal_path, "100 checking\n\nabc\n250.5\n").unwrap();
        let port_path = dir.path().join(PORTFOLIO_FILE);
        fs::write(&port_path, "symbol,Quantity\nAAPL,2\n,5\nBTC-USD,0.5\n").unwrap();

        let txns = read_transactions(&txn_path).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].category, "Uncategorized");
        assert_eq!(txns[1].amount, -200.0);

        assert_eq!(read_balances(&bal_path).unwrap(), vec![100.0, 250.5]);

        let holdings = read_portfolio(&port_path).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[1].symbol, "BTC-USD");
        assert_eq!(holdings[1].quantity, 0.5);
    }

    #[test]
    fn test_locate_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRANSACTIONS_FILE), "Date\n").unwrap();

        let err = DataFiles::locate(dir.path()).unwrap_err().to_string();
        assert!(err.contains("One or more data files are missing"));
        assert!(err.contains(BALANCES_FILE));
        assert!(err.contains(PORTFOLIO_FILE));

        fs::write(dir.path().join(BALANCES_FILE), "").unwrap();
        fs::write(dir.path().join(PORTFOLIO_FILE), "Symbol,Quantity\n").unwrap();
        let files = DataFiles::locate(dir.path()).unwrap();
        assert_eq!(files.portfolio, dir.path().join(PORTFOLIO_FILE));
    }
}
