// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use account_ledger::{AccountId, Command, Ledger, LedgerError};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Account Ledger - Replay account command CSV files
///
/// Reads commands from a CSV file and outputs account states to stdout.
/// Supports open, deposit, withdraw, transfer and close.
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Replays account commands from a CSV and prints final balances", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: op,account,target,amount
    /// Example: cargo run -- commands.csv > accounts.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            error!(path = %args.input.display(), "error opening file: {e}");
            process::exit(1);
        }
    };

    let ledger = match process_commands(BufReader::new(file)) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("error processing commands: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = write_accounts(&ledger, std::io::stdout()) {
        error!("error writing output: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr; stdout carries the account CSV.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, account, target, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    account: String,
    target: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

impl CsvRecord {
    /// Converts CSV record to a ledger Command.
    ///
    /// `op` is case-insensitive and `withdrawal` is accepted as an alias for
    /// `withdraw`. `open` without an amount opens at zero.
    fn into_command(self) -> Result<Command, LedgerError> {
        let account = AccountId::new(self.account)?;

        match self.op.to_lowercase().as_str() {
            "open" => Ok(Command::Open {
                account,
                initial_balance: self.amount.unwrap_or(Decimal::ZERO),
            }),
            "deposit" => Ok(Command::Deposit {
                account,
                amount: self.amount.ok_or(LedgerError::MissingAmount)?,
            }),
            "withdraw" | "withdrawal" => Ok(Command::Withdraw {
                account,
                amount: self.amount.ok_or(LedgerError::MissingAmount)?,
            }),
            "transfer" => {
                let to = self
                    .target
                    .filter(|target| !target.is_empty())
                    .ok_or(LedgerError::MissingTarget)?;
                Ok(Command::Transfer {
                    from: account,
                    to: AccountId::new(to)?,
                    amount: self.amount.ok_or(LedgerError::MissingAmount)?,
                })
            }
            "close" => Ok(Command::Close { account }),
            _ => Err(LedgerError::UnknownOperation(self.op)),
        }
    }
}

/// Replay commands from a CSV reader.
///
/// Rows are streamed, so arbitrarily large files are never loaded whole.
/// Malformed rows and rejected commands are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `op, account, target, amount`
/// - `op`: Operation (open, deposit, withdraw or withdrawal, transfer, close)
/// - `account`: Account id (source account for transfers)
/// - `target`: Target account id (transfers only)
/// - `amount`: Decimal amount (optional for open and close)
///
/// # Example
///
/// ```csv
/// op,account,target,amount
/// open,ACC001,,100.0
/// open,ACC002,,50.0
/// transfer,ACC001,ACC002,30.0
/// close,ACC002,,
/// ```
///
/// # Errors
///
/// Returns the CSV error if the underlying reader fails. Rows that cannot be
/// parsed are skipped instead.
pub fn process_commands<R: Read>(reader: R) -> Result<Ledger, csv::Error> {
    let ledger = Ledger::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (row, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        // Header is line 1.
        let line = row + 2;
        let record = match result {
            Ok(record) => record,
            // A failing reader ends the replay; bad rows do not.
            Err(e) if e.is_io_error() => return Err(e),
            Err(e) => {
                warn!(line, "skipping malformed row: {e}");
                continue;
            }
        };

        let command = match record.into_command() {
            Ok(command) => command,
            Err(e) => {
                warn!(line, "skipping invalid command: {e}");
                continue;
            }
        };

        let op = command.name();
        let account = command.account().clone();
        let amount = command.amount();
        if let Err(e) = ledger.apply(command) {
            warn!(line, op, %account, ?amount, kind = ?e.kind(), "command rejected: {e}");
        }
    }

    Ok(ledger)
}

/// Write account states to a CSV writer
///
/// Outputs all accounts sorted by id, balances rounded to 4 decimal places.
///
/// # CSV Format
///
/// Columns: `account, balance, active`
///
/// # Example
///
/// ```csv
/// account,balance,active
/// ACC001,70.0,true
/// ACC002,80.0,false
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_accounts<W: Write>(ledger: &Ledger, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for account in ledger.accounts() {
        wtr.serialize(&*account)?;
    }

    wtr.flush()?;
    Ok(())
}
