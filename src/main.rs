//! Calcy CLI
//!
//! Drives the calculator engine from button labels or raw keystrokes and
//! keeps finished calculations in a CSV history file.
//!
//! # Usage
//!
//! ```bash
//! calcy press 7 + 5 =
//! printf '2+3+4\n' | calcy keys
//! calcy history
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use calcy::{
    CalcError, Calculator, CsvHistory, HistorySink, HistorySource, MemoryHistory, Result,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "calcy", version, about = "A sequential four-function calculator")]
struct Cli {
    /// CSV file holding the calculation history
    #[arg(long, global = true, default_value = "calcy_history.csv")]
    history: PathBuf,

    /// Do not read or write the history file
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Press calculator buttons in order (0-9 . + - × ÷ = AC +/- % backspace)
    Press {
        #[arg(required = true, allow_hyphen_values = true)]
        labels: Vec<String>,
    },

    /// Type keystrokes from a file, or stdin when no file is given
    Keys { input: Option<PathBuf> },

    /// List stored calculations, newest first
    History {
        /// Delete all stored calculations
        #[arg(long)]
        clear: bool,
    },
}

/// Input for one calculator session.
enum Input {
    Labels(Vec<String>),
    Keys(String),
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let input = match cli.command {
        Command::Press { labels } => Input::Labels(labels),
        Command::Keys { input } => Input::Keys(read_keys(input)?),
        Command::History { clear } => {
            if cli.no_history {
                return Err(CalcError::HistoryDisabled);
            }
            return show_history(CsvHistory::open(cli.history)?, clear);
        }
    };

    if cli.no_history {
        run_session(MemoryHistory::new(), input)
    } else {
        run_session(CsvHistory::open(cli.history)?, input)
    }
}

fn read_keys(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut keys = String::new();
            io::stdin().lock().read_to_string(&mut keys)?;
            Ok(keys)
        }
    }
}

/// Feeds the input to a fresh calculator, printing each commit and the
/// final readout.
fn run_session<H: HistorySink>(history: H, input: Input) -> Result<()> {
    let mut calc = Calculator::new(history);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let commits: Vec<_> = match input {
        Input::Labels(labels) => labels
            .iter()
            .filter_map(|label| calc.press_label(label))
            .collect(),
        Input::Keys(keys) => keys.chars().filter_map(|key| calc.press_key(key)).collect(),
    };

    for commit in commits {
        writeln!(out, "{} = {}", commit.transcript, commit.result)?;
    }
    writeln!(out, "{}", calc.state().readout())?;
    out.flush()?;

    Ok(())
}

fn show_history(mut history: CsvHistory, clear: bool) -> Result<()> {
    if clear {
        history.clear()?;
        println!("History cleared");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in history.recent()? {
        writeln!(
            out,
            "{}  {} = {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.operation,
            entry.result
        )?;
    }
    out.flush()?;

    Ok(())
}
