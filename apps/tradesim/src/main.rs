mod commands;
mod infra;
mod obs;

use clap::{Parser, Subcommand};
use commands::{Command, SimulateArgs};
use obs::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradesim")]
#[command(
    about = "Single-trade outcome simulator over historical XAUUSD bars",
    version,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  tradesim simulate --entry \"2021-03-01 10:00\" --side buy --sl 1795 --tp 1810\n  tradesim simulate --entry \"2021-03-01 10:00\" --side sell --sl-pips 50 --tp-pips 100 --breakeven yes\n  tradesim validate --data data/ --strict\n"
)]
struct Cli {
    /// Log filter when TRADESIM_LOG is unset (e.g. info, tradesim_application=debug).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Serve Prometheus metrics on host:port.
    #[arg(long, global = true, env = "TRADESIM_METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Simulate one trade against the price file.
    Simulate {
        /// Entry bar time, e.g. "2021-03-01 10:00" (truncated to the minute).
        #[arg(long)]
        entry: String,
        /// buy | sell
        #[arg(long)]
        side: String,
        /// Stop-loss price.
        #[arg(long, conflicts_with_all = ["sl_pips", "tp_pips"])]
        sl: Option<f64>,
        /// Take-profit price.
        #[arg(long, conflicts_with_all = ["sl_pips", "tp_pips"])]
        tp: Option<f64>,
        /// Stop-loss distance from the entry close, in pips.
        #[arg(long)]
        sl_pips: Option<f64>,
        /// Take-profit distance from the entry close, in pips.
        #[arg(long)]
        tp_pips: Option<f64>,
        /// Run the 3R scan with (true|1|yes) or without (false|0|no) breakeven.
        #[arg(long)]
        breakeven: Option<String>,
        /// Price file (.csv or .parquet) or directory to search for the instrument's file.
        #[arg(long)]
        data: Option<PathBuf>,
        /// Config file path (TOML).
        #[arg(long, env = "TRADESIM_CONFIG")]
        config: Option<PathBuf>,
        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Load the price file and report data quality.
    Validate {
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long, env = "TRADESIM_CONFIG")]
        config: Option<PathBuf>,
        /// Fail when data-quality limits are exceeded.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = obs::init_tracing(&cli.log_level, cli.log_format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let command = match cli.command {
        CliCommand::Simulate {
            entry,
            side,
            sl,
            tp,
            sl_pips,
            tp_pips,
            breakeven,
            data,
            config,
            json,
        } => Command::Simulate(SimulateArgs {
            entry,
            side,
            sl,
            tp,
            sl_pips,
            tp_pips,
            breakeven,
            data,
            config,
            json,
        }),
        CliCommand::Validate {
            data,
            config,
            strict,
        } => Command::Validate {
            data,
            config,
            strict,
        },
    };

    if let Err(err) = commands::run(command) {
        eprintln!("error: {err}");
        std::process::exit(commands::exit_code(&err));
    }
}
