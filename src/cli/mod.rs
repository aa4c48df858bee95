use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jtl::FieldCode;

mod config;
mod dump;
mod info;

pub use dump::OutputFormat;

/// jtl - JMeter result log inspector
#[derive(Parser)]
#[command(name = "jtl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display format, version and sample count of a result log
    Info {
        /// Input result log (XML or CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the samples of a result log
    Dump {
        /// Input result log (XML or CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format (json lines or tsv)
        #[arg(short = 'o', long, value_enum)]
        output: Option<OutputFormat>,

        /// Stop after this many samples
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Comma-separated field codes to print, in order (default: all 17)
        #[arg(short = 'f', long, value_delimiter = ',')]
        fields: Option<Vec<FieldCode>>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file } => info::run(file),
        Commands::Dump {
            file,
            output,
            limit,
            fields,
            config,
        } => dump::run(file, output, limit, fields, config),
    }
}
