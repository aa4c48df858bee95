//! # jtl
//!
//! A command-line tool for inspecting JMeter result logs (JTL files).
//!
//! ## Usage
//!
//! ```bash
//! # Show format, version and sample count
//! jtl info results.jtl
//!
//! # Print samples as JSON lines
//! jtl dump results.jtl --limit 10
//!
//! # Print selected fields as TSV
//! jtl dump results.jtl --output tsv --fields ts,lb,t,rc
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
