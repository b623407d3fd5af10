use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tbtail")]
#[command(about = "Live scalar charts from TensorBoard event files, in the terminal")]
#[command(version)]
pub struct Cli {
    /// Event file, or directory to search for event files
    pub path: PathBuf,

    /// Write every scalar of the file as JSON to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write JSON logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Seconds between checks for new data
    #[arg(long, value_name = "SECS")]
    pub rescan_secs: Option<u64>,
}
