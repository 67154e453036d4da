//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use l2switch_bridge::SwitchConfig;

#[derive(Parser, Debug)]
#[command(name = "l2switch")]
#[command(
    version,
    about = "VLAN-aware Ethernet switch with a reduced spanning tree",
    long_about = None
)]
pub struct Cli {
    /// Switch id, selects configs/switch<ID>.cfg
    #[arg(value_name = "SWITCH_ID")]
    pub switch_id: String,

    /// Interfaces to switch between, in port order
    #[arg(value_name = "INTERFACE", required = true, num_args = 1..)]
    pub interfaces: Vec<String>,

    /// Explicit configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding switch<ID>.cfg files
    #[arg(long, value_name = "DIR", default_value = "configs")]
    pub config_dir: PathBuf,

    /// Interval between root hello BPDUs
    #[arg(
        long,
        value_name = "MS",
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub hello_interval_ms: u64,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Configuration file to load
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => path.clone(),
            None => SwitchConfig::path_for(&self.config_dir, &self.switch_id),
        }
    }

    pub fn hello_interval(&self) -> Duration {
        Duration::from_millis(self.hello_interval_ms)
    }

    /// Maximum log level selected by `-v`
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
