//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::{SinkKind, StarfieldConfig};

#[derive(Debug, Parser)]
#[command(name = "keystars")]
#[command(about = "Starfield lighting effect that also lights the keys you press")]
pub struct Cli {
    /// Config file path (default: ~/.config/keystars/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to send frames
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Keyboard event device to read (repeatable; default: all keyboards)
    #[arg(short, long = "device", value_name = "PATH")]
    pub devices: Vec<PathBuf>,

    /// Fixed random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub save_config: bool,

    /// List detected keyboards and exit
    #[arg(long)]
    pub list_devices: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut StarfieldConfig) {
        if let Some(sink) = self.sink {
            config.sink = sink;
        }
        if !self.devices.is_empty() {
            config.devices = self.devices.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}
