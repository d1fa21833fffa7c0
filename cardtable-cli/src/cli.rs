use std::path::PathBuf;

use cardtable_shared::Preset;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cardtable",
    about = "Cardtable web demo developer CLI",
    version
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the script manifest in load order
    Scripts {
        /// Config file (defaults to the nearest cardtable.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Parse and validate a config file
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Dry-run the scene bootstrap and print every engine call
    Plan {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Scene preset, replacing the config's own scene
        #[arg(short, long)]
        preset: Option<Preset>,
        /// Display refreshes to drive once the render loop starts
        #[arg(long, default_value = "1")]
        frames: usize,
        /// Viewport resize events to deliver
        #[arg(long, default_value = "0")]
        resizes: usize,
        /// Pretend the page has no render surface
        #[arg(long)]
        no_surface: bool,
        /// Pretend engine construction yields nothing
        #[arg(long)]
        no_engine: bool,
    },
    /// Write a cardtable.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[arg(short, long, default_value = "classic")]
        preset: Preset,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Build the WASM runtime with wasm-pack
    Build {
        /// Unoptimized debug build
        #[arg(long)]
        dev: bool,
    },
}
