use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

/// Animated particle field backgrounds: simulate, snapshot and preview.
#[derive(Parser, Debug)]
#[command(name = "neural-field")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command that runs the simulation
#[derive(Args, Debug, Clone)]
pub struct FieldArgs {
    /// Field configuration file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    pub width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    pub height: f64,

    /// Seed the particle layout for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Park the cursor at `x,y` for the whole run
    #[arg(long, value_parser = parse_point)]
    pub cursor: Option<Point>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the field headlessly and report statistics
    Simulate {
        #[command(flatten)]
        field: FieldArgs,

        /// Number of frames to run
        #[arg(short = 'n', long, default_value = "1000")]
        steps: usize,
    },
    /// Run the field and write the last frame as SVG
    Snapshot {
        #[command(flatten)]
        field: FieldArgs,

        /// Number of frames to run before capturing
        #[arg(short = 'n', long, default_value = "120")]
        steps: usize,

        /// SVG file to write
        #[arg(short, long, default_value = "frame.svg")]
        output: PathBuf,
    },
    /// Generate an HTML page that mounts the wasm background
    Preview {
        /// Field configuration file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// wasm-pack output directory of neural-field-web to copy alongside
        #[arg(long)]
        pkg: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "neural-field")]
        title: String,
    },
    /// Start a preview server with live reload
    Serve {
        /// Field configuration file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// wasm-pack output directory of neural-field-web to copy alongside
        #[arg(long)]
        pkg: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "neural-field")]
        title: String,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

/// A fixed cursor position given on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
        let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
        let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
        Ok(Self { x, y })
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    s.parse()
}
