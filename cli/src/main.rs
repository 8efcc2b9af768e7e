//! scatterctl - scatter container and manifest tool
//!
//! Decodes encrypted scatter containers, applies manifest patch passes, and
//! prepares the files the external flashing tool is started with.

#![deny(unused_must_use)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use scatter_core::types::ScatterError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scatterctl")]
#[command(about = "Decode scatter containers and prepare flashing manifests")]
#[command(version)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PassName {
    Provisioning,
    DataPreserving,
}

#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Base directory holding image/ and tools/
    #[arg(long, env = "SCATTER_BASE_DIR", default_value = ".")]
    base: PathBuf,

    /// JSON file overriding individual layout directories
    #[arg(long, env = "SCATTER_LAYOUT")]
    layout: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt and verify a container, writing the plaintext manifest
    Decode {
        input: PathBuf,
        /// Output file (default: input with .xml extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encrypt a plaintext manifest into a container
    Seal {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Apply a patch pass to a plaintext manifest
    Patch {
        input: PathBuf,
        #[arg(long, value_enum)]
        pass: PassName,
        /// Output file (default: rewrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Produce the final manifest for a platform
    Variants {
        #[command(flatten)]
        layout: LayoutArgs,
        #[arg(long)]
        platform: String,
        /// Keep user data (data-preserving variant)
        #[arg(long)]
        keep_data: bool,
    },

    /// Run the whole preparation: sweep, variants, bundle check, tool history
    Prepare {
        #[command(flatten)]
        layout: LayoutArgs,
        /// Platform id; when absent, --prop values stand in for the device
        #[arg(long)]
        platform: Option<String>,
        /// Device property as NAME=VALUE (repeatable)
        #[arg(long = "prop", value_name = "NAME=VALUE")]
        props: Vec<String>,
        #[arg(long)]
        keep_data: bool,
    },

    /// Remove stale manifests, proinfo dumps and tool history
    Sweep {
        #[command(flatten)]
        layout: LayoutArgs,
        /// Also remove this platform's final manifest
        #[arg(long)]
        platform: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scatter_core={0},scatterctl={0}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let code = match execute(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            match e.downcast_ref::<ScatterError>() {
                Some(ScatterError::Format(_)) => 3,
                Some(ScatterError::Manifest(_)) => 4,
                Some(ScatterError::Config(_)) => 5,
                _ => 1,
            }
        }
    };
    std::process::exit(code);
}

fn execute(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::Decode { input, output } => commands::decode(input, output.as_deref(), cli.json),
        Commands::Seal { input, output } => commands::seal(input, output, cli.json),
        Commands::Patch { input, pass, output } => {
            commands::patch(input, *pass, output.as_deref(), cli.json)
        }
        Commands::Variants { layout, platform, keep_data } => {
            commands::variants(layout, platform, *keep_data, cli.json)
        }
        Commands::Prepare { layout, platform, props, keep_data } => {
            commands::prepare(layout, platform.as_deref(), props, *keep_data, cli.json)
        }
        Commands::Sweep { layout, platform } => commands::sweep(layout, platform.as_deref(), cli.json),
    }
}
