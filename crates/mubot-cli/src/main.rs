use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "mubot")]
#[command(about = "Game client telemetry and input automation")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = mubot::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Attach to the game and run enabled behaviors (default)
    Run {
        /// Log key presses instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Attach once and print the decoded game state
    Status {
        /// Process ID (auto-detect if not specified)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Dump raw memory at an address
    Hexdump {
        /// Address to dump (hex, with or without 0x prefix)
        address: String,

        /// Number of bytes to read
        #[arg(short, long, default_value = "256")]
        size: usize,

        /// Show ASCII column
        #[arg(short, long)]
        ascii: bool,

        /// Process ID (auto-detect if not specified)
        #[arg(long)]
        pid: Option<u32>,
    },
    /// Check a license file, or issue one with --holder and --expires
    License {
        /// License file (searches the default locations if omitted)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Holder name for a new license file
        #[arg(long, requires = "expires")]
        holder: Option<String>,

        /// Expiry date (YYYY-MM-DD) for a new license file
        #[arg(long, requires = "holder")]
        expires: Option<String>,
    },
    /// Write a sample configuration and an offset table template
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mubot=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => commands::run::run(&cli.config, dry_run),
        Command::Status { pid } => commands::status::run(&cli.config, pid),
        Command::Hexdump {
            address,
            size,
            ascii,
            pid,
        } => {
            let address = commands::hex_utils::parse_hex_address(&address)?;
            commands::hexdump::run(&cli.config, address, size, ascii, pid)
        }
        Command::License {
            path,
            holder,
            expires,
        } => match (holder, expires) {
            (Some(holder), Some(expires)) => {
                commands::license::issue(path.as_deref(), &holder, &expires)
            }
            _ => commands::license::check(&cli.config, path.as_deref()),
        },
        Command::Init { force } => commands::init::run(&cli.config, force),
    }
}
