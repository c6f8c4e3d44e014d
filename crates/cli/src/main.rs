use std::path::PathBuf;

use apolloos::constants::SERBIAN_EID_ATR;
use apolloos_apdu_pcsc::PcscDeviceManager;
use apolloos_iso7816::Path;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;

use commands::*;
use utils::reader;

#[derive(Parser)]
#[command(version, about = "Read AppoloOS cards such as the Serbian eID")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(short, long, global = true)]
    reader: Option<String>,

    /// Connect in exclusive mode
    #[arg(long, global = true)]
    exclusive: bool,

    /// Debug level output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available readers
    List,

    /// Show the card ATR, driver match and serial number
    Info,

    /// Print the card serial number
    Serial,

    /// Select a file and show its attributes
    Select {
        /// File path, e.g. 3F00/0F02, 0F02 or df:F3810000024C4B01
        path: Path,
    },

    /// Select a file and read its content
    Read {
        /// File path, e.g. 3F00/0F02
        path: Path,

        /// Offset into the file content
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of bytes to read (defaults to the rest of the file)
        #[arg(long)]
        length: Option<usize>,

        /// Write raw content to this file instead of a hex dump
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let manager = PcscDeviceManager::new()?;

    if let Commands::List = cli.command {
        return reader::list_readers(&manager);
    }

    let reader = match &cli.reader {
        Some(reader_name) => reader::find_reader_by_name(&manager, reader_name)?,
        None => reader::find_reader_for_atr(&manager, SERBIAN_EID_ATR)?,
    };
    info!("Using reader: {}", reader.name());

    let transport = reader::open_transport(&manager, &reader, cli.exclusive)?;

    match cli.command {
        Commands::List => unreachable!(), // Already handled above
        Commands::Info => info_command(transport)?,
        Commands::Serial => serial_command(transport)?,
        Commands::Select { path } => select_command(transport, &path)?,
        Commands::Read {
            path,
            offset,
            length,
            output,
        } => read_command(transport, &path, offset, length, output.as_ref())?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}
