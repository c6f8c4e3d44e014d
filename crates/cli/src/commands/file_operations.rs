//! Commands for file selection and reading

use std::error::Error;
use std::path::PathBuf;

use apolloos_apdu_pcsc::PcscTransport;
use apolloos_iso7816::{CardDriver, FileOps, Path};
use tracing::{debug, info};

use crate::utils::{hex_dump, session};

/// Select a file and print its attributes
pub fn select_command(transport: PcscTransport, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut card = session::bind_card(transport)?;

    match card.select_file(path, true)? {
        Some(file) => println!("{file}"),
        None => println!("{path}: selected"),
    }
    card.finish()?;

    Ok(())
}

/// Select a file and dump or save its content
pub fn read_command(
    transport: PcscTransport,
    path: &Path,
    offset: usize,
    length: Option<usize>,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut card = session::bind_card(transport)?;

    card.select_file(path, false)?;
    let file_size = card.file_size();
    let length = length.unwrap_or_else(|| file_size.saturating_sub(offset));
    debug!(file_size, offset, length, "Reading file");

    let data = card.read_binary_all(offset, length)?;
    card.finish()?;

    match output {
        Some(output) => {
            std::fs::write(output, &data)?;
            info!("Wrote {} bytes to {}", data.len(), output.display());
        }
        None => println!("{}", hex_dump(&data, offset)),
    }

    Ok(())
}
