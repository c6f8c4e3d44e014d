use apolloos_apdu_pcsc::{PcscConfig, PcscDeviceManager, PcscReader, PcscTransport, ShareMode};
use colored::Colorize;
use tracing::debug;

/// Find a reader with a specific name
pub fn find_reader_by_name(
    manager: &PcscDeviceManager,
    reader_name: &str,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    readers
        .iter()
        .find(|r| r.name() == reader_name)
        .cloned()
        .ok_or_else(|| format!("Reader '{}' not found", reader_name).into())
}

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    if readers.is_empty() {
        println!("No readers found!");
        return Ok(());
    }

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        let status = match reader.atr() {
            Some(atr) => format!("card present, ATR {}", hex::encode_upper(atr)).green(),
            None => "no card".yellow(),
        };
        println!("{}. {} ({})", i + 1, reader.name(), status);
    }

    Ok(())
}

/// Find a reader with a card inserted
pub fn find_reader_with_card(
    manager: &PcscDeviceManager,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    if readers.is_empty() {
        return Err("No readers found!".into());
    }

    let reader = readers
        .iter()
        .find(|r| r.has_card())
        .ok_or("No card found in any reader!")?;

    Ok(reader.clone())
}

/// Find a reader holding a card with the given ATR, falling back to any card
pub fn find_reader_for_atr(
    manager: &PcscDeviceManager,
    atr: &str,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let pattern = hex::decode(atr.replace(':', ""))?;
    match manager.find_reader_with_atr(&pattern, None) {
        Ok(reader) => Ok(reader),
        Err(e) => {
            debug!(error = %e, "No reader with a matching card");
            find_reader_with_card(manager)
        }
    }
}

/// Connect to the card in the reader
pub fn open_transport(
    manager: &PcscDeviceManager,
    reader: &PcscReader,
    exclusive: bool,
) -> Result<PcscTransport, Box<dyn std::error::Error>> {
    let share_mode = if exclusive {
        ShareMode::Exclusive
    } else {
        ShareMode::Shared
    };
    let config = PcscConfig::new().with_share_mode(share_mode);
    Ok(manager.open_reader_with_config(reader.name(), config)?)
}
