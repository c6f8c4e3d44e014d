//! Commands for card level information

use std::error::Error;

use apolloos::constants::ATRS;
use apolloos_apdu_pcsc::PcscTransport;
use apolloos_iso7816::{CardCtl, CardCtlResponse, CardDriver, match_atr_table};
use colored::Colorize;

use crate::utils::session::{self, Card};

/// Show the ATR, the driver match and the serial number
pub fn info_command(transport: PcscTransport) -> Result<(), Box<dyn Error>> {
    let atr = transport.atr()?;
    println!("ATR: {}", hex::encode_upper(&atr));

    let Some(entry) = match_atr_table(ATRS, &atr) else {
        println!("{}", "Card is not handled by the AppoloOS driver".yellow());
        return Ok(());
    };
    println!("Card: {}", entry.name.green());
    println!("Driver: {} ({})", Card::NAME, Card::SHORT_NAME);

    let mut card = session::bind_card(transport)?;
    println!("Serial number: {}", card.serial_number()?);
    card.finish()?;

    Ok(())
}

/// Print the serial number
pub fn serial_command(transport: PcscTransport) -> Result<(), Box<dyn Error>> {
    let mut card = session::bind_card(transport)?;

    match card.card_ctl(CardCtl::GetSerialNumber)? {
        CardCtlResponse::SerialNumber(serial) => println!("{}", hex::encode_upper(serial)),
        other => return Err(format!("Unexpected card control response: {other:?}").into()),
    }
    card.finish()?;

    Ok(())
}
