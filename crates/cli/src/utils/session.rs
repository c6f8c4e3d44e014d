use apolloos::ApolloOs;
use apolloos_apdu_core::CardExecutor;
use apolloos_apdu_pcsc::PcscTransport;
use tracing::debug;

/// Driver bound to a card behind PC/SC
pub type Card = ApolloOs<CardExecutor<PcscTransport>>;

/// Bind the driver to the card, failing if the card is not an AppoloOS card
pub fn bind_card(transport: PcscTransport) -> Result<Card, Box<dyn std::error::Error>> {
    let atr = transport.atr()?;
    debug!(atr = %hex::encode_upper(&atr), "Binding card");

    Ok(ApolloOs::bind(CardExecutor::new(transport), &atr)?)
}
