//! Shared fixtures for driver tests

use apolloos::ApolloOs;
use apolloos_apdu_core::{CardExecutor, MockLog, MockTransport};
use hex_literal::hex;

pub type TestCard = ApolloOs<CardExecutor<MockTransport>>;

pub const ATR: [u8; 18] = hex!("3BB918008131FE9E8073FF614083000000DF");

pub const SERIAL: [u8; 16] = hex!("0102030405060708090A0B0C0D0E0F10");

/// GET DATA response carrying [`SERIAL`]
pub fn serial_response() -> Vec<u8> {
    [&SERIAL[..], &hex!("9000")[..]].concat()
}

/// Header read answer announcing a file of `size` bytes
pub fn probe_response(size: u16) -> Vec<u8> {
    let [lo, hi] = size.to_le_bytes();
    vec![0x00, 0x00, 0x00, 0x00, lo, hi, 0x90, 0x00]
}

/// `len` bytes of content followed by 90 00
pub fn content_response(len: usize) -> Vec<u8> {
    let mut response: Vec<u8> = (0..len).map(|i| i as u8).collect();
    response.extend_from_slice(&hex!("9000"));
    response
}

/// A card bound through the serial number fetch, with an empty command log
pub fn bound_card() -> (TestCard, MockLog) {
    let transport = MockTransport::with_responses([serial_response()]);
    let log = transport.log();
    let card = ApolloOs::bind(CardExecutor::new(transport), &ATR).unwrap();
    log.clear_commands();
    (card, log)
}

/// Commands sent so far, as plain byte vectors
pub fn commands(log: &MockLog) -> Vec<Vec<u8>> {
    log.commands().iter().map(|c| c.to_vec()).collect()
}
