//! ATR tables used to pick a driver for a card

use tracing::trace;

/// One known card signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtrEntry {
    /// ATR as colon separated hex bytes
    pub atr: &'static str,
    /// Optional mask, same format; only bits set in the mask are compared
    pub mask: Option<&'static str>,
    /// Human readable card name
    pub name: &'static str,
}

impl AtrEntry {
    /// Create an entry matching the ATR exactly
    pub const fn new(atr: &'static str, name: &'static str) -> Self {
        Self {
            atr,
            mask: None,
            name,
        }
    }

    /// Set a mask for this entry
    pub const fn with_mask(mut self, mask: &'static str) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Whether the given ATR matches this entry
    ///
    /// Malformed table strings never match.
    pub fn matches(&self, atr: &[u8]) -> bool {
        let Some(pattern) = parse_hex(self.atr) else {
            return false;
        };
        if pattern.len() != atr.len() {
            return false;
        }

        match self.mask.map(parse_hex) {
            None => pattern == atr,
            Some(Some(mask)) if mask.len() == pattern.len() => pattern
                .iter()
                .zip(atr)
                .zip(&mask)
                .all(|((p, a), m)| p & m == a & m),
            Some(_) => false,
        }
    }
}

/// A list of known card signatures
pub type AtrTable = [AtrEntry];

/// Find the first entry of the table matching the ATR
pub fn match_atr_table<'a>(table: &'a AtrTable, atr: &[u8]) -> Option<&'a AtrEntry> {
    let found = table.iter().find(|entry| entry.matches(atr));
    trace!(atr = %hex::encode(atr), found = found.map(|e| e.name), "ATR table lookup");
    found
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    hex::decode(s.replace(':', "")).ok()
}
