//! Utility functions for PC/SC operations

/// Match an ATR against a pattern with an optional mask
///
/// The pattern is compared against the start of the ATR. If a mask is
/// provided, only the bits set in the mask are compared.
pub fn match_atr(atr: &[u8], pattern: &[u8], mask: Option<&[u8]>) -> bool {
    if pattern.len() > atr.len() {
        return false;
    }

    match mask {
        Some(mask) if mask.len() < pattern.len() => false,
        Some(mask) => pattern
            .iter()
            .zip(atr)
            .zip(mask)
            .all(|((p, a), m)| p & m == a & m),
        None => atr.starts_with(pattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_match_atr() {
        let atr = hex!("3BB918008131FE9E8073FF614083000000DF");

        assert!(match_atr(&atr, &hex!("3BB91800"), None));
        assert!(!match_atr(&atr, &hex!("3BB91801"), None));
        assert!(match_atr(&atr, &hex!("3BB91801"), Some(&hex!("FFFFFF00"))));
        // mask shorter than pattern
        assert!(!match_atr(&atr, &hex!("3BB91800"), Some(&hex!("FF"))));
        assert!(!match_atr(&atr[..2], &hex!("3BB91800"), None));
    }
}
