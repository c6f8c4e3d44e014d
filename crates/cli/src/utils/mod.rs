//! Utility functions for the CLI

pub mod reader;
pub mod session;

/// Format bytes as a hex dump, 16 bytes per line, prefixed by their offset
pub fn hex_dump(data: &[u8], start: usize) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| format!("{:06X}  {}", start + i * 16, hex::encode_upper(chunk)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump() {
        let data: Vec<u8> = (0..20).collect();
        assert_eq!(
            hex_dump(&data, 0x10),
            "000010  000102030405060708090A0B0C0D0E0F\n000020  10111213"
        );
        assert_eq!(hex_dump(&[], 0), "");
    }
}
