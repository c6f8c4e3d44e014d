//! File control information decoding
//!
//! Handles the FCP (`62`), FMD (`64`) and FCI (`6F`) templates of ISO 7816-4
//! with the file identifier, size, descriptor and DF name data objects.

use iso7816_tlv::ber::{Tag, Tlv, Value};
use tracing::{debug, trace};

use crate::file::{EfStructure, File, FileType};
use crate::{Error, Result};

/// Tags of the FCI templates and data objects
pub mod tags {
    /// File control parameters template
    pub const FCP: u8 = 0x62;
    /// File management data template
    pub const FMD: u8 = 0x64;
    /// File control information template
    pub const FCI: u8 = 0x6F;
    /// Number of data bytes in the file
    pub const FILE_SIZE: u8 = 0x80;
    /// Number of data bytes including structural information
    pub const TOTAL_SIZE: u8 = 0x81;
    /// File descriptor byte
    pub const DESCRIPTOR: u8 = 0x82;
    /// File identifier
    pub const FILE_ID: u8 = 0x83;
    /// DF name
    pub const DF_NAME: u8 = 0x84;
}

/// Parse an FCI template, failing on anything that is not one
pub fn parse_fci(buf: &[u8]) -> Result<File> {
    let mut file = File::default();
    if buf.is_empty() {
        return Ok(file);
    }

    let tlv = Tlv::from_bytes(buf)?;
    let templates = [
        Tag::try_from(tags::FCP)?,
        Tag::try_from(tags::FMD)?,
        Tag::try_from(tags::FCI)?,
    ];
    if !templates.contains(tlv.tag()) {
        return Err(Error::InvalidData("not an FCI template"));
    }
    let Value::Constructed(objects) = tlv.value() else {
        return Err(Error::InvalidData("FCI template is not constructed"));
    };

    let file_size = Tag::try_from(tags::FILE_SIZE)?;
    let total_size = Tag::try_from(tags::TOTAL_SIZE)?;
    let descriptor = Tag::try_from(tags::DESCRIPTOR)?;
    let file_id = Tag::try_from(tags::FILE_ID)?;
    let df_name = Tag::try_from(tags::DF_NAME)?;

    let mut have_file_size = false;
    for object in objects {
        let Value::Primitive(data) = object.value() else {
            trace!(tag = ?object.tag(), "Skipping constructed FCI object");
            continue;
        };
        let tag = object.tag();

        if tag == &file_id {
            if let [hi, lo] = data[..] {
                file.id = Some(u16::from_be_bytes([hi, lo]));
            }
        } else if tag == &file_size {
            file.size = parse_size(data)?;
            have_file_size = true;
        } else if tag == &total_size {
            if !have_file_size {
                file.size = parse_size(data)?;
            }
        } else if tag == &descriptor {
            if let Some(&byte) = data.first() {
                apply_descriptor(&mut file, byte);
            }
        } else if tag == &df_name {
            file.name = data.clone();
        }
    }

    Ok(file)
}

/// Decode an FCI template
///
/// Never fails: encodings that are not understood leave the corresponding
/// attributes at their defaults.
pub fn decode_fci(buf: &[u8]) -> File {
    parse_fci(buf).unwrap_or_else(|e| {
        debug!(error = %e, fci = %hex::encode(buf), "Undecodable FCI");
        File::default()
    })
}

fn parse_size(data: &[u8]) -> Result<usize> {
    if data.is_empty() || data.len() > 4 {
        return Err(Error::InvalidData("file size must be 1 to 4 bytes"));
    }
    Ok(data.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
}

fn apply_descriptor(file: &mut File, byte: u8) {
    file.file_type = match (byte >> 3) & 0x07 {
        0 => FileType::WorkingEf,
        1 => FileType::InternalEf,
        7 => FileType::Df,
        _ => FileType::Unknown,
    };
    if file.file_type != FileType::Df {
        file.ef_structure = match byte & 0x07 {
            1 => EfStructure::Transparent,
            2 | 3 => EfStructure::LinearFixed,
            4 | 5 => EfStructure::LinearVariable,
            6 | 7 => EfStructure::Cyclic,
            _ => EfStructure::Unknown,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_decode_working_ef() {
        let file = decode_fci(&hex!("620B 83020F02 800204A0 820101"));
        assert_eq!(file.id, Some(0x0F02));
        assert_eq!(file.size, 0x04A0);
        assert_eq!(file.file_type, FileType::WorkingEf);
        assert_eq!(file.ef_structure, EfStructure::Transparent);
        assert!(!file.has_name());
    }

    #[test]
    fn test_decode_df() {
        let file = decode_fci(&hex!("6F0D 8408F3810000024C4B01 820138"));
        assert_eq!(file.file_type, FileType::Df);
        assert_eq!(file.ef_structure, EfStructure::Unknown);
        assert_eq!(file.name, hex!("F3810000024C4B01"));
        assert_eq!(file.size, 0);
    }

    #[test]
    fn test_total_size_fallback() {
        let file = decode_fci(&hex!("6204 81020100"));
        assert_eq!(file.size, 0x0100);

        let file = decode_fci(&hex!("6208 81020100 80020010"));
        assert_eq!(file.size, 0x0010);
    }

    #[test]
    fn test_undecodable_yields_default() {
        assert_eq!(decode_fci(&[]), File::default());
        assert_eq!(decode_fci(&hex!("010203")), File::default());
        // primitive data object outside of a template
        assert_eq!(decode_fci(&hex!("800105")), File::default());

        assert!(matches!(
            parse_fci(&hex!("800105")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_fci(&hex!("6207 80050102030405")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(parse_fci(&hex!("010203")), Err(Error::Tlv(_))));
    }
}
