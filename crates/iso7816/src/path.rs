//! File addressing for SELECT
//!
//! Textual form accepted by [`Path::from_str`]:
//!
//! - `3F00/5000/5001` or `3F0050005001`: absolute path from the MF
//! - `5001`: a single file identifier
//! - `5000/5001`: a path from the current DF
//! - `df:A0000000...`: a DF name (application identifier)
//! - `..`: the parent of the current DF

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// File identifier of the master file
pub const MF_ID: u16 = 0x3F00;

/// Longest DF name SELECT accepts
pub const MAX_DF_NAME_LEN: usize = 16;

/// Longest path value, MF included
pub const MAX_PATH_LEN: usize = 16;

/// How the value of a [`Path`] addresses a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// A two-byte file identifier
    FileId,
    /// A DF name
    DfName,
    /// A sequence of file identifiers starting at the MF
    Path,
    /// A sequence of file identifiers starting at the current DF
    FromCurrent,
    /// The parent of the current DF
    Parent,
}

/// Address of a file on the card
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    kind: PathKind,
    value: Vec<u8>,
}

impl Path {
    /// Create a path from its kind and raw value
    pub fn new(kind: PathKind, value: impl Into<Vec<u8>>) -> Result<Self> {
        let value = value.into();
        match kind {
            PathKind::FileId if value.len() != 2 => {
                Err(Error::InvalidArguments("file identifier must be two bytes"))
            }
            PathKind::Path | PathKind::FromCurrent if value.is_empty() || value.len() % 2 != 0 => {
                Err(Error::InvalidArguments("path must be a sequence of file identifiers"))
            }
            PathKind::Path | PathKind::FromCurrent if value.len() > MAX_PATH_LEN => {
                Err(Error::InvalidArguments("path must be at most 8 file identifiers"))
            }
            PathKind::DfName if value.is_empty() || value.len() > MAX_DF_NAME_LEN => {
                Err(Error::InvalidArguments("DF name must be 1 to 16 bytes"))
            }
            PathKind::Parent if !value.is_empty() => {
                Err(Error::InvalidArguments("parent path carries no value"))
            }
            _ => Ok(Self { kind, value }),
        }
    }

    /// The master file
    pub fn mf() -> Self {
        Self {
            kind: PathKind::Path,
            value: MF_ID.to_be_bytes().to_vec(),
        }
    }

    /// A single file identifier
    pub fn file_id(id: u16) -> Self {
        Self {
            kind: PathKind::FileId,
            value: id.to_be_bytes().to_vec(),
        }
    }

    /// An absolute path built from file identifiers below the MF
    pub fn absolute(ids: &[u16]) -> Result<Self> {
        let mut value = MF_ID.to_be_bytes().to_vec();
        value.extend(ids.iter().flat_map(|id| id.to_be_bytes()));
        Self::new(PathKind::Path, value)
    }

    /// A DF name
    pub fn df_name(name: &[u8]) -> Result<Self> {
        Self::new(PathKind::DfName, name)
    }

    /// The parent of the current DF
    pub const fn parent() -> Self {
        Self {
            kind: PathKind::Parent,
            value: Vec::new(),
        }
    }

    /// How the value addresses the file
    pub const fn kind(&self) -> PathKind {
        self.kind
    }

    /// Raw path value
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Whether this path names the MF alone
    pub fn is_mf(&self) -> bool {
        self.kind == PathKind::Path && self.value == MF_ID.to_be_bytes()
    }

    /// The file identifiers of a path, or the single identifier of a file id
    pub fn file_ids(&self) -> Vec<u16> {
        match self.kind {
            PathKind::FileId | PathKind::Path | PathKind::FromCurrent => self
                .value
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect(),
            PathKind::DfName | PathKind::Parent => Vec::new(),
        }
    }

    /// The last file identifier, which names the file itself
    pub fn last_file_id(&self) -> Option<u16> {
        self.file_ids().last().copied()
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == ".." {
            return Ok(Self::parent());
        }
        if let Some(name) = s.strip_prefix("df:") {
            let name = hex::decode(name).map_err(|_| Error::InvalidArguments("invalid hex in DF name"))?;
            return Self::df_name(&name);
        }

        let digits: String = s.chars().filter(|c| !matches!(c, '/' | ':')).collect();
        let value = hex::decode(&digits).map_err(|_| Error::InvalidArguments("invalid hex in path"))?;
        let kind = if value.starts_with(&MF_ID.to_be_bytes()) {
            PathKind::Path
        } else if value.len() == 2 {
            PathKind::FileId
        } else {
            PathKind::FromCurrent
        };
        Self::new(kind, value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PathKind::DfName => write!(f, "df:{}", hex::encode_upper(&self.value)),
            PathKind::Parent => f.write_str(".."),
            PathKind::FileId | PathKind::Path | PathKind::FromCurrent => {
                let ids: Vec<String> = self.file_ids().iter().map(|id| format!("{id:04X}")).collect();
                f.write_str(&ids.join("/"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let path: Path = "3F00/5000/5001".parse().unwrap();
        assert_eq!(path.kind(), PathKind::Path);
        assert_eq!(path.value(), &[0x3F, 0x00, 0x50, 0x00, 0x50, 0x01]);
        assert_eq!(path, Path::absolute(&[0x5000, 0x5001]).unwrap());
        assert_eq!(path.last_file_id(), Some(0x5001));
        assert_eq!(path.to_string(), "3F00/5000/5001");

        assert!("3F00".parse::<Path>().unwrap().is_mf());
        assert_eq!("3f0050005001".parse::<Path>().unwrap(), path);
    }

    #[test]
    fn test_parse_relative() {
        let path: Path = "5001".parse().unwrap();
        assert_eq!(path, Path::file_id(0x5001));

        let path: Path = "5000/5001".parse().unwrap();
        assert_eq!(path.kind(), PathKind::FromCurrent);
        assert_eq!(path.file_ids(), vec![0x5000, 0x5001]);

        assert_eq!("..".parse::<Path>().unwrap(), Path::parent());
    }

    #[test]
    fn test_parse_df_name() {
        let path: Path = "df:F3810000024C4B01".parse().unwrap();
        assert_eq!(path.kind(), PathKind::DfName);
        assert_eq!(path.value().len(), 8);
        assert_eq!(path.to_string(), "df:F3810000024C4B01");
        assert!(path.file_ids().is_empty());
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<Path>().is_err());
        assert!("50".parse::<Path>().is_err());
        assert!("50015".parse::<Path>().is_err());
        assert!("zz00".parse::<Path>().is_err());
        assert!("df:".parse::<Path>().is_err());
        assert!(Path::new(PathKind::FileId, vec![0x50]).is_err());
        assert!(Path::df_name(&[0u8; 17]).is_err());
    }

    #[test]
    fn test_path_length_limit() {
        let ids = [0x5000u16; 7];
        assert_eq!(Path::absolute(&ids).unwrap().value().len(), MAX_PATH_LEN);
        assert!(matches!(
            Path::absolute(&[0x5000; 8]),
            Err(Error::InvalidArguments(_))
        ));

        let long = format!("3F00{}", "/5000".repeat(129));
        assert!(matches!(long.parse::<Path>(), Err(Error::InvalidArguments(_))));
        assert!("5000/".repeat(9).trim_end_matches('/').parse::<Path>().is_err());
        assert!("5000/".repeat(8).trim_end_matches('/').parse::<Path>().is_ok());
    }
}
