//! File handle returned by SELECT

use std::fmt;

use crate::path::Path;

/// Kind of file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    /// Dedicated file (directory)
    Df,
    /// Working elementary file, readable content
    WorkingEf,
    /// Internal elementary file, used by the card itself
    InternalEf,
    /// Not determined
    #[default]
    Unknown,
}

/// Internal structure of an elementary file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EfStructure {
    /// Not determined, or not an EF
    #[default]
    Unknown,
    /// Flat byte content
    Transparent,
    /// Records of equal size
    LinearFixed,
    /// Records of varying size
    LinearVariable,
    /// Ring of fixed size records
    Cyclic,
}

/// Attributes of a selected file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    /// Path used to select the file
    pub path: Option<Path>,
    /// File identifier
    pub id: Option<u16>,
    /// DF name, empty when the card reported none
    pub name: Vec<u8>,
    /// Kind of file
    pub file_type: FileType,
    /// EF structure
    pub ef_structure: EfStructure,
    /// Content size in bytes, 0 when unknown
    pub size: usize,
}

impl File {
    /// Whether the file is a DF
    pub fn is_df(&self) -> bool {
        self.file_type == FileType::Df
    }

    /// Whether the card reported a DF name
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Record the path used for selection, taking the file identifier from
    /// it when the FCI carried none
    pub fn selected_by(mut self, path: &Path) -> Self {
        if self.id.is_none() {
            self.id = path.last_file_id();
        }
        self.path = Some(path.clone());
        self
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Df => "DF",
            Self::WorkingEf => "working EF",
            Self::InternalEf => "internal EF",
            Self::Unknown => "unknown",
        })
    }
}

impl fmt::Display for EfStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Transparent => "transparent",
            Self::LinearFixed => "linear fixed",
            Self::LinearVariable => "linear variable",
            Self::Cyclic => "cyclic",
        })
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{path}: ")?;
        }
        write!(f, "{}", self.file_type)?;
        if let Some(id) = self.id {
            write!(f, " {id:04X}")?;
        }
        if self.has_name() {
            write!(f, " name={}", hex::encode_upper(&self.name))?;
        }
        if !self.is_df() {
            write!(f, ", {}, {} bytes", self.ef_structure, self.size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let file = File {
            path: Some(Path::absolute(&[0x0F02]).unwrap()),
            id: Some(0x0F02),
            file_type: FileType::WorkingEf,
            ef_structure: EfStructure::Transparent,
            size: 1184,
            ..Default::default()
        };
        assert_eq!(
            file.to_string(),
            "3F00/0F02: working EF 0F02, transparent, 1184 bytes"
        );

        let df = File {
            name: vec![0xF3, 0x81],
            file_type: FileType::Df,
            ..Default::default()
        };
        assert!(df.has_name());
        assert_eq!(df.to_string(), "DF name=F381");
    }
}
