use std::fmt;
use std::str::FromStr;

use crate::error::MetadataError;

pub const TAXON_ID_HUMAN: &str = "9606";
pub const SCIENTIFIC_NAME_HUMAN: &str = "Homo sapiens";
pub const DEFAULT_EXP_SUFFIX: &str = "__RNAseq_PE";
pub const DEFAULT_LIB_NAME_SUFFIX: &str = "_lib";
pub const RUN_SUFFIX: &str = "__run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Single,
    Paired,
}

impl Layout {
    /// Human-readable form used in titles and design descriptions.
    pub fn read_description(&self) -> &'static str {
        match self {
            Layout::Single => "single-end",
            Layout::Paired => "paired-end",
        }
    }
}

impl FromStr for Layout {
    type Err = MetadataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "SINGLE" => Ok(Layout::Single),
            "PAIRED" => Ok(Layout::Paired),
            _ => Err(MetadataError::InvalidLayout(value.to_string())),
        }
    }
}

/// Cross-document identifier shared by samples, experiments and runs.
/// Only an empty alias is rejected; surrounding whitespace is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.0)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Alias {
    type Err = MetadataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(MetadataError::EmptyField {
                field: "alias".to_string(),
                row: 0,
            });
        }
        Ok(Self(value.to_string()))
    }
}

/// MD5 digest as written to the run document, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Md5Checksum(String);

impl Md5Checksum {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Md5Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Md5Checksum {
    type Err = MetadataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(MetadataError::EmptyField {
                field: "md5".to_string(),
                row: 0,
            });
        }
        Ok(Self(normalized))
    }
}
