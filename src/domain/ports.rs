use crate::utils::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Line format of the persisted catalog files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// Unescaped comma-joined fields in `books.txt`, `borrowers.txt`, `loans.txt`.
    #[default]
    Legacy,
    /// Quoted CSV in `books.csv`, `borrowers.csv`, `loans.csv`.
    Csv,
}

impl RecordFormat {
    pub fn books_file(&self) -> &'static str {
        match self {
            Self::Legacy => "books.txt",
            Self::Csv => "books.csv",
        }
    }

    pub fn borrowers_file(&self) -> &'static str {
        match self {
            Self::Legacy => "borrowers.txt",
            Self::Csv => "borrowers.csv",
        }
    }

    pub fn loans_file(&self) -> &'static str {
        match self {
            Self::Legacy => "loans.txt",
            Self::Csv => "loans.csv",
        }
    }
}

impl FromStr for RecordFormat {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "txt" => Ok(Self::Legacy),
            "csv" => Ok(Self::Csv),
            other => Err(LibraryError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: legacy, csv".to_string(),
            }),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn record_format(&self) -> RecordFormat;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format_parsing() {
        assert_eq!("legacy".parse::<RecordFormat>().unwrap(), RecordFormat::Legacy);
        assert_eq!(" CSV ".parse::<RecordFormat>().unwrap(), RecordFormat::Csv);
        assert!("json".parse::<RecordFormat>().is_err());
    }

    #[test]
    fn test_formats_use_separate_files() {
        assert_eq!(RecordFormat::Legacy.books_file(), "books.txt");
        assert_eq!(RecordFormat::Csv.loans_file(), "loans.csv");
        assert_ne!(
            RecordFormat::Legacy.borrowers_file(),
            RecordFormat::Csv.borrowers_file()
        );
    }
}
