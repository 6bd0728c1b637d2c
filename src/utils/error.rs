use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid input: expected {expected}, got '{input}'")]
    InputFormat { expected: String, input: String },

    #[error("Input closed before the session ended")]
    InputClosed,

    #[error("Malformed record in {file} at line {line}: {message}")]
    RecordParse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl LibraryError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access the data files: {}", e),
            Self::CsvError(e) => format!("Could not read or write CSV data: {}", e),
            Self::InputFormat { expected, input } => {
                format!("'{}' is not a valid {}; the session has ended", input, expected)
            }
            Self::InputClosed => "Input ended before option 9 was chosen".to_string(),
            Self::RecordParse { file, line, .. } => {
                format!("The data file {} is damaged near line {}", file, line)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the data directory exists and is writable",
            Self::CsvError(_) | Self::RecordParse { .. } => {
                "Fix or remove the offending line in the data file"
            }
            Self::InputFormat { .. } => "Enter whole numbers for menu options and years",
            Self::InputClosed => "Finish the session with option 9 to save your changes",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file"
            }
        }
    }

    /// Fatal errors end the session without saving.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InputFormat { .. } | Self::InputClosed | Self::RecordParse { .. }
        )
    }
}

/// Precondition failures of the borrow and return transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("The book is not available for loan")]
    Unavailable { title: String },

    #[error("This borrower does not hold that book")]
    NotHeld { title: String, borrower: String },

    #[error("Book not found.")]
    UnknownBook,

    #[error("Borrower not found.")]
    UnknownBorrower,
}

pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_fatal() {
        let err = LibraryError::InputFormat {
            expected: "number".to_string(),
            input: "abc".to_string(),
        };
        assert!(err.is_fatal());
        assert!(LibraryError::InputClosed.is_fatal());
        assert!(LibraryError::RecordParse {
            file: "books.txt".to_string(),
            line: 2,
            message: "invalid year".to_string(),
        }
        .is_fatal());

        let io = LibraryError::from(std::io::Error::other("disk full"));
        assert!(!io.is_fatal());
        assert!(io.to_string().contains("disk full"));
    }

    #[test]
    fn test_friendly_message_mentions_input() {
        let err = LibraryError::InputFormat {
            expected: "year".to_string(),
            input: "nineteen".to_string(),
        };
        assert!(err.user_friendly_message().contains("nineteen"));
    }
}
