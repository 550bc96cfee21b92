//! Engine-wide error and result types.

use thiserror::Error;

/// Errors that can occur while loading or reconciling relation data.
#[derive(Error, Debug)]
pub enum GimmisnError {
    /// I/O error reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV/TSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML configuration parsing error.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reference cache (JSON) error.
    #[error("Cache error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// Invalid integer value.
    #[error("Invalid integer value: {value}")]
    InvalidInteger {
        /// The invalid value.
        value: String,
    },

    /// A setting required by the operation is not configured.
    #[error("Missing setting: {0}")]
    MissingSetting(String),
}

/// Result type for engine operations.
pub type GimmisnResult<T> = Result<T, GimmisnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GimmisnError::UnexpectedColumn {
            position: 1,
            expected: "name".to_string(),
            found: "nev".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected column 'nev' at position 1, expected 'name'"
        );

        let err = GimmisnError::InvalidHeader {
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "Invalid header: expected 3 columns, found 2");
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> GimmisnResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/gimmisn/file")?)
        }
        assert!(matches!(open(), Err(GimmisnError::Io(_))));
    }
}
