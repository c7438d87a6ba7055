//! Error types for row normalization.

use thiserror::Error;

/// A raw cell could not be converted into its typed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    /// Sex code other than `M`/`F`.
    #[error("unrecognized sex code '{value}' (expected M or F)")]
    InvalidSex { value: String },

    /// Value is not an unambiguous calendar date.
    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },
}

/// Errors that abort a normalization run.
///
/// `row` is the 1-based position of the offending row in the input batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A required column is absent from the row.
    #[error("row {row}: required column '{column}' is missing")]
    MissingColumn { row: usize, column: &'static str },

    /// A grouping key column is present but blank.
    #[error("row {row}: key column '{column}' is blank")]
    EmptyKey { row: usize, column: &'static str },

    /// A cell could not be derived into its typed field.
    #[error("row {row}: column '{column}': {source}")]
    Derive {
        row: usize,
        column: &'static str,
        #[source]
        source: DeriveError,
    },
}

impl NormalizeError {
    /// Row number the error refers to.
    pub fn row(&self) -> usize {
        match self {
            Self::MissingColumn { row, .. }
            | Self::EmptyKey { row, .. }
            | Self::Derive { row, .. } => *row,
        }
    }
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NormalizeError::Derive {
            row: 3,
            column: "gender",
            source: DeriveError::InvalidSex {
                value: "X".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "row 3: column 'gender': unrecognized sex code 'X' (expected M or F)"
        );
        assert_eq!(err.row(), 3);
    }

    #[test]
    fn test_missing_column_display() {
        let err = NormalizeError::MissingColumn {
            row: 1,
            column: "nid",
        };
        assert_eq!(err.to_string(), "row 1: required column 'nid' is missing");
    }
}
