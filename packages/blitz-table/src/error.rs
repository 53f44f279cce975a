//! Error handling for the table engine
//!
//! Layout itself never fails: malformed markup is clamped and numeric degeneracy is
//! guarded where it occurs. The errors here cover the few places where a caller can
//! hand the engine something it cannot absorb.

use thiserror::Error;

/// Errors from strict parsing of a length attribute
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LengthParseError {
    #[error("Length attribute is empty")]
    Empty,

    #[error("Invalid number in length attribute {input:?}")]
    InvalidNumber { input: String },

    #[error("Negative length {value} is not allowed")]
    Negative { value: i32 },
}

impl LengthParseError {
    pub fn invalid_number(input: impl Into<String>) -> Self {
        Self::InvalidNumber {
            input: input.into(),
        }
    }
}

/// Errors returned by the table API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("No cell with id {id} in this table")]
    CellNotFound { id: usize },

    #[error("Invalid length: {0}")]
    Length(#[from] LengthParseError),
}

impl TableError {
    pub fn cell_not_found(id: impl Into<usize>) -> Self {
        Self::CellNotFound { id: id.into() }
    }
}

pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error_cases = vec![
            TableError::cell_not_found(7usize),
            TableError::from(LengthParseError::Empty),
            TableError::from(LengthParseError::invalid_number("abc")),
            TableError::from(LengthParseError::Negative { value: -3 }),
        ];

        for error in error_cases {
            let display_str = format!("{}", error);
            let debug_str = format!("{:?}", error);

            assert!(!display_str.is_empty());
            assert!(!debug_str.is_empty());
        }
    }

    #[test]
    fn test_cell_not_found_message() {
        let error = TableError::cell_not_found(3usize);
        assert_eq!(error.to_string(), "No cell with id 3 in this table");
    }
}
