//! Record field errors

/// Error returned by the typed accessors on [`Record`](crate::model::Record).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The record carries no value for the column.
    #[error("Column '{column}' not present on record")]
    Missing { column: String },

    /// The column holds a value of another type.
    #[error("Column '{column}' holds {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(column: impl Into<String>) -> Self {
        Self::Missing {
            column: column.into(),
        }
    }

    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }
}
