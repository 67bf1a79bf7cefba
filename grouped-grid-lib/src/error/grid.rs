//! Grid state errors

/// Errors raised by grid state transitions and configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The column is not part of the dataset.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The column is already used by the other grouping slot.
    #[error("Column '{0}' is already used for grouping")]
    GroupingConflict(String),

    /// The primary grouping cannot be cleared while a secondary grouping exists.
    #[error("Clear the secondary grouping before clearing '{0}'")]
    SecondaryGroupingActive(String),

    /// The record is not part of the current dataset.
    #[error("Unknown record '{0}'")]
    UnknownRecord(String),

    /// Grouping changes are disabled by configuration.
    #[error("Grouping changes are not allowed")]
    GroupingLocked,

    /// Both grouping slots are taken.
    #[error("Both grouping levels are already in use")]
    GroupingFull,

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
