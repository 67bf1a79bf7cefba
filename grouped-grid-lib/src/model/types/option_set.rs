//! Option set value type

use serde::Deserialize;
use serde::Serialize;

/// A single choice (option set) value.
///
/// The numeric value is what the host stores; the label is the display text
/// and is usually filled from the record's formatted values.
///
/// # Example
///
/// ```
/// use grouped_grid_lib::model::types::OptionSetValue;
///
/// let status = OptionSetValue::with_label(1, "Open");
/// assert_eq!(status.display(), "Open");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionSetValue {
    /// The numeric value of the option.
    pub value: i32,
    /// The display label, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl OptionSetValue {
    pub fn new(value: i32) -> Self {
        Self { value, label: None }
    }

    pub fn with_label(value: i32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: Some(label.into()),
        }
    }

    /// Returns the label, or the numeric value rendered as text.
    pub fn display(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.value.to_string(),
        }
    }
}

impl From<i32> for OptionSetValue {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}
