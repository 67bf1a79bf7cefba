//! Dataset column descriptions

use serde::Deserialize;
use serde::Serialize;

use super::metadata::AttributeMetadata;

/// Width hint the host reports when a column has no preferred size.
pub const UNSET_SIZE_FACTOR: i32 = -1;

/// One dataset column as supplied by the host on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique column name (attribute logical name, alias-qualified for linked entities).
    pub name: String,

    /// Label shown in the header.
    pub display_name: String,

    /// Raw host data type, e.g. `SingleLine.Text` or `OptionSet`.
    pub data_type: String,

    /// Property-set alias the column is bound to, if any.
    #[serde(default)]
    pub alias: Option<String>,

    /// Display rank; negative means hidden.
    #[serde(default)]
    pub order: i32,

    /// Preferred width in pixels, or [`UNSET_SIZE_FACTOR`].
    #[serde(default = "default_size_factor")]
    pub visual_size_factor: i32,

    #[serde(default)]
    pub is_hidden: bool,
}

fn default_size_factor() -> i32 {
    UNSET_SIZE_FACTOR
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            data_type: data_type.into(),
            alias: None,
            order: 0,
            visual_size_factor: UNSET_SIZE_FACTOR,
            is_hidden: false,
        }
    }

    /// Column for an attribute, as a dataset host would describe it.
    pub fn from_attribute(attribute: &AttributeMetadata, order: i32) -> Self {
        let display_name = attribute
            .display_name
            .clone()
            .unwrap_or_else(|| attribute.logical_name.clone());
        Self::new(
            attribute.logical_name.clone(),
            display_name,
            attribute.attribute_type.host_data_type(),
        )
        .with_order(order)
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_size(mut self, visual_size_factor: i32) -> Self {
        self.visual_size_factor = visual_size_factor;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Returns `true` when the column takes part in layout.
    pub fn is_visible(&self) -> bool {
        !self.is_hidden && self.order >= 0
    }

    pub fn kind(&self) -> ColumnKind {
        ColumnKind::classify(&self.data_type)
    }

    /// Display name with its first character upper-cased.
    pub fn capitalized_name(&self) -> String {
        capitalize(&self.display_name)
    }
}

/// Upper-cases the first character of `text`.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Classification of a host data type string.
///
/// Every consumer (filters, menus, grouping) goes through
/// [`ColumnKind::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Lookup,
    OptionSet,
    TwoOptions,
    Other,
}

const TEXT_TYPES: &[&str] = &[
    "SingleLine.Text",
    "SingleLine.Email",
    "SingleLine.Phone",
    "SingleLine.Url",
    "MultipleLines.Text",
    "MultipleLines.Email",
    "MultipleLines.Phone",
    "MultipleLines.Url",
    "MultipleLines.TextArea",
];

const NUMBER_TYPES: &[&str] = &[
    "Whole.None",
    "Decimal.None",
    "Double.None",
    "Integer.None",
    "Money.None",
];

const DATE_TYPES: &[&str] = &["DateAndTime.DateOnly", "DateAndTime.DateAndTime"];

const LOOKUP_TYPES: &[&str] = &["Lookup.Simple", "Lookup.Owner"];

impl ColumnKind {
    pub fn classify(data_type: &str) -> Self {
        if TEXT_TYPES.contains(&data_type) {
            ColumnKind::Text
        } else if NUMBER_TYPES.contains(&data_type) {
            ColumnKind::Number
        } else if DATE_TYPES.contains(&data_type) {
            ColumnKind::Date
        } else if LOOKUP_TYPES.contains(&data_type) {
            ColumnKind::Lookup
        } else if data_type == "OptionSet" {
            ColumnKind::OptionSet
        } else if data_type == "TwoOptions" {
            ColumnKind::TwoOptions
        } else {
            ColumnKind::Other
        }
    }

    /// Returns `true` for choice-like kinds whose values come from an option list.
    pub fn is_choice(self) -> bool {
        matches!(self, ColumnKind::OptionSet | ColumnKind::TwoOptions)
    }
}
