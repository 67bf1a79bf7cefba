//! Attribute metadata types

use serde::Deserialize;
use serde::Serialize;

/// Metadata the grid needs about one attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeMetadata {
    /// The logical name of the attribute (e.g., "statuscode").
    pub logical_name: String,

    #[serde(default)]
    pub attribute_type: AttributeType,

    #[serde(default)]
    pub display_name: Option<String>,

    /// For lookup attributes, the target entity logical names.
    #[serde(default)]
    pub targets: Vec<String>,

    /// For choice attributes, the declared options in display order.
    #[serde(default)]
    pub option_set: Vec<OptionDescriptor>,
}

impl AttributeMetadata {
    pub fn new(logical_name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            logical_name: logical_name.into(),
            attribute_type,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: Vec<OptionDescriptor>) -> Self {
        self.option_set = options;
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    /// Returns true if this is a lookup attribute.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self.attribute_type,
            AttributeType::Lookup | AttributeType::Customer | AttributeType::Owner
        )
    }

    /// Returns true if this attribute carries an option list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self.attribute_type,
            AttributeType::Picklist
                | AttributeType::State
                | AttributeType::Status
                | AttributeType::Boolean
        )
    }
}

/// Attribute types the grid distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    Boolean,
    Customer,
    DateTime,
    Decimal,
    Double,
    Integer,
    BigInt,
    Lookup,
    Memo,
    Money,
    Owner,
    Picklist,
    State,
    Status,
    String,
    Uniqueidentifier,
    #[default]
    #[serde(other)]
    Other,
}

impl AttributeType {
    /// The data type string a dataset host reports for columns of this type.
    pub fn host_data_type(self) -> &'static str {
        match self {
            AttributeType::Boolean => "TwoOptions",
            AttributeType::Picklist | AttributeType::State | AttributeType::Status => "OptionSet",
            AttributeType::DateTime => "DateAndTime.DateAndTime",
            AttributeType::Decimal => "Decimal.None",
            AttributeType::Double => "Double.None",
            AttributeType::Integer | AttributeType::BigInt => "Whole.None",
            AttributeType::Money => "Money.None",
            AttributeType::Lookup | AttributeType::Customer => "Lookup.Simple",
            AttributeType::Owner => "Lookup.Owner",
            AttributeType::String => "SingleLine.Text",
            AttributeType::Memo => "MultipleLines.Text",
            AttributeType::Uniqueidentifier | AttributeType::Other => "",
        }
    }
}

/// One declared option of a choice attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionDescriptor {
    pub value: i32,
    pub label: String,
    /// Hex color configured for the option, if any.
    #[serde(default)]
    pub color: Option<String>,
}

impl OptionDescriptor {
    pub fn new(value: i32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
