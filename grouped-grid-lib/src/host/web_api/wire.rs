//! Web API metadata payloads
//!
//! These mirror the JSON shapes returned by the `EntityDefinitions` endpoint
//! and are converted into the host-neutral types in [`crate::model::metadata`].

use serde::Deserialize;

use crate::model::metadata::AttributeType;
use crate::model::metadata::OptionDescriptor;

/// Minimal entity definition (`$select` of the four core properties).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct EntityCore {
    pub logical_name: String,
    #[serde(default)]
    pub entity_set_name: Option<String>,
    pub primary_id_attribute: String,
    #[serde(default)]
    pub primary_name_attribute: Option<String>,
}

/// Base attribute definition, before any type cast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct AttributeCore {
    pub logical_name: String,
    #[serde(default)]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub display_name: Label,
}

/// Response of the Picklist/State/Status/Boolean attribute casts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ChoiceAttribute {
    #[serde(default)]
    pub option_set: Option<OptionSet>,
    #[serde(default)]
    pub global_option_set: Option<OptionSet>,
}

impl ChoiceAttribute {
    /// Declared options in display order; a global option set wins over the local one.
    pub fn options(&self) -> Vec<OptionDescriptor> {
        self.global_option_set
            .as_ref()
            .or(self.option_set.as_ref())
            .map(OptionSet::options)
            .unwrap_or_default()
    }
}

/// Response of the Lookup attribute cast.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct LookupAttribute {
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct OptionSet {
    #[serde(default)]
    pub options: Vec<OptionMetadata>,
    /// Two-option (Boolean) sets carry their options here instead.
    #[serde(default)]
    pub true_option: Option<OptionMetadata>,
    #[serde(default)]
    pub false_option: Option<OptionMetadata>,
}

impl OptionSet {
    fn options(&self) -> Vec<OptionDescriptor> {
        if !self.options.is_empty() {
            return self.options.iter().map(OptionMetadata::descriptor).collect();
        }
        // Boolean sets list "No" before "Yes", matching their numeric values.
        self.false_option
            .iter()
            .chain(self.true_option.iter())
            .map(OptionMetadata::descriptor)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct OptionMetadata {
    pub value: i32,
    #[serde(default)]
    pub label: Label,
    #[serde(default)]
    pub color: Option<String>,
}

impl OptionMetadata {
    fn descriptor(&self) -> OptionDescriptor {
        OptionDescriptor {
            value: self.value,
            label: self.label.text_or("").to_string(),
            color: self.color.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// LCID of the organization base language labels fall back to (English).
const BASE_LANGUAGE_CODE: i32 = 1033;

/// A localized label with user-specific and all localized values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct Label {
    #[serde(default)]
    pub user_localized_label: Option<LocalizedLabel>,
    #[serde(default)]
    pub localized_labels: Vec<LocalizedLabel>,
}

impl Label {
    /// Returns the label text in the user's language, else the base language
    /// label, else the first available one.
    pub fn text(&self) -> Option<&str> {
        self.user_localized_label
            .as_ref()
            .or_else(|| {
                self.localized_labels
                    .iter()
                    .find(|l| l.language_code == BASE_LANGUAGE_CODE)
            })
            .or_else(|| self.localized_labels.first())
            .map(|l| l.label.as_str())
    }

    pub fn text_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.text().unwrap_or(default)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct LocalizedLabel {
    pub label: String,
    #[serde(default)]
    pub language_code: i32,
}

/// Collection envelope of `retrieveMultiple` responses.
#[derive(Debug, Deserialize)]
pub(super) struct Collection<T> {
    pub value: Vec<T>,
}
