//! Column filter editor state

use crate::error::Error;
use crate::host::MetadataHost;
use crate::intent::GridIntent;
use crate::model::Column;
use crate::model::ColumnKind;
use crate::model::ConditionOperator;
use crate::model::FilterValue;
use crate::model::metadata::OptionDescriptor;
use crate::service::GridService;

/// An operator offered in the filter editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionOption {
    pub operator: ConditionOperator,
    pub text: &'static str,
}

const fn option(operator: ConditionOperator, text: &'static str) -> ConditionOption {
    ConditionOption { operator, text }
}

const DATE_CONDITIONS: &[ConditionOption] = &[
    option(ConditionOperator::On, "On"),
    option(ConditionOperator::OnOrAfter, "On or after"),
    option(ConditionOperator::OnOrBefore, "On or before"),
    option(ConditionOperator::Today, "Today"),
    option(ConditionOperator::Yesterday, "Yesterday"),
    option(ConditionOperator::Tomorrow, "Tomorrow"),
    option(ConditionOperator::ThisWeek, "This week"),
    option(ConditionOperator::ThisMonth, "This month"),
    option(ConditionOperator::ThisYear, "This year"),
];

const NUMBER_CONDITIONS: &[ConditionOption] = &[
    option(ConditionOperator::Equal, "Equals"),
    option(ConditionOperator::NotEqual, "Does not equal"),
    option(ConditionOperator::NotNull, "Contains data"),
    option(ConditionOperator::Null, "Does not contain data"),
    option(ConditionOperator::GreaterThan, "Greater than"),
    option(ConditionOperator::GreaterEqual, "Greater than or equal to"),
    option(ConditionOperator::LessThan, "Less than"),
    option(ConditionOperator::LessEqual, "Less than or equal to"),
];

const CHOICE_CONDITIONS: &[ConditionOption] = &[
    option(ConditionOperator::In, "Equals"),
    option(ConditionOperator::NotIn, "Does not equal"),
    option(ConditionOperator::NotNull, "Contains data"),
    option(ConditionOperator::Null, "Does not contain data"),
];

const LOOKUP_CONDITIONS: &[ConditionOption] = &[
    option(ConditionOperator::Equal, "Equals"),
    option(ConditionOperator::NotEqual, "Does not equal"),
    option(ConditionOperator::NotNull, "Contains data"),
    option(ConditionOperator::Null, "Does not contain data"),
];

const TEXT_CONDITIONS: &[ConditionOption] = &[
    option(ConditionOperator::Equal, "Equals"),
    option(ConditionOperator::NotEqual, "Does not equal"),
    option(ConditionOperator::Like, "Contains"),
    option(ConditionOperator::NotLike, "Does not contain"),
    option(ConditionOperator::BeginsWith, "Begins with"),
    option(ConditionOperator::DoesNotBeginWith, "Does not begin with"),
    option(ConditionOperator::EndsWith, "Ends with"),
    option(ConditionOperator::DoesNotEndWith, "Does not end with"),
    option(ConditionOperator::NotNull, "Contains data"),
    option(ConditionOperator::Null, "Does not contain data"),
];

/// Operators offered for a column kind; empty for unsupported kinds.
pub fn condition_options(kind: ColumnKind) -> &'static [ConditionOption] {
    match kind {
        ColumnKind::Date => DATE_CONDITIONS,
        ColumnKind::Number => NUMBER_CONDITIONS,
        ColumnKind::OptionSet | ColumnKind::TwoOptions => CHOICE_CONDITIONS,
        ColumnKind::Lookup => LOOKUP_CONDITIONS,
        ColumnKind::Text => TEXT_CONDITIONS,
        ColumnKind::Other => &[],
    }
}

/// Operator preselected when the editor opens on a column.
pub fn default_operator(kind: ColumnKind) -> ConditionOperator {
    match kind {
        ColumnKind::Date => ConditionOperator::On,
        ColumnKind::OptionSet | ColumnKind::TwoOptions => ConditionOperator::In,
        _ => ConditionOperator::Equal,
    }
}

/// The column the filter editor is open on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// State of the single-condition filter editor.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    column: Option<FilterColumn>,
    operator: ConditionOperator,
    value: FilterValue,
    selected_keys: Vec<String>,
    choices: Vec<OptionDescriptor>,
    visible: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            column: None,
            operator: ConditionOperator::Equal,
            value: FilterValue::default(),
            selected_keys: Vec::new(),
            choices: Vec::new(),
            visible: false,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the editor on `column` with the kind's default operator.
    ///
    /// Switching to another column discards the value entered for the previous one.
    pub fn open(&mut self, column: &Column) {
        let kind = column.kind();
        if self.column_name() != Some(column.name.as_str()) {
            self.value = FilterValue::default();
            self.selected_keys.clear();
            self.choices.clear();
        }
        self.column = Some(FilterColumn {
            name: column.name.clone(),
            kind,
        });
        self.operator = default_operator(kind);
        self.visible = true;
    }

    pub fn column(&self) -> Option<&FilterColumn> {
        self.column.as_ref()
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_ref().map(|c| c.name.as_str())
    }

    pub fn operator(&self) -> ConditionOperator {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Option-set choices loaded for the current column.
    pub fn choices(&self) -> &[OptionDescriptor] {
        &self.choices
    }

    /// Operators offered for the current column.
    pub fn condition_options(&self) -> &'static [ConditionOption] {
        self.column
            .as_ref()
            .map(|c| condition_options(c.kind))
            .unwrap_or(&[])
    }

    pub fn set_operator(&mut self, operator: ConditionOperator) {
        self.operator = operator;
    }

    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.value = value.into();
    }

    /// Adds or removes one option key; the value becomes the selected keys.
    pub fn toggle_choice(&mut self, key: &str, selected: bool) {
        if selected {
            if !self.selected_keys.iter().any(|k| k == key) {
                self.selected_keys.push(key.to_string());
            }
        } else {
            self.selected_keys.retain(|k| k != key);
        }
        self.value = FilterValue::Many(self.selected_keys.clone());
    }

    /// Loads the option-set choices for a choice column.
    pub async fn load_choices<H: MetadataHost>(
        &mut self,
        service: &GridService<H>,
    ) -> Result<(), Error> {
        if let Some(column) = &self.column {
            if column.kind.is_choice() {
                self.choices = service.get_option_set(&column.name, None).await?;
            }
        }
        Ok(())
    }

    /// Returns `true` when `column` carries a non-empty filter value.
    pub fn is_active_for(&self, column: &str) -> bool {
        self.column_name() == Some(column) && !self.value.is_empty()
    }

    /// Closes the editor and yields the filter to send to the host.
    ///
    /// `Like`/`NotLike` on text columns get a leading `%`.
    pub fn apply(&mut self) -> Option<GridIntent> {
        let column = self.column.as_ref()?;
        let value = match (&self.value, self.operator, column.kind) {
            (
                FilterValue::Single(text),
                ConditionOperator::Like | ConditionOperator::NotLike,
                ColumnKind::Text,
            ) => FilterValue::Single(format!("%{}", text)),
            (value, _, _) => value.clone(),
        };
        self.visible = false;
        Some(GridIntent::Filter {
            column: column.name.clone(),
            operator: self.operator,
            value,
            entity_alias: None,
        })
    }

    /// Closes the editor and yields the request to drop the filter.
    pub fn clear(&mut self) -> Option<GridIntent> {
        self.column.as_ref()?;
        self.visible = false;
        Some(GridIntent::ClearFilter)
    }

    /// Forgets the column, as after clearing a filter from the column menu.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.column = None;
    }
}
