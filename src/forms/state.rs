//! Form state reducer
//!
//! All input goes through [`FormState::apply`]; validation and payload
//! building only ever read the resulting state.

use std::collections::BTreeMap;

/// Value held by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// A change to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Replace the text of a field
    SetText { field: String, value: String },
    /// Set a checkbox field
    SetFlag { field: String, value: bool },
    /// Replace every field with values taken from a record
    Load(BTreeMap<String, FieldValue>),
    /// Clear every field
    Reset,
}

impl FormAction {
    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        FormAction::SetText {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn flag(field: impl Into<String>, value: bool) -> Self {
        FormAction::SetFlag {
            field: field.into(),
            value,
        }
    }
}

/// Current values of a form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::SetText { field, value } => {
                self.values.insert(field, FieldValue::Text(value));
            }
            FormAction::SetFlag { field, value } => {
                self.values.insert(field, FieldValue::Flag(value));
            }
            FormAction::Load(values) => self.values = values,
            FormAction::Reset => self.values.clear(),
        }
    }

    /// Reducer form of [`FormState::apply`]
    pub fn reduce(mut self, action: FormAction) -> Self {
        self.apply(action);
        self
    }

    pub fn with_text(self, field: &str, value: impl Into<String>) -> Self {
        self.reduce(FormAction::text(field, value))
    }

    pub fn with_flag(self, field: &str, value: bool) -> Self {
        self.reduce(FormAction::flag(field, value))
    }

    /// Text of a field; empty when unset or when the field is a flag
    pub fn text(&self, field: &str) -> &str {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    /// Text of a field with surrounding whitespace removed, if non-empty
    pub fn trimmed(&self, field: &str) -> Option<&str> {
        Some(self.text(field).trim()).filter(|s| !s.is_empty())
    }

    /// Checkbox value; false when unset
    pub fn flag(&self, field: &str) -> bool {
        matches!(self.values.get(field), Some(FieldValue::Flag(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Collects field values for [`FormAction::Load`]
#[derive(Debug, Default)]
pub struct Snapshot(BTreeMap<String, FieldValue>);

impl Snapshot {
    pub fn text(mut self, field: &str, value: impl ToString) -> Self {
        self.0.insert(field.to_string(), FieldValue::Text(value.to_string()));
        self
    }

    pub fn flag(mut self, field: &str, value: bool) -> Self {
        self.0.insert(field.to_string(), FieldValue::Flag(value));
        self
    }

    pub fn into_action(self) -> FormAction {
        FormAction::Load(self.0)
    }
}
