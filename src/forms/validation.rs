//! Field validation
//!
//! [`validate`] is a pure function from form state to a map of field
//! name → message. A form may be submitted only when the map is empty.

use bigdecimal::BigDecimal;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::FormState;
use crate::model::date_format;

/// A check applied to a non-empty field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must not be empty
    Required,
    /// Decimal number
    Decimal,
    /// Decimal number ≥ 0
    NonNegative,
    /// Whole number
    Integer,
    /// Whole number ≥ the given bound
    AtLeast(i64),
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// One of the listed wire values
    OneOf(&'static [&'static str]),
    /// Looks like an email address
    Email,
    /// At least this many characters
    MinLength(usize),
    /// Equal to another field
    Matches {
        field: &'static str,
        message: &'static str,
    },
}

/// A field and the rules it must satisfy
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub rules: &'static [Rule],
}

/// Per-field error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field is kept
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(())` when empty, the errors otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^\S+@\S+$").expect("email pattern is valid"))
}

/// Validate every field of `fields` against `state`
pub fn validate(fields: &[FieldSpec], state: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for field in fields {
        let raw = state.text(field.name);
        let value = raw.trim();

        if value.is_empty() {
            if field.rules.contains(&Rule::Required) {
                errors.add(field.name, format!("{} is required", field.label));
            }
            continue;
        }

        if let Some(message) = field
            .rules
            .iter()
            .find_map(|rule| check(*rule, field.label, value, raw, state))
        {
            errors.add(field.name, message);
        }
    }

    errors
}

/// Message for a failed rule, `None` if the value passes.
///
/// Length and equality look at `raw`, the text exactly as it will be sent.
fn check(rule: Rule, label: &str, value: &str, raw: &str, state: &FormState) -> Option<String> {
    match rule {
        Rule::Required => None,
        Rule::Decimal => BigDecimal::from_str(value)
            .is_err()
            .then(|| format!("{label} must be a number")),
        Rule::NonNegative => match BigDecimal::from_str(value) {
            Err(_) => Some(format!("{label} must be a number")),
            Ok(n) if n < BigDecimal::from(0) => Some(format!("{label} cannot be negative")),
            Ok(_) => None,
        },
        Rule::Integer => value
            .parse::<i64>()
            .is_err()
            .then(|| format!("{label} must be a whole number")),
        Rule::AtLeast(min) => match value.parse::<i64>() {
            Err(_) => Some(format!("{label} must be a whole number")),
            Ok(n) if n < min => Some(format!("{label} must be at least {min}")),
            Ok(_) => None,
        },
        Rule::Date => date_format::parse(value)
            .is_err()
            .then(|| format!("{label} must be a date (YYYY-MM-DD)")),
        Rule::OneOf(options) => (!options.contains(&value))
            .then(|| format!("{label} must be one of: {}", options.join(", "))),
        Rule::Email => (!email_pattern().is_match(value)).then(|| "Invalid email address".to_string()),
        Rule::MinLength(min) => {
            (raw.chars().count() < min).then(|| format!("Min {min} characters"))
        }
        Rule::Matches { field, message } => {
            (state.text(field) != raw).then(|| message.to_string())
        }
    }
}
