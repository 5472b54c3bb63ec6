//! Declarative request validation.
//!
//! Each endpoint declares a [`Schema`]: an ordered list of [`FieldRule`]s
//! naming a field, its type, whether it is required and any extra
//! constraints. [`Schema::validate`] is a pure function over the decoded JSON
//! body. It yields either a [`ValidPayload`] with normalised values or the
//! list of [`FieldError`]s. Handlers never expose field errors to clients;
//! [`validate_payload`] logs them and collapses any failure into a single
//! `400 {"error": "validation fails"}`.
//!
//! Coercions follow the usual form-library conventions: numeric strings are
//! numbers, numbers and booleans are accepted as strings, `"true"`/`"false"`
//! are booleans, and dates may be RFC 3339 timestamps or `YYYY-MM-DD`.
//! `null` is treated the same as an absent field.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Email, Error};

/// Value type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Text; numbers and booleans are converted.
    String,
    /// 32-bit integer; numeric strings are converted.
    Number,
    /// Timestamp in UTC.
    Date,
    /// `true` / `false`.
    Boolean,
}

/// Extra format constraint on string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Must parse as an [`Email`].
    Email,
}

/// When a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always required.
    Required,
    /// Never required.
    Optional,
    /// Required whenever the named field is present.
    RequiredWith(&'static str),
}

/// Validation rule for one field.
///
/// Rules are built with `const` constructors so schemas can live in statics:
///
/// ```
/// use backend::inbound::http::validation::{FieldRule, Schema};
///
/// static SCHEMA: Schema = Schema::new(&[
///     FieldRule::string("email").required().email(),
///     FieldRule::string("password").required().min_len(6),
/// ]);
/// # let _ = &SCHEMA;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    name: &'static str,
    kind: FieldType,
    presence: Presence,
    format: Option<Format>,
    min_len: Option<usize>,
    equals: Option<&'static str>,
    depends_on: Option<&'static str>,
}

impl FieldRule {
    const fn of(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            format: None,
            min_len: None,
            equals: None,
            depends_on: None,
        }
    }

    /// Optional string field.
    pub const fn string(name: &'static str) -> Self {
        Self::of(name, FieldType::String)
    }

    /// Optional integer field.
    pub const fn number(name: &'static str) -> Self {
        Self::of(name, FieldType::Number)
    }

    /// Optional date field.
    pub const fn date(name: &'static str) -> Self {
        Self::of(name, FieldType::Date)
    }

    /// Optional boolean field.
    pub const fn boolean(name: &'static str) -> Self {
        Self::of(name, FieldType::Boolean)
    }

    /// Mark the field as always required.
    pub const fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Require the field whenever `other` is present.
    pub const fn required_with(mut self, other: &'static str) -> Self {
        self.presence = Presence::RequiredWith(other);
        self
    }

    /// Require an e-mail address.
    pub const fn email(mut self) -> Self {
        self.format = Some(Format::Email);
        self
    }

    /// Require at least `min` characters.
    pub const fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Reject the field unless `other` is present too.
    pub const fn only_with(mut self, other: &'static str) -> Self {
        self.depends_on = Some(other);
        self
    }

    /// Require the value to equal the value of `other`.
    pub const fn equal_to(mut self, other: &'static str) -> Self {
        self.equals = Some(other);
        self
    }

    /// Field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Whether validation stops at the first failing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Stop after the first error.
    AbortEarly,
    /// Collect every error.
    Exhaustive,
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The body is not a JSON object.
    NotAnObject,
    /// A required field is absent or blank.
    Missing,
    /// The value cannot be read as the declared type.
    WrongType(FieldType),
    /// The value does not match the declared format.
    InvalidFormat(Format),
    /// The string is shorter than allowed.
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// The field was supplied without the field it depends on.
    Unaccompanied {
        /// Field that must accompany this one.
        other: &'static str,
    },
    /// The value differs from the field it must equal.
    Mismatch {
        /// Field the value was compared with.
        other: &'static str,
    },
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field; empty for whole-body errors.
    pub field: &'static str,
    /// Reason for the rejection.
    pub kind: FieldErrorKind,
}

/// A normalised field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i32),
    Date(DateTime<Utc>),
    Boolean(bool),
}

/// Payload that passed its schema, keyed by field name.
///
/// Only fields declared by the schema and present in the body are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidPayload {
    values: BTreeMap<&'static str, FieldValue>,
}

impl ValidPayload {
    /// Whether `field` was supplied.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// String value of `field`, if supplied.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Integer value of `field`, if supplied.
    pub fn number(&self, field: &str) -> Option<i32> {
        match self.values.get(field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Date value of `field`, if supplied.
    pub fn date(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.values.get(field) {
            Some(FieldValue::Date(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value of `field`, if supplied.
    pub fn boolean(&self, field: &str) -> Option<bool> {
        match self.values.get(field) {
            Some(FieldValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// E-mail value of `field`, if supplied and well formed.
    pub fn email(&self, field: &str) -> Option<Email> {
        self.text(field).and_then(|raw| Email::parse(raw).ok())
    }

    /// String value of a field the schema marks as required.
    pub fn require_text(&self, field: &str) -> Result<String, Error> {
        self.text(field).ok_or_else(|| missing(field))
    }

    /// Integer value of a field the schema marks as required.
    pub fn require_number(&self, field: &str) -> Result<i32, Error> {
        self.number(field).ok_or_else(|| missing(field))
    }

    /// Date value of a field the schema marks as required.
    pub fn require_date(&self, field: &str) -> Result<DateTime<Utc>, Error> {
        self.date(field).ok_or_else(|| missing(field))
    }

    /// E-mail value of a field the schema marks as required.
    pub fn require_email(&self, field: &str) -> Result<Email, Error> {
        self.email(field).ok_or_else(|| missing(field))
    }
}

fn missing(field: &str) -> Error {
    debug!(field, "validated payload lacks a required field");
    Error::validation_fails()
}

/// Ordered set of field rules for one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    /// Build a schema from its rules, evaluated in order.
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Check `payload` against every rule.
    ///
    /// # Errors
    ///
    /// Returns the field errors found; a single error in
    /// [`ValidationMode::AbortEarly`].
    pub fn validate(
        &self,
        payload: &Value,
        mode: ValidationMode,
    ) -> Result<ValidPayload, Vec<FieldError>> {
        let Some(object) = payload.as_object() else {
            return Err(vec![FieldError {
                field: "",
                kind: FieldErrorKind::NotAnObject,
            }]);
        };

        let mut valid = ValidPayload::default();
        let mut errors = Vec::new();
        for rule in self.rules {
            match check_rule(rule, object) {
                Ok(Some(value)) => {
                    valid.values.insert(rule.name, value);
                }
                Ok(None) => {}
                Err(kind) => {
                    errors.push(FieldError {
                        field: rule.name,
                        kind,
                    });
                    if mode == ValidationMode::AbortEarly {
                        break;
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(valid)
        } else {
            Err(errors)
        }
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(text) if text.is_empty())
}

fn check_rule(
    rule: &FieldRule,
    object: &Map<String, Value>,
) -> Result<Option<FieldValue>, FieldErrorKind> {
    let required = match rule.presence {
        Presence::Required => true,
        Presence::Optional => false,
        Presence::RequiredWith(other) => present(object, other).is_some(),
    };

    let Some(raw) = present(object, rule.name) else {
        return if required {
            Err(FieldErrorKind::Missing)
        } else {
            Ok(None)
        };
    };
    if required && is_blank(raw) {
        return Err(FieldErrorKind::Missing);
    }
    if let Some(other) = rule.depends_on {
        if present(object, other).is_none() {
            return Err(FieldErrorKind::Unaccompanied { other });
        }
    }

    let value = coerce(raw, rule.kind).ok_or(FieldErrorKind::WrongType(rule.kind))?;

    if let (Some(Format::Email), FieldValue::Text(text)) = (rule.format, &value) {
        Email::parse(text.as_str()).map_err(|_| FieldErrorKind::InvalidFormat(Format::Email))?;
    }
    if let (Some(min), FieldValue::Text(text)) = (rule.min_len, &value) {
        if text.chars().count() < min {
            return Err(FieldErrorKind::TooShort { min });
        }
    }
    if let Some(other) = rule.equals {
        // Nothing to compare against when the counterpart is absent.
        if let Some(counterpart) = present(object, other) {
            if coerce(counterpart, rule.kind).as_ref() != Some(&value) {
                return Err(FieldErrorKind::Mismatch { other });
            }
        }
    }
    Ok(Some(value))
}

fn coerce(raw: &Value, kind: FieldType) -> Option<FieldValue> {
    match kind {
        FieldType::String => match raw {
            Value::String(text) => Some(FieldValue::Text(text.clone())),
            Value::Number(number) => Some(FieldValue::Text(number.to_string())),
            Value::Bool(flag) => Some(FieldValue::Text(flag.to_string())),
            _ => None,
        },
        FieldType::Number => match raw {
            Value::Number(number) => number
                .as_i64()
                .and_then(|value| i32::try_from(value).ok())
                .map(FieldValue::Number),
            Value::String(text) => text.trim().parse::<i32>().ok().map(FieldValue::Number),
            _ => None,
        },
        FieldType::Date => match raw {
            Value::String(text) => parse_date(text).map(FieldValue::Date),
            _ => None,
        },
        FieldType::Boolean => match raw {
            Value::Bool(flag) => Some(FieldValue::Boolean(*flag)),
            Value::String(text) => match text.as_str() {
                "true" => Some(FieldValue::Boolean(true)),
                "false" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
            _ => None,
        },
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validate `payload`, logging field errors and collapsing any failure into
/// the generic `validation fails` error.
pub fn validate_payload(
    schema: &Schema,
    payload: &Value,
    mode: ValidationMode,
) -> Result<ValidPayload, Error> {
    schema.validate(payload, mode).map_err(|errors| {
        debug!(?errors, "request body failed validation");
        Error::validation_fails()
    })
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
