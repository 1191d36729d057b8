//! Intake form validation.
//!
//! Turns the four raw text fields of the registration form into a
//! [`PatientRecord`]. Checks run in a fixed order (blank fields, then age,
//! then severity) and only the first failure is reported.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::models::patient::PatientRecord;
use crate::severity::{SEVERITY_MAX, SEVERITY_MIN};

/// Form fields, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Field {
    Name,
    Age,
    Description,
    Severity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Age => "age",
            Field::Description => "description",
            Field::Severity => "severity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(Field),

    #[error("invalid age: {0:?}")]
    InvalidAge(String),

    #[error("invalid severity: {0:?}")]
    InvalidSeverity(String),
}

/// Raw, unvalidated contents of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub description: String,
    pub severity: String,
}

impl PatientForm {
    pub fn validate(&self) -> Result<PatientRecord, ValidationError> {
        validate_patient(&self.name, &self.age, &self.description, &self.severity)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Validate raw form input into an unsaved [`PatientRecord`].
pub fn validate_patient(
    name: &str,
    age: &str,
    description: &str,
    severity: &str,
) -> Result<PatientRecord, ValidationError> {
    let name = name.trim();
    let age = age.trim();
    let description = description.trim();
    let severity = severity.trim();

    let fields = [
        (Field::Name, name),
        (Field::Age, age),
        (Field::Description, description),
        (Field::Severity, severity),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
        return Err(ValidationError::MissingField(*field));
    }

    let age_num = parse_age(age).ok_or_else(|| ValidationError::InvalidAge(age.to_string()))?;
    let severity_num = parse_severity(severity)
        .ok_or_else(|| ValidationError::InvalidSeverity(severity.to_string()))?;

    Ok(PatientRecord {
        id: None,
        name: name.to_string(),
        age: age_num.to_string(),
        description: description.to_string(),
        severity: severity_num,
    })
}

fn parse_age(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

fn parse_severity(raw: &str) -> Option<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|n| (SEVERITY_MIN..=SEVERITY_MAX).contains(n))
}
