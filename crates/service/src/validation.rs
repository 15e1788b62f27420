//! Field-level validation shared by the customer and notification requests.
//!
//! Checks are pure functions of the request. A failure is reported as a map
//! from wire field name (`firstName`, `email`, ...) to a [`Violation`] kind;
//! turning a kind into human text is left to the boundary layer.

use std::collections::BTreeMap;
use std::fmt;

use validator::{ValidateEmail, ValidateLength};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Missing, null or blank.
    Required,
    /// Longer than `max` characters.
    TooLong { max: usize },
    InvalidEmail,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Required => write!(f, "required"),
            Violation::TooLong { max } => write!(f, "longer than {max} characters"),
            Violation::InvalidEmail => write!(f, "not a valid email address"),
        }
    }
}

/// At most one violation per field, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Violation>,
}

impl ValidationErrors {
    /// Record `violation` for `field` unless the field already failed an earlier rule.
    pub fn add(&mut self, field: &'static str, violation: Violation) {
        self.fields.entry(field).or_insert(violation);
    }

    pub fn get(&self, field: &str) -> Option<Violation> { self.fields.get(field).copied() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Violation)> + '_ {
        self.fields.iter().map(|(k, v)| (*k, *v))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violation) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Required text field: present, not blank, at most `max` characters.
pub fn check_required(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, max: Option<usize>) {
    match value {
        None => errors.add(field, Violation::Required),
        Some(v) if v.trim().is_empty() => errors.add(field, Violation::Required),
        Some(v) => check_length(errors, field, v, max),
    }
}

/// Optional text field: only the length is constrained.
pub fn check_optional(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        check_length(errors, field, v, Some(max));
    }
}

fn check_length(errors: &mut ValidationErrors, field: &'static str, value: &str, max: Option<usize>) {
    if let Some(max) = max {
        // counted in characters
        if !value.validate_length(None, Some(max as u64), None) {
            errors.add(field, Violation::TooLong { max });
        }
    }
}

/// Email syntax for a present value; absence is left to [`check_required`].
pub fn check_email(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.validate_email() {
            errors.add(field, Violation::InvalidEmail);
        }
    }
}
