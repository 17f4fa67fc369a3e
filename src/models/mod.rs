pub mod message;
pub mod user;

pub use message::*;
pub use user::*;

use std::collections::BTreeMap;

/// Validation messages keyed by form field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub(crate) fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

pub(crate) fn min_length(errors: &mut FieldErrors, field: &'static str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("Field must be at least {} characters long.", min));
    }
}

pub(crate) fn max_length(errors: &mut FieldErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Field cannot be longer than {} characters.", max));
    }
}

pub(crate) fn email_shaped(errors: &mut FieldErrors, field: &'static str, value: &str) {
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add(field, "Invalid email address.");
    }
}

/// Empty form inputs become `None`.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
