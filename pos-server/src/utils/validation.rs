//! Input validation helpers
//!
//! Required-field collection for the CRUD handlers. Missing fields are
//! reported together, naming every offender, instead of failing on the
//! first one.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: dish, table, customer, admin
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Notes and free text (chef's note, contact info)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Collects the names of required fields that are missing or empty.
///
/// ```ignore
/// let mut missing = MissingFields::new();
/// missing.check("name", &name);
/// missing.check("email", &email);
/// missing.into_result()?;
/// ```
#[derive(Debug, Default)]
pub struct MissingFields {
    fields: Vec<&'static str>,
}

impl MissingFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `field` as missing when the value is absent or blank.
    pub fn check(&mut self, field: &'static str, value: &Option<String>) {
        match value {
            Some(v) if !v.trim().is_empty() => {}
            _ => self.fields.push(field),
        }
    }

    /// Record `field` as missing when the flag is false.
    pub fn check_that(&mut self, field: &'static str, present: bool) {
        if !present {
            self.fields.push(field);
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Missing or empty fields: {}",
                self.fields.join(", ")
            )))
        }
    }
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_missing_field() {
        let mut missing = MissingFields::new();
        missing.check("name", &None);
        missing.check("email", &Some("  ".to_string()));
        missing.check("contact_info", &Some("+34 600 000 000".to_string()));
        let err = missing.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Missing or empty fields: name, email"
        );
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(MissingFields::new().into_result().is_ok());
    }
}
