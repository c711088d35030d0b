//! Field validation for candidate schools.
//!
//! A [`SchoolDraft`] is admitted only when every field passes. Validation
//! reports every failing field at once, each with its own message, so the
//! form can show them beside the matching inputs.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::school::{School, SchoolDraft};

/// Exactly ten ASCII digits.
const CONTACT_PATTERN: &str = r"^[0-9]{10}$";

/// `local@domain.tld` with a TLD of at least two ASCII letters.
///
/// The classes already list both cases. A `(?i)` flag here would also fold
/// in non-ASCII letters such as U+212A KELVIN SIGN.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// School name.
    Name,
    /// Street address.
    Address,
    /// City.
    City,
    /// State.
    State,
    /// Contact number.
    Contact,
    /// Email address.
    EmailId,
}

impl Field {
    /// All validated fields, in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Address,
        Self::City,
        Self::State,
        Self::Contact,
        Self::EmailId,
    ];

    /// The field's key, as used in the serialized record and by the shell.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::Contact => "contact",
            Self::EmailId => "email_id",
        }
    }

    /// Human-readable label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "School Name",
            Self::Address => "Address",
            Self::City => "City",
            Self::State => "State",
            Self::Contact => "Contact Number",
            Self::EmailId => "Email ID",
        }
    }

    /// Look up a field by key. `email` is accepted as an alias of `email_id`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "address" => Some(Self::Address),
            "city" => Some(Self::City),
            "state" => Some(Self::State),
            "contact" => Some(Self::Contact),
            "email" | "email_id" => Some(Self::EmailId),
            _ => None,
        }
    }

    /// Message shown when the field is left empty.
    fn required_message(self) -> &'static str {
        match self {
            Self::Name => "School Name is required.",
            Self::Address => "Address is required.",
            Self::City => "City is required.",
            Self::State => "State is required.",
            Self::Contact => "Contact number is required.",
            Self::EmailId => "Email is required.",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The field that failed.
    pub field: Field,
    /// Message to show beside the field.
    pub message: String,
}

/// Every field that failed during one submission attempt, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record a failure for `field`.
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Check if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterate over the failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Checks candidate schools against the field rules.
#[derive(Debug, Clone)]
pub struct Validator {
    contact: Regex,
    email: Regex,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Build a validator with the compiled field patterns.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contact: Regex::new(CONTACT_PATTERN).expect("Invalid contact pattern"),
            email: Regex::new(EMAIL_PATTERN).expect("Invalid email pattern"),
        }
    }

    /// Check whether `contact` is exactly ten digits.
    #[must_use]
    pub fn is_valid_contact(&self, contact: &str) -> bool {
        self.contact.is_match(contact)
    }

    /// Check whether `email` has `local@domain.tld` shape.
    #[must_use]
    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    /// Check every field of `draft` and collect the failures.
    #[must_use]
    pub fn check(&self, draft: &SchoolDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for field in Field::ALL {
            let value = draft.value(field);

            if value.is_empty() {
                errors.push(field, field.required_message());
                continue;
            }

            match field {
                Field::Contact if !self.is_valid_contact(value) => {
                    errors.push(field, "Please enter a valid 10-digit number.");
                }
                Field::EmailId if !self.is_valid_email(value) => {
                    errors.push(field, "Invalid email address.");
                }
                _ => {}
            }
        }

        errors
    }

    /// Validate `draft` and turn it into a [`School`].
    ///
    /// # Errors
    ///
    /// Returns every failing field if any rule is violated.
    pub fn validate(&self, draft: SchoolDraft) -> std::result::Result<School, ValidationErrors> {
        let errors = self.check(&draft);
        if errors.is_empty() {
            Ok(draft.into_school())
        } else {
            Err(errors)
        }
    }
}
