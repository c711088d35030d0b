//! Core record types for schoolbook.
//!
//! A [`School`] is the only entity the register keeps. It is built from a
//! [`SchoolDraft`] once the draft has passed validation and is never edited
//! afterwards.

use serde::{Deserialize, Serialize};

use crate::validate::Field;

/// A school admitted to the register.
///
/// The serialized form is a flat object whose field names match the
/// persisted slot format (`email_id`, `image: null` when absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// School name.
    pub name: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Ten-digit contact number.
    pub contact: String,

    /// Contact email address.
    pub email_id: String,

    /// Optional reference to a school image.
    ///
    /// See [`crate::image::ImageRef`] for the reference format. The reference
    /// points at a local file and is not guaranteed to resolve later.
    #[serde(default)]
    pub image: Option<String>,
}

impl School {
    /// The `mailto:` link for this school's email address.
    #[must_use]
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email_id)
    }

    /// Check if this school has an image reference attached.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// User-entered data for a school that has not been validated yet.
///
/// Every text field starts empty; the draft is what the add form edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolDraft {
    /// School name as entered.
    pub name: String,
    /// Address as entered.
    pub address: String,
    /// City as entered.
    pub city: String,
    /// State as entered.
    pub state: String,
    /// Contact number as entered.
    pub contact: String,
    /// Email address as entered.
    pub email_id: String,
    /// Image reference, if an image was selected.
    pub image: Option<String>,
}

impl SchoolDraft {
    /// Check if nothing has been entered yet.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// The entered value of a text field.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Contact => &self.contact,
            Field::EmailId => &self.email_id,
        }
    }

    /// The entered value of a text field, for editing.
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Contact => &mut self.contact,
            Field::EmailId => &mut self.email_id,
        }
    }

    /// Turn the draft into a school without checking it.
    ///
    /// Callers go through [`crate::validate::Validator::validate`], which
    /// only calls this after every field has passed.
    pub(crate) fn into_school(self) -> School {
        School {
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            contact: self.contact,
            email_id: self.email_id,
            image: self.image,
        }
    }
}
