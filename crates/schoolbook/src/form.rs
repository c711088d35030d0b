//! The add-school form.
//!
//! The form holds a [`SchoolDraft`] being edited and the field errors from
//! the last submission attempt. Submitting runs the validator; only a fully
//! valid draft reaches [`RecordStore::append`], after which the form resets.

use tracing::{debug, warn};

use crate::error::Result;
use crate::image::ImageRef;
use crate::school::SchoolDraft;
use crate::slot::Slot;
use crate::store::RecordStore;
use crate::validate::{Field, ValidationErrors, Validator};

/// Outcome of a successful submission.
#[derive(Debug)]
pub struct Submitted {
    /// Position (0-based) of the new school in the store.
    pub index: usize,
    /// Whether the store managed to mirror the list to its slot.
    pub persisted: Result<()>,
}

/// Form state for adding one school.
#[derive(Debug, Clone, Default)]
pub struct SchoolForm {
    draft: SchoolDraft,
    errors: ValidationErrors,
    validator: Validator,
}

impl SchoolForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The values entered so far.
    #[must_use]
    pub fn draft(&self) -> &SchoolDraft {
        &self.draft
    }

    /// Errors from the last submission attempt.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Check the draft without submitting it.
    #[must_use]
    pub fn check(&self) -> ValidationErrors {
        self.validator.check(&self.draft)
    }

    /// Set the value of a text field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.draft.value_mut(field) = value.into();
    }

    /// Attach an image, or detach it with `None`.
    pub fn set_image(&mut self, image: Option<&ImageRef>) {
        self.draft.image = image.map(ToString::to_string);
    }

    /// Clear every field and error.
    pub fn reset(&mut self) {
        self.draft = SchoolDraft::default();
        self.errors = ValidationErrors::default();
    }

    /// Validate the draft and, if it passes, append it to `store`.
    ///
    /// On success the form is reset. On failure the draft is kept as
    /// entered and [`SchoolForm::errors`] reports every failing field.
    ///
    /// # Errors
    ///
    /// Returns the failing fields if the draft is invalid. Nothing is
    /// appended in that case.
    pub fn submit<S: Slot>(
        &mut self,
        store: &mut RecordStore<S>,
    ) -> std::result::Result<Submitted, ValidationErrors> {
        let school = match self.validator.validate(self.draft.clone()) {
            Ok(school) => school,
            Err(errors) => {
                debug!("Submission blocked: {}", errors);
                self.errors = errors.clone();
                return Err(errors);
            }
        };

        let name = school.name.clone();
        let persisted = store.append(school);
        if let Err(e) = &persisted {
            warn!("School '{}' added but not persisted: {}", name, e);
        }

        self.reset();
        Ok(Submitted {
            index: store.len() - 1,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;

    fn store() -> RecordStore<MemorySlot> {
        RecordStore::load(MemorySlot::new("schools")).0
    }

    fn fill_oak(form: &mut SchoolForm) {
        form.set(Field::Name, "Oak Elementary");
        form.set(Field::Address, "12 Elm St");
        form.set(Field::City, "Springfield");
        form.set(Field::State, "IL");
        form.set(Field::Contact, "5551234567");
        form.set(Field::EmailId, "office@oak.edu");
    }

    #[test]
    fn test_new_form_is_blank() {
        let form = SchoolForm::new();
        assert!(form.draft().is_blank());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submit_valid_appends_and_resets() {
        let mut store = store();
        let mut form = SchoolForm::new();
        fill_oak(&mut form);

        let submitted = form.submit(&mut store).unwrap();
        assert_eq!(submitted.index, 0);
        assert!(submitted.persisted.is_ok());
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].name, "Oak Elementary");
        assert!(form.draft().is_blank());
        assert!(store.slot().value().is_some());
    }

    #[test]
    fn test_submit_invalid_keeps_store_unchanged() {
        let mut store = store();
        let mut form = SchoolForm::new();
        fill_oak(&mut form);
        form.set(Field::City, "");
        form.set(Field::Contact, "123456789");

        let errors = form.submit(&mut store).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::City), Some("City is required."));
        assert!(store.is_empty());
        assert_eq!(store.slot().value(), None);

        // The draft is kept so the user can fix it.
        assert_eq!(form.draft().name, "Oak Elementary");
        assert_eq!(form.errors(), &errors);
    }

    #[test]
    fn test_fixing_errors_then_submitting() {
        let mut store = store();
        let mut form = SchoolForm::new();
        fill_oak(&mut form);
        form.set(Field::EmailId, "not-an-email");
        assert!(form.submit(&mut store).is_err());

        form.set(Field::EmailId, "a@b.co");
        assert!(form.submit(&mut store).is_ok());
        assert!(form.errors().is_empty());
        assert_eq!(store.list()[0].email_id, "a@b.co");
    }

    #[test]
    fn test_image_attached_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("oak.png");
        std::fs::write(&path, b"png").unwrap();
        let image = ImageRef::from_file(&path, &crate::config::ImageConfig::default()).unwrap();

        let mut store = store();
        let mut form = SchoolForm::new();
        fill_oak(&mut form);
        form.set_image(Some(&image));
        form.submit(&mut store).unwrap();

        assert_eq!(store.list()[0].image, Some(image.to_string()));
        assert!(form.draft().image.is_none());
    }

    #[test]
    fn test_check_leaves_form_untouched() {
        let mut form = SchoolForm::new();
        form.set(Field::Name, "Oak");

        let errors = form.check();
        assert_eq!(errors.len(), 5);
        assert!(errors.get(Field::Name).is_none());
        assert!(form.errors().is_empty());
        assert_eq!(form.draft().name, "Oak");
    }

    #[test]
    fn test_reset() {
        let mut form = SchoolForm::new();
        fill_oak(&mut form);
        form.reset();
        assert!(form.draft().is_blank());
    }
}
