//! Session setup and one-shot additions.
//!
//! Opening the configured slot and adding a school from entered values live
//! here so the binary and tests run them the same way, whatever slot sits
//! behind the store.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::{Config, ImageConfig};
use crate::error::Error;
use crate::form::{SchoolForm, Submitted};
use crate::image::ImageRef;
use crate::slot::{MemorySlot, Slot};
use crate::storage::{SqliteSlot, Storage};
use crate::store::RecordStore;
use crate::validate::{Field, ValidationErrors};

/// Open the configured slot and load the session's list from it.
///
/// Neither step stops the session: without a database the session runs on
/// an in-memory slot, and an unreadable slot starts empty.
#[must_use]
pub fn open_store(config: &Config) -> RecordStore<Box<dyn Slot>> {
    let slot: Box<dyn Slot> = match Storage::open(config.database_path()) {
        Ok(storage) => {
            debug!(
                "Using slot '{}' in {}",
                config.slot_key(),
                storage.path().display()
            );
            Box::new(SqliteSlot::new(storage, config.slot_key()))
        }
        Err(e) => {
            warn!("Database unavailable, changes will not be saved: {}", e);
            Box::new(MemorySlot::new(config.slot_key()))
        }
    };

    let (store, loaded) = RecordStore::load(slot);
    if let Err(e) = loaded {
        warn!("Ignoring saved schools: {}", e);
    }
    store
}

/// Why a school was not added.
#[derive(Debug, Default)]
pub struct Rejection {
    /// Fields that failed validation.
    pub fields: ValidationErrors,
    /// Why the selected image could not be attached.
    pub image: Option<Error>,
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        Self::Validation(rejection.fields)
    }
}

/// Validate `values` and an optional image file, then append the school.
///
/// An unusable image is reported together with every failing field.
///
/// # Errors
///
/// Returns a [`Rejection`] if any field fails or the image cannot be
/// referenced. Nothing is appended in that case.
pub fn add_school<S: Slot>(
    store: &mut RecordStore<S>,
    values: impl IntoIterator<Item = (Field, String)>,
    image: Option<&Path>,
    images: &ImageConfig,
) -> Result<Submitted, Rejection> {
    let mut form = SchoolForm::new();
    for (field, value) in values {
        form.set(field, value);
    }

    match image.map(|path| ImageRef::from_file(path, images)).transpose() {
        Ok(image) => {
            form.set_image(image.as_ref());
            form.submit(store).map_err(|fields| Rejection {
                fields,
                image: None,
            })
        }
        Err(e) => Err(Rejection {
            fields: form.check(),
            image: Some(e),
        }),
    }
}
