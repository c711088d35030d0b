//! `schoolbook` - A small, locally persisted register of schools
//!
//! This library provides the record store, the validated add form and the
//! session state behind the `schools` command-line tool.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod image;
pub mod logging;
pub mod render;
pub mod school;
pub mod session;
pub mod shell;
pub mod slot;
pub mod storage;
pub mod store;
pub mod validate;

pub use config::Config;
pub use dashboard::{Dashboard, Key, Navigation, Page};
pub use error::{Error, Result};
pub use form::{SchoolForm, Submitted};
pub use image::{ImageRef, ImageStatus};
pub use logging::init_logging;
pub use school::{School, SchoolDraft};
pub use session::{add_school, open_store, Rejection};
pub use slot::{MemorySlot, Slot};
pub use storage::{SlotInfo, SqliteSlot, Storage};
pub use store::RecordStore;
pub use validate::{Field, FieldError, ValidationErrors, Validator};
