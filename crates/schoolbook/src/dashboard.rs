//! Session state for the school dashboard.
//!
//! A [`Dashboard`] owns everything one session needs: the record store, the
//! add form and the navigation state. It is built at startup from a loaded
//! store and dropped when the session ends.

use crate::error::{Error, Result};
use crate::form::{SchoolForm, Submitted};
use crate::school::School;
use crate::slot::Slot;
use crate::store::RecordStore;
use crate::validate::ValidationErrors;

/// Which page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// The add-school form.
    Add,
    /// The list of schools.
    #[default]
    Show,
}

/// Keys the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Close the detail overlay.
    Escape,
    /// Any other key; ignored.
    Other,
}

/// Current page and the school open in the detail overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    page: Page,
    selected: Option<usize>,
}

impl Navigation {
    /// The page currently showing.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Switch page.
    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    /// Index of the school open in the overlay, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Open the overlay on `index`, or close it with `None`.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// React to a key press. Returns `true` if the key closed the overlay.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.selected.is_some() => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}

/// One session: records, form and navigation.
#[derive(Debug)]
pub struct Dashboard<S> {
    store: RecordStore<S>,
    form: SchoolForm,
    nav: Navigation,
}

impl<S: Slot> Dashboard<S> {
    /// Start a session on `store`, showing the list.
    #[must_use]
    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            store,
            form: SchoolForm::new(),
            nav: Navigation::default(),
        }
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// The add form.
    #[must_use]
    pub fn form(&self) -> &SchoolForm {
        &self.form
    }

    /// The add form, for editing.
    pub fn form_mut(&mut self) -> &mut SchoolForm {
        &mut self.form
    }

    /// Navigation state.
    #[must_use]
    pub fn nav(&self) -> &Navigation {
        &self.nav
    }

    /// Switch page.
    pub fn navigate(&mut self, page: Page) {
        self.nav.navigate(page);
    }

    /// Submit the form. On success the list page is shown.
    ///
    /// # Errors
    ///
    /// Returns the failing fields if the draft is invalid.
    pub fn submit(&mut self) -> std::result::Result<Submitted, ValidationErrors> {
        let submitted = self.form.submit(&mut self.store)?;
        self.nav.navigate(Page::Show);
        Ok(submitted)
    }

    /// Open the detail overlay on the school at `index` (0-based), or close
    /// it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `index` is past the end of the list.
    pub fn select(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(i) = index {
            if i >= self.store.len() {
                return Err(Error::NotFound {
                    position: i + 1,
                    len: self.store.len(),
                });
            }
        }
        self.nav.select(index);
        Ok(())
    }

    /// Close the detail overlay.
    pub fn close(&mut self) {
        self.nav.select(None);
    }

    /// The school open in the detail overlay.
    #[must_use]
    pub fn selected_school(&self) -> Option<&School> {
        self.nav.selected().and_then(|i| self.store.get(i))
    }

    /// React to a key press. Returns `true` if the key closed the overlay.
    pub fn press(&mut self, key: Key) -> bool {
        self.nav.handle_key(key)
    }
}
