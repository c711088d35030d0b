//! The record store.
//!
//! [`RecordStore`] owns the session's ordered list of schools and mirrors it
//! into a [`Slot`] after every change. The mirror is best-effort: a failed
//! read starts the session empty, and a failed write leaves the in-memory
//! list ahead of the slot. Both failures are handed back as [`Result`]s the
//! caller may log or ignore; neither is ever fatal.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::school::School;
use crate::slot::Slot;

/// The session's ordered list of schools and its persisted mirror.
#[derive(Debug)]
pub struct RecordStore<S> {
    slot: S,
    schools: Vec<School>,
}

impl<S: Slot> RecordStore<S> {
    /// Start a session from whatever `slot` holds.
    ///
    /// The store is always returned. If the slot could not be read or does
    /// not hold a list of schools, the store starts empty and the second
    /// element carries the reason.
    pub fn load(slot: S) -> (Self, Result<()>) {
        let (schools, outcome) = match slot.read().and_then(|value| match value {
            Some(value) => decode(slot.key(), &value),
            None => Ok(Vec::new()),
        }) {
            Ok(schools) => (schools, Ok(())),
            Err(err) => {
                debug!("Starting with no schools, slot '{}' unusable: {}", slot.key(), err);
                (Vec::new(), Err(err))
            }
        };

        debug!("Loaded {} schools from slot '{}'", schools.len(), slot.key());
        (Self { slot, schools }, outcome)
    }

    /// Add `school` to the end of the list, then mirror the list to the slot.
    ///
    /// The school is kept in memory even when the returned result is an
    /// error; the error only reports that the slot is now behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the list could not be written to the slot.
    pub fn append(&mut self, school: School) -> Result<()> {
        trace!("Appending school '{}'", school.name);
        self.schools.push(school);
        self.persist()
    }

    /// All schools, in the order they were added.
    #[must_use]
    pub fn list(&self) -> &[School] {
        &self.schools
    }

    /// The school at `index` (0-based).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&School> {
        self.schools.get(index)
    }

    /// Number of schools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    /// Check if there are no schools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// The slot this store mirrors into.
    #[must_use]
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// End the session and hand back the slot.
    #[must_use]
    pub fn into_slot(self) -> S {
        self.slot
    }

    fn persist(&mut self) -> Result<()> {
        let value = encode(&self.schools)?;
        self.slot.write(&value)
    }
}

/// Serialize a list of schools into the slot format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(schools: &[School]) -> Result<String> {
    Ok(serde_json::to_string(schools)?)
}

/// Parse the slot format back into a list of schools.
///
/// An empty value counts as "no schools". Anything that is not a JSON array
/// of school objects is rejected.
///
/// # Errors
///
/// Returns [`Error::SlotMalformed`] if `value` is not a list of schools.
pub fn decode(key: &str, value: &str) -> Result<Vec<School>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: serde_json::Value = serde_json::from_str(value)
        .map_err(|e| Error::slot_malformed(key, format!("not JSON: {e}")))?;

    if !json.is_array() {
        return Err(Error::slot_malformed(key, "expected an array"));
    }

    serde_json::from_value(json).map_err(|e| Error::slot_malformed(key, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::slot::MemorySlot;

    /// A slot whose backend is always unavailable.
    #[derive(Debug, Default)]
    struct BrokenSlot {
        writes: usize,
    }

    impl Slot for BrokenSlot {
        fn key(&self) -> &str {
            "broken"
        }

        fn read(&self) -> Result<Option<String>> {
            Err(Error::Io(std::io::Error::other("slot offline")))
        }

        fn write(&mut self, _value: &str) -> Result<()> {
            self.writes += 1;
            Err(Error::Io(std::io::Error::other("slot offline")))
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn school(name: &str) -> School {
        School {
            name: name.to_string(),
            address: "12 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            contact: "5551234567".to_string(),
            email_id: "office@oak.edu".to_string(),
            image: None,
        }
    }

    fn empty_store() -> RecordStore<MemorySlot> {
        let (store, loaded) = RecordStore::load(MemorySlot::new("schools"));
        assert!(loaded.is_ok());
        store
    }

    #[test]
    fn test_load_absent_slot_is_empty() {
        let store = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.slot().value(), None);
    }

    #[test]
    fn test_load_adopts_persisted_list() {
        let value = encode(&[school("A"), school("B")]).unwrap();
        let (store, loaded) = RecordStore::load(MemorySlot::with_value("schools", value));

        assert!(loaded.is_ok());
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].name, "A");
        assert_eq!(store.list()[1].name, "B");
    }

    #[test]
    fn test_load_non_array_is_empty() {
        init_test_logging();
        for value in [r#"{"name":"A"}"#, "42", "\"schools\"", "null"] {
            let (store, loaded) = RecordStore::load(MemorySlot::with_value("schools", value));
            assert!(store.is_empty(), "value {value}");
            assert!(matches!(loaded, Err(Error::SlotMalformed { .. })));
        }
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let (store, loaded) = RecordStore::load(MemorySlot::with_value("schools", "{not json"));
        assert!(store.is_empty());
        assert!(loaded.unwrap_err().to_string().contains("not JSON"));
    }

    #[test]
    fn test_load_array_of_wrong_shape_is_empty() {
        let (store, loaded) = RecordStore::load(MemorySlot::with_value("schools", "[1, 2]"));
        assert!(store.is_empty());
        assert!(loaded.is_err());
    }

    #[test]
    fn test_load_empty_value_is_empty_without_error() {
        let (store, loaded) = RecordStore::load(MemorySlot::with_value("schools", ""));
        assert!(store.is_empty());
        assert!(loaded.is_ok());
    }

    #[test]
    fn test_load_unreadable_slot_is_empty() {
        let (store, loaded) = RecordStore::load(BrokenSlot::default());
        assert!(store.is_empty());
        assert!(loaded.is_err());
    }

    #[test]
    fn test_append_then_list() {
        let mut store = empty_store();
        for name in ["A", "B", "C"] {
            let before = store.len();
            store.append(school(name)).unwrap();
            assert_eq!(store.len(), before + 1);
            assert_eq!(store.list().last(), Some(&school(name)));
        }
    }

    #[test]
    fn test_append_allows_duplicates() {
        let mut store = empty_store();
        store.append(school("A")).unwrap();
        store.append(school("A")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_mirrors_whole_list() {
        let mut store = empty_store();
        store.append(school("A")).unwrap();
        store.append(school("B")).unwrap();

        let persisted = decode("schools", store.slot().value().unwrap()).unwrap();
        assert_eq!(persisted, store.list());
    }

    #[test]
    fn test_append_survives_write_failure() {
        let (mut store, _) = RecordStore::load(BrokenSlot::default());

        let result = store.append(school("A"));
        assert!(result.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0), Some(&school("A")));

        store.append(school("B")).unwrap_err();
        assert_eq!(store.len(), 2);
        assert_eq!(store.slot().writes, 2);
    }

    #[test]
    fn test_list_is_repeatable() {
        let mut store = empty_store();
        store.append(school("A")).unwrap();
        assert_eq!(store.list(), store.list());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reload_from_slot() {
        let mut store = empty_store();
        store.append(school("A")).unwrap();
        let slot = store.into_slot();

        let (reloaded, loaded) = RecordStore::load(slot);
        assert!(loaded.is_ok());
        assert_eq!(reloaded.list(), [school("A")]);
    }

    #[test]
    fn test_oak_elementary_scenario() {
        let oak = School {
            name: "Oak Elementary".to_string(),
            address: "12 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            contact: "5551234567".to_string(),
            email_id: "office@oak.edu".to_string(),
            image: None,
        };

        let mut store = empty_store();
        store.append(oak.clone()).unwrap();

        assert_eq!(store.list(), [oak.clone()]);
        let persisted: serde_json::Value =
            serde_json::from_str(store.slot().value().unwrap()).unwrap();
        let array = persisted.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["name"], "Oak Elementary");
        assert_eq!(array[0]["email_id"], "office@oak.edu");
        assert!(array[0]["image"].is_null());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut with_image = school("B");
        with_image.image = Some("file:///tmp/b.png#blake3=0123456789abcdef".to_string());
        let schools = vec![school("A"), with_image];

        let decoded = decode("schools", &encode(&schools).unwrap()).unwrap();
        assert_eq!(decoded, schools);
    }
}
