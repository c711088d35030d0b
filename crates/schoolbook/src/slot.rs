//! Persistence slots.
//!
//! A slot is a single named entry that holds one serialized value. It is read
//! once when a session starts and overwritten whole after every change. Slots
//! make no transactional promise relative to the in-memory state they mirror.

use crate::error::Result;

/// A single named key-value entry.
pub trait Slot {
    /// The name of the slot (for logging/debugging).
    fn key(&self) -> &str;

    /// Read the stored value, or `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, value: &str) -> Result<()>;

    /// Remove the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&mut self) -> Result<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        (**self).write(value)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// A slot that lives only as long as the process.
///
/// Used when no database is available, so a session can still run without
/// a durable mirror.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    key: String,
    value: Option<String>,
}

impl MemorySlot {
    /// Create an empty slot named `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Create a slot named `key` that already holds `value`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// The value currently held, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Slot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot_starts_empty() {
        let slot = MemorySlot::new("schools");
        assert_eq!(slot.key(), "schools");
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_memory_slot_write_read_clear() {
        let mut slot = MemorySlot::new("schools");
        slot.write("[]").unwrap();
        assert_eq!(slot.value(), Some("[]"));

        slot.clear().unwrap();
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn test_boxed_slot_delegates() {
        let mut slot: Box<dyn Slot> = Box::new(MemorySlot::new("schools"));
        slot.write("[]").unwrap();
        assert_eq!(slot.key(), "schools");
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_slot_with_value() {
        let slot = MemorySlot::with_value("schools", "{}");
        assert_eq!(slot.read().unwrap().as_deref(), Some("{}"));
    }
}
