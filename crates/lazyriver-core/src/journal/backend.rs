//! Persistence seam for the journal document.
//!
//! A backend stores one opaque JSON string under [`STORE_KEY`](super::STORE_KEY).
//! Decoding and the corruption fallback live in the store, so every backend
//! gets the same recovery behaviour.

use std::sync::Mutex;

use crate::error::{DatabaseError, Result};

pub trait JournalBackend {
    /// Raw stored document, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored document.
    fn save(&self, document: &str) -> Result<()>;

    /// Remove the stored document entirely.
    fn clear(&self) -> Result<()>;
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with arbitrary raw contents, corrupt or not.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// The raw stored value.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl JournalBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        let slot = self.slot.lock().map_err(|_| DatabaseError::Poisoned)?;
        Ok(slot.clone())
    }

    fn save(&self, document: &str) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| DatabaseError::Poisoned)?;
        *slot = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| DatabaseError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

impl<B: JournalBackend + ?Sized> JournalBackend for &B {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, document: &str) -> Result<()> {
        (**self).save(document)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
