use super::{KvStore, StoreResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-process `KvStore` used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save_raw` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl KvStore for MemoryKvStore {
    fn load_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
