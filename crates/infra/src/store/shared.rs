use std::sync::{Mutex, PoisonError};

use stockroom_inventory::{Addressing, Inventory};

/// One process-wide inventory shared by every caller.
///
/// Legacy scope: there is no isolation between users, and items are
/// addressed by position. Contents last as long as the process.
#[derive(Debug)]
pub struct SharedInventory {
    inner: Mutex<Inventory>,
}

impl SharedInventory {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inventory::new(Addressing::Positional)),
        }
    }

    pub fn with_inventory<R>(&self, f: impl FnOnce(&mut Inventory) -> R) -> R {
        let mut inv = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut inv)
    }
}

impl Default for SharedInventory {
    fn default() -> Self {
        Self::new()
    }
}
