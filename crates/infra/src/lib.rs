//! Infrastructure layer: inventory storage and background workers.

pub mod store;
pub mod workers;

pub use store::{InMemorySessionStore, InventoryScope, InventoryStore, SharedInventory, UnknownScope};
pub use workers::{SessionSweeper, WorkerHandle};
