//! Inventory domain module.
//!
//! Business rules for the inventory, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod inventory;
pub mod item;
pub mod listing;
pub mod money;

pub use inventory::{
    AddItem, Addressing, Confirmation, Inventory, InventoryCommand, InventoryEvent, ItemAdded,
    ItemRef, ItemRemoved, RemoveItem,
};
pub use item::{Item, ItemDraft, ItemId};
pub use listing::{Entries, Entry, ItemsView, Listing};
pub use money::{Money, MoneyParseError};
