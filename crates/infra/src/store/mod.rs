//! Where inventories live between requests.

use core::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::SessionId;
use stockroom_inventory::Inventory;

pub mod session_store;
pub mod shared;

pub use session_store::InMemorySessionStore;
pub use shared::SharedInventory;

/// Lifetime/ownership model for inventories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryScope {
    /// One inventory per session, stable-id addressing.
    Session,
    /// One process-wide inventory, positional addressing.
    Shared,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown inventory scope '{0}' (expected 'session' or 'shared')")]
pub struct UnknownScope(pub String);

impl FromStr for InventoryScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "session" => Ok(InventoryScope::Session),
            "shared" => Ok(InventoryScope::Shared),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

impl core::fmt::Display for InventoryScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            InventoryScope::Session => "session",
            InventoryScope::Shared => "shared",
        })
    }
}

/// Store selected by [`InventoryScope`].
#[derive(Debug, Clone)]
pub enum InventoryStore {
    Session(Arc<InMemorySessionStore>),
    Shared(Arc<SharedInventory>),
}

impl InventoryStore {
    pub fn new(scope: InventoryScope, idle_timeout: Duration) -> Self {
        match scope {
            InventoryScope::Session => {
                InventoryStore::Session(Arc::new(InMemorySessionStore::new(idle_timeout)))
            }
            InventoryScope::Shared => {
                tracing::warn!("using the shared inventory: all callers see and modify the same items");
                InventoryStore::Shared(Arc::new(SharedInventory::new()))
            }
        }
    }

    pub fn scope(&self) -> InventoryScope {
        match self {
            InventoryStore::Session(_) => InventoryScope::Session,
            InventoryStore::Shared(_) => InventoryScope::Shared,
        }
    }

    /// Begin a session. In shared scope this only mints an id.
    pub fn start_session(&self) -> SessionId {
        match self {
            InventoryStore::Session(store) => store.start(),
            InventoryStore::Shared(_) => SessionId::new(),
        }
    }

    /// End a session. Always `false` in shared scope.
    pub fn end_session(&self, id: SessionId) -> bool {
        match self {
            InventoryStore::Session(store) => store.end(id),
            InventoryStore::Shared(_) => false,
        }
    }

    /// See [`InMemorySessionStore::with_session`]. Shared scope keeps
    /// whatever was presented, since the id selects nothing.
    pub fn with_session<R>(
        &self,
        presented: Option<SessionId>,
        f: impl FnOnce(&mut Inventory) -> R,
    ) -> (SessionId, R) {
        match self {
            InventoryStore::Session(store) => store.with_session(presented, f),
            InventoryStore::Shared(shared) => (presented.unwrap_or_default(), shared.with_inventory(f)),
        }
    }

    /// The session store, when sessions are tracked at all.
    pub fn sessions(&self) -> Option<&Arc<InMemorySessionStore>> {
        match self {
            InventoryStore::Session(store) => Some(store),
            InventoryStore::Shared(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::{Addressing, ItemDraft, Money};

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("Session".parse::<InventoryScope>(), Ok(InventoryScope::Session));
        assert_eq!(" shared ".parse::<InventoryScope>(), Ok(InventoryScope::Shared));
        assert!("global".parse::<InventoryScope>().is_err());
    }

    #[test]
    fn scope_selects_addressing() {
        let store = InventoryStore::new(InventoryScope::Session, Duration::from_secs(60));
        let id = store.start_session();
        assert_eq!(store.with_session(Some(id), |inv| inv.addressing()).1, Addressing::StableId);

        let store = InventoryStore::new(InventoryScope::Shared, Duration::from_secs(60));
        let id = store.start_session();
        assert_eq!(store.with_session(Some(id), |inv| inv.addressing()).1, Addressing::Positional);
        assert!(store.sessions().is_none());
    }

    #[test]
    fn shared_scope_ignores_session_boundaries() {
        let store = InventoryStore::new(InventoryScope::Shared, Duration::from_secs(60));
        let a = store.start_session();
        let b = store.start_session();

        store.with_session(Some(a), |inv| {
            inv.add_item(ItemDraft::new("A", 1, Money::from_cents(1)).unwrap())
                .unwrap()
        });

        assert_eq!(store.with_session(Some(b), |inv| inv.len()), (b, 1));
        assert!(!store.end_session(a));
    }
}
