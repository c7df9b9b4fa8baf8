use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use stockroom_core::SessionId;
use stockroom_inventory::{Addressing, Inventory};

#[derive(Debug)]
struct SessionSlot {
    inventory: Inventory,
    last_seen: Instant,
}

impl SessionSlot {
    fn fresh(now: Instant) -> Self {
        Self {
            inventory: Inventory::new(Addressing::StableId),
            last_seen: now,
        }
    }

    fn is_expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
    }
}

/// In-memory, session-isolated inventories.
///
/// Each session owns exactly one stable-id inventory. A session ends when it
/// is explicitly ended or after `idle_timeout` without access; its inventory
/// is dropped with it.
#[derive(Debug)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionId, SessionSlot>>,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Begin a new session with an empty inventory.
    pub fn start(&self) -> SessionId {
        let id = SessionId::new();
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(id, SessionSlot::fresh(Instant::now()));
        tracing::info!(session_id = %id, "session started");
        id
    }

    pub fn is_live(&self, id: SessionId) -> bool {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&id)
            .is_some_and(|slot| !slot.is_expired(Instant::now(), self.idle_timeout))
    }

    /// Resolve the presented id and run `f` against that session's inventory,
    /// both under one write lock. Returns the id actually used.
    ///
    /// A live id is kept and marked as used. Missing, ended, or expired ids
    /// get a brand-new session; client-chosen ids are never adopted, and an
    /// id removed by `end` or `sweep` never comes back.
    pub fn with_session<R>(
        &self,
        presented: Option<SessionId>,
        f: impl FnOnce(&mut Inventory) -> R,
    ) -> (SessionId, R) {
        let now = Instant::now();
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(id) = presented {
            let expired = map
                .get(&id)
                .is_some_and(|slot| slot.is_expired(now, self.idle_timeout));
            if expired {
                map.remove(&id);
                tracing::info!(session_id = %id, "session expired");
            }
        }

        let live = presented.filter(|id| map.contains_key(id));
        if live.is_none() {
            if let Some(id) = presented {
                tracing::debug!(session_id = %id, "presented session is not live");
            }
        }

        let id = live.unwrap_or_else(SessionId::new);
        let slot = map.entry(id).or_insert_with(|| {
            tracing::info!(session_id = %id, "session started");
            SessionSlot::fresh(now)
        });
        slot.last_seen = now;

        (id, f(&mut slot.inventory))
    }

    /// End a session, discarding its inventory. Returns whether it existed.
    pub fn end(&self, id: SessionId) -> bool {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let existed = map.remove(&id).is_some();
        if existed {
            tracing::info!(session_id = %id, "session ended");
        }
        existed
    }

    /// Drop every session idle for at least the timeout, as of `now`.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.retain(|_, slot| !slot.is_expired(now, self.idle_timeout));
        let removed = before - map.len();
        if removed > 0 {
            tracing::info!(removed, remaining = map.len(), "expired sessions swept");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_inventory::{ItemDraft, ItemId, ItemRef, Money};

    fn draft(name: &str) -> ItemDraft {
        ItemDraft::new(name, 1, Money::from_cents(100)).unwrap()
    }

    #[test]
    fn sessions_are_isolated() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let a = store.start();
        let b = store.start();

        store.with_session(Some(a), |inv| inv.add_item(draft("A")).unwrap());

        assert_eq!(store.with_session(Some(a), |inv| inv.len()), (a, 1));
        assert_eq!(store.with_session(Some(b), |inv| inv.len()), (b, 0));
    }

    #[test]
    fn inventory_persists_across_accesses_within_a_session() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = Some(store.start());

        store.with_session(id, |inv| inv.add_item(draft("A")).unwrap());
        store.with_session(id, |inv| inv.add_item(draft("B")).unwrap());
        store.with_session(id, |inv| inv.remove_item(ItemRef::Id(ItemId::new(1))).unwrap());
        let (_, c) = store.with_session(id, |inv| inv.add_item(draft("C")).unwrap());

        assert_eq!(c.added().unwrap().name(), "C");
        assert_eq!(store.with_session(id, |inv| inv.next_id()).1, ItemId::new(4));
    }

    #[test]
    fn unknown_ids_are_replaced_not_adopted() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));

        let stranger = SessionId::new();
        let (issued, _) = store.with_session(Some(stranger), |_| ());
        assert_ne!(issued, stranger);
        assert!(store.is_live(issued));
        assert!(!store.is_live(stranger));

        let (fresh, _) = store.with_session(None, |_| ());
        assert!(store.is_live(fresh));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ending_a_session_discards_its_inventory() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = store.start();
        store.with_session(Some(id), |inv| inv.add_item(draft("A")).unwrap());

        assert!(store.end(id));
        assert!(!store.end(id));
        assert!(!store.is_live(id));
    }

    #[test]
    fn ended_id_is_not_revived_by_a_later_access() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = store.start();
        store.with_session(Some(id), |inv| inv.add_item(draft("A")).unwrap());
        store.end(id);

        let (issued, len) = store.with_session(Some(id), |inv| inv.len());

        assert_ne!(issued, id);
        assert_eq!(len, 0);
        assert!(!store.is_live(id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_drops_idle_sessions() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        store.start();
        store.start();

        assert_eq!(store.sweep(Instant::now()), 0);
        assert_eq!(store.sweep(Instant::now() + Duration::from_secs(61)), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn expired_session_is_replaced_on_access() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let id = store.start();

        // Zero timeout: every access finds the slot already expired.
        assert!(!store.is_live(id));
        let (issued, len) = store.with_session(Some(id), |inv| inv.len());
        assert_ne!(issued, id);
        assert_eq!(len, 0);
        assert_eq!(store.len(), 1);
    }
}
