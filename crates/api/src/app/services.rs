use std::time::Duration;

use serde_json::Value;

use stockroom_core::{DomainError, SessionId};
use stockroom_infra::{InventoryScope, InventoryStore, SessionSweeper, WorkerHandle};
use stockroom_inventory::{Addressing, Inventory, ItemId, ItemRef};

use crate::app::dto;
use crate::config::ApiConfig;

/// Shared per-process state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppServices {
    store: InventoryStore,
    currency: String,
}

impl AppServices {
    pub fn new(scope: InventoryScope, session_idle: Duration, currency: impl Into<String>) -> Self {
        Self {
            store: InventoryStore::new(scope, session_idle),
            currency: currency.into(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.scope, config.session_idle, config.currency.clone())
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Start the idle-session sweeper. `None` in shared scope.
    pub fn spawn_sweeper(&self, interval: Duration) -> Option<WorkerHandle> {
        let sessions = self.store.sessions()?.clone();
        SessionSweeper::spawn(sessions, interval)
    }

    /// Each operation resolves the presented session and touches its
    /// inventory under one lock, and returns the session actually used.
    pub fn listing(&self, presented: Option<SessionId>) -> (SessionId, Value) {
        self.store
            .with_session(presented, |inv| dto::listing_to_json(inv, &self.currency))
    }

    /// Add an item and return the confirmation together with the fresh
    /// listing, both taken under the same lock.
    pub fn add_item(
        &self,
        presented: Option<SessionId>,
        request: dto::AddItemRequest,
    ) -> (SessionId, Result<Value, DomainError>) {
        self.store.with_session(presented, |inv| -> Result<Value, DomainError> {
            let confirmation = inv.add_item(request.into_draft()?)?;
            let item = confirmation
                .added()
                .zip(newest_reference(inv))
                .map(|(item, reference)| dto::item_to_json(item, reference, &self.currency));

            Ok(serde_json::json!({
                "message": confirmation.message,
                "item": item,
                "listing": dto::listing_to_json(inv, &self.currency),
            }))
        })
    }

    /// Remove by the raw path segment, interpreted according to the
    /// inventory's addressing. `removed` is `false` when an unmatched id
    /// made the call a no-op.
    pub fn remove_item(
        &self,
        presented: Option<SessionId>,
        raw_ref: &str,
    ) -> (SessionId, Result<Value, DomainError>) {
        self.store.with_session(presented, |inv| -> Result<Value, DomainError> {
            let target = parse_reference(inv.addressing(), raw_ref)?;
            let confirmation = inv.remove_item(target)?;
            let item = confirmation
                .removed()
                .map(|item| dto::item_to_json(item, target, &self.currency));

            Ok(serde_json::json!({
                "message": confirmation.message,
                "removed": !confirmation.is_noop(),
                "item": item,
                "listing": dto::listing_to_json(inv, &self.currency),
            }))
        })
    }
}

/// How a caller would address the most recently added item.
fn newest_reference(inv: &Inventory) -> Option<ItemRef> {
    inv.list().iter().last().map(|entry| entry.reference())
}

pub fn parse_reference(addressing: Addressing, raw: &str) -> Result<ItemRef, DomainError> {
    match addressing {
        Addressing::StableId => raw.parse::<ItemId>().map(ItemRef::Id),
        Addressing::Positional => {
            let position: i64 = raw
                .trim()
                .parse()
                .map_err(|_| DomainError::invalid_id(format!("'{raw}' is not a valid position")))?;
            // Negative positions are out of range, same as ones past the end.
            usize::try_from(position).map(ItemRef::Position).map_err(|_| {
                DomainError::invalid_reference(format!("position {position} is out of range"))
            })
        }
    }
}
