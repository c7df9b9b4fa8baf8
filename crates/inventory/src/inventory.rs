use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Entity};

use crate::item::{Item, ItemDraft, ItemId};
use crate::listing::Listing;
use crate::money::Money;

/// How callers address items for removal.
///
/// `StableId` is the current policy. `Positional` is kept for the legacy
/// process-wide inventory, where the listing shows positions instead of ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Addressing {
    StableId,
    Positional,
}

/// A caller-supplied reference to one item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRef {
    Id(ItemId),
    Position(usize),
}

impl core::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ItemRef::Id(id) => write!(f, "id {id}"),
            ItemRef::Position(p) => write!(f, "position {p}"),
        }
    }
}

/// Aggregate root: Inventory.
///
/// Ordered oldest-first. Ids come from `next_id`, which only ever moves
/// forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    addressing: Addressing,
    items: Vec<Item>,
    next_id: ItemId,
    version: u64,
}

impl Inventory {
    pub fn new(addressing: Addressing) -> Self {
        Self {
            addressing,
            items: Vec::new(),
            next_id: ItemId::FIRST,
            version: 0,
        }
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next added item will receive.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Read-only view of the current items with their total value.
    pub fn list(&self) -> Listing<'_> {
        Listing::of(&self.items, self.addressing)
    }

    /// Σ quantity × unit_price, recomputed on every call.
    pub fn total_value(&self) -> Money {
        total_of(&self.items)
    }

    /// Validate-then-append. On success the confirmation names the new item.
    pub fn add_item(&mut self, draft: ItemDraft) -> DomainResult<Confirmation> {
        let command = InventoryCommand::AddItem(AddItem {
            draft,
            occurred_at: Utc::now(),
        });
        self.submit(&command)
    }

    /// Remove by reference. See [`RemoveItem`] for the per-policy rules.
    pub fn remove_item(&mut self, target: ItemRef) -> DomainResult<Confirmation> {
        let command = InventoryCommand::RemoveItem(RemoveItem {
            target,
            occurred_at: Utc::now(),
        });
        self.submit(&command)
    }

    /// Execute a command and describe the outcome for the user.
    pub fn submit(&mut self, command: &InventoryCommand) -> DomainResult<Confirmation> {
        let events = match self.execute(command) {
            Ok(events) => events,
            Err(e) => {
                tracing::debug!(error = %e, "inventory command rejected");
                return Err(e);
            }
        };

        let message = match (command, events.first()) {
            (_, Some(event)) => self.describe(event),
            (InventoryCommand::RemoveItem(cmd), None) => {
                format!("No item with {}; nothing was removed.", cmd.target)
            }
            (InventoryCommand::AddItem(_), None) => "Nothing was added.".to_string(),
        };

        for event in &events {
            tracing::info!(
                event_type = event.event_type(),
                item_id = %event.item().id(),
                occurred_at = %event.occurred_at(),
                version = self.version,
                "inventory changed"
            );
        }

        Ok(Confirmation { message, events })
    }

    fn describe(&self, event: &InventoryEvent) -> String {
        match (event, self.addressing) {
            (InventoryEvent::ItemAdded(e), Addressing::StableId) => {
                format!("Added '{}' (id {}) to the inventory.", e.item.name(), e.item.id())
            }
            (InventoryEvent::ItemAdded(e), Addressing::Positional) => {
                format!("Added '{}' to the inventory.", e.item.name())
            }
            (InventoryEvent::ItemRemoved(e), _) => {
                format!("Removed '{}' from the inventory.", e.item.name())
            }
        }
    }

    fn position_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<InventoryEvent>, DomainError> {
        let item = Item::from_draft(self.next_id, cmd.draft.clone(), cmd.occurred_at);

        let line = cmd
            .draft
            .unit_price()
            .checked_mul(cmd.draft.quantity())
            .ok_or_else(|| DomainError::invariant("line value is too large"))?;
        self.total_value()
            .checked_add(line)
            .ok_or_else(|| DomainError::invariant("total inventory value is too large"))?;

        Ok(vec![InventoryEvent::ItemAdded(ItemAdded {
            item,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<InventoryEvent>, DomainError> {
        let position = match (cmd.target, self.addressing) {
            (ItemRef::Id(id), Addressing::StableId) => match self.position_of(id) {
                Some(p) => p,
                // Unmatched ids are a successful no-op.
                None => return Ok(Vec::new()),
            },
            (ItemRef::Position(p), Addressing::Positional) => {
                if p >= self.items.len() {
                    return Err(DomainError::invalid_reference(format!(
                        "position {p} is out of range (inventory has {} items)",
                        self.items.len()
                    )));
                }
                p
            }
            (target, addressing) => {
                return Err(DomainError::invalid_reference(format!(
                    "{target} cannot address an inventory using {addressing:?} addressing"
                )));
            }
        };

        Ok(vec![InventoryEvent::ItemRemoved(ItemRemoved {
            item: self.items[position].clone(),
            position,
            occurred_at: cmd.occurred_at,
        })])
    }
}

pub(crate) fn total_of(items: &[Item]) -> Money {
    items
        .iter()
        .fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.line_value()).unwrap_or(Money::from_cents(i64::MAX))
        })
}

impl AggregateRoot for Inventory {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItem {
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
///
/// - `Id` against a stable-id inventory: removes the match, or does nothing
///   (successfully) when no item has that id.
/// - `Position` against a positional inventory: must be `< len`, otherwise
///   rejected with [`DomainError::InvalidReference`].
/// - Any other pairing is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveItem {
    pub target: ItemRef,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: Item,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item: Item,
    /// Position the item held just before removal.
    pub position: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    ItemRemoved(ItemRemoved),
}

impl InventoryEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::ItemRemoved(_) => "inventory.item.removed",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::ItemRemoved(e) => e.occurred_at,
        }
    }

    pub fn item(&self) -> &Item {
        match self {
            InventoryEvent::ItemAdded(e) => &e.item,
            InventoryEvent::ItemRemoved(e) => &e.item,
        }
    }
}

impl Aggregate for Inventory {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                let id = e.item.id();
                self.items.push(e.item.clone());
                if id >= self.next_id {
                    self.next_id = id.next();
                }
            }
            InventoryEvent::ItemRemoved(e) => {
                if let Some(p) = self.position_of(e.item.id()) {
                    self.items.remove(p);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::RemoveItem(cmd) => self.handle_remove(cmd),
        }
    }
}

/// Outcome of an accepted command: the applied events and a user-facing
/// message derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub message: String,
    pub events: Vec<InventoryEvent>,
}

impl Confirmation {
    pub fn added(&self) -> Option<&Item> {
        self.events.iter().find_map(|e| match e {
            InventoryEvent::ItemAdded(a) => Some(&a.item),
            _ => None,
        })
    }

    pub fn removed(&self) -> Option<&Item> {
        self.events.iter().find_map(|e| match e {
            InventoryEvent::ItemRemoved(r) => Some(&r.item),
            _ => None,
        })
    }

    /// `true` when the command changed nothing (unmatched id removal).
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }
}
