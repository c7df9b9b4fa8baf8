use serde::Deserialize;
use serde_json::{json, Value};

use stockroom_core::{AggregateRoot, DomainResult};
use stockroom_inventory::{Inventory, Item, ItemDraft, ItemRef, Listing};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /inventory/items`.
///
/// Missing fields are accepted here and rejected by [`ItemDraft`] so the
/// caller gets one violation list instead of a deserializer error.
#[derive(Debug, Default, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Option<PriceInput>,
}

/// Unit price as either a JSON number (`2.5`) or a decimal string (`"2.50"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    pub fn as_text(&self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.clone(),
        }
    }
}

impl AddItemRequest {
    pub fn into_draft(self) -> DomainResult<ItemDraft> {
        let price = self.unit_price.map(|p| p.as_text()).unwrap_or_default();
        ItemDraft::parse(&self.name, self.quantity, &price)
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn item_to_json(item: &Item, reference: ItemRef, currency: &str) -> Value {
    let mut obj = json!({
        "name": item.name(),
        "quantity": item.quantity(),
        "unit_price": item.unit_price().to_string(),
        "unit_price_display": format!("{} {currency}", item.unit_price()),
        "line_value": item.line_value().to_string(),
        "added_at": item.added_at().to_rfc3339(),
    });

    match reference {
        ItemRef::Id(id) => obj["id"] = json!(id.get()),
        ItemRef::Position(p) => obj["position"] = json!(p),
    }

    obj
}

pub fn listing_to_json(inv: &Inventory, currency: &str) -> Value {
    let listing = inv.list();
    let total = listing.total_value();

    let items: Vec<Value> = listing
        .iter()
        .map(|entry| {
            let mut obj = item_to_json(entry.item(), entry.reference(), currency);
            obj["label"] = json!(entry.label());
            obj
        })
        .collect();

    let mut body = json!({
        "status": if listing.is_empty() { "empty" } else { "populated" },
        "items": items,
        "item_count": listing.len(),
        "total_value": total.to_string(),
        "total_value_display": format!("{} {currency}", total.grouped()),
        "version": inv.version(),
    });

    if let Listing::Empty = listing {
        body["message"] = json!("The inventory is empty.");
    }

    body
}
