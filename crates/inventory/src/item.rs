use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Violation, Violations};

use crate::money::{Money, MoneyParseError};

/// Stable item identifier, unique within one inventory and never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// First identifier handed out by an empty inventory.
    pub const FIRST: ItemId = ItemId(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("ItemId: {e}")))
    }
}

/// One tracked stock-keeping record.
///
/// Items are immutable once stored; the only state changes are whole-item
/// insertion and removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: i64,
    unit_price: Money,
    added_at: DateTime<Utc>,
}

impl Item {
    pub(crate) fn from_draft(id: ItemId, draft: ItemDraft, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            added_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// `quantity × unit_price`.
    ///
    /// Cannot overflow for stored items; the add path rejects candidates
    /// whose line value does not fit.
    pub fn line_value(&self) -> Money {
        self.unit_price
            .checked_mul(self.quantity)
            .unwrap_or(Money::from_cents(i64::MAX))
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

/// A validated add-item candidate.
///
/// The only way to obtain one is through [`ItemDraft::new`] or
/// [`ItemDraft::parse`], so every draft already satisfies the item rules:
/// trimmed non-empty name, `quantity > 0`, `unit_price > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDraft {
    name: String,
    quantity: i64,
    unit_price: Money,
}

impl ItemDraft {
    /// Validate typed input. All fields are checked and every violation is
    /// reported together.
    pub fn new(name: &str, quantity: i64, unit_price: Money) -> DomainResult<Self> {
        Self::build(name, quantity, Ok(unit_price))
    }

    /// Validate raw form input where the price is still decimal text.
    pub fn parse(name: &str, quantity: i64, unit_price: &str) -> DomainResult<Self> {
        Self::build(name, quantity, Money::parse_decimal(unit_price))
    }

    fn build(
        name: &str,
        quantity: i64,
        unit_price: Result<Money, MoneyParseError>,
    ) -> DomainResult<Self> {
        let mut violations = Violations::new();

        let name = name.trim();
        if name.is_empty() {
            violations.push(Violation::new("name", "name must not be empty"));
        }

        if quantity <= 0 {
            violations.push(Violation::new("quantity", "quantity must be greater than 0"));
        }

        let unit_price = match unit_price {
            Ok(price) if price.is_positive() => Some(price),
            Ok(_) => {
                violations.push(Violation::new("unit_price", "unit price must be greater than 0"));
                None
            }
            Err(e) => {
                violations.push(Violation::new("unit_price", format!("unit price {e}")));
                None
            }
        };

        violations.into_result()?;
        let unit_price = unit_price
            .ok_or_else(|| DomainError::validation("unit_price", "unit price is required"))?;

        Ok(Self {
            name: name.to_string(),
            quantity,
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}
