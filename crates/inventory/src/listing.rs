//! Read-only views over an inventory's items.

use core::iter::Enumerate;
use core::slice;

use stockroom_core::Entity;

use crate::inventory::{Addressing, ItemRef, total_of};
use crate::item::Item;
use crate::money::Money;

/// Current contents of an inventory, oldest item first.
///
/// `Empty` is its own variant so renderers can show a dedicated message
/// instead of an empty table. Both variants answer [`Listing::iter`] and
/// [`Listing::total_value`], so callers that don't care can treat them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'a> {
    Empty,
    Populated(ItemsView<'a>),
}

impl<'a> Listing<'a> {
    pub(crate) fn of(items: &'a [Item], addressing: Addressing) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Populated(ItemsView { items, addressing })
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Empty => 0,
            Listing::Populated(view) => view.len(),
        }
    }

    /// Restartable: every call yields a fresh iterator from the first item.
    pub fn iter(&self) -> Entries<'a> {
        match self {
            Listing::Empty => {
                let none: &'a [Item] = &[];
                Entries {
                    inner: none.iter().enumerate(),
                    addressing: Addressing::StableId,
                }
            }
            Listing::Populated(view) => view.iter(),
        }
    }

    pub fn total_value(&self) -> Money {
        match self {
            Listing::Empty => Money::ZERO,
            Listing::Populated(view) => view.total_value(),
        }
    }
}

/// Non-empty borrowed view of the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemsView<'a> {
    items: &'a [Item],
    addressing: Addressing,
}

impl<'a> ItemsView<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> Entries<'a> {
        Entries {
            inner: self.items.iter().enumerate(),
            addressing: self.addressing,
        }
    }

    pub fn total_value(&self) -> Money {
        total_of(self.items)
    }
}

/// Iterator over [`Entry`] values.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: Enumerate<slice::Iter<'a, Item>>,
    addressing: Addressing,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let addressing = self.addressing;
        self.inner
            .next()
            .map(|(position, item)| Entry { position, item, addressing })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// One listed item together with its current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    position: usize,
    item: &'a Item,
    addressing: Addressing,
}

impl<'a> Entry<'a> {
    pub fn item(&self) -> &'a Item {
        self.item
    }

    /// Zero-based position in this listing. Only valid until the next removal.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The reference a caller should send back to remove this entry.
    pub fn reference(&self) -> ItemRef {
        match self.addressing {
            Addressing::StableId => ItemRef::Id(self.item.id()),
            Addressing::Positional => ItemRef::Position(self.position),
        }
    }

    /// Label for a removal picker, e.g. `ID 3: Widget (quantity: 5)`.
    pub fn label(&self) -> String {
        let key = match self.reference() {
            ItemRef::Id(id) => id.get(),
            ItemRef::Position(p) => p as u64,
        };
        format!("ID {key}: {} (quantity: {})", self.item.name(), self.item.quantity())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Addressing, Inventory, ItemDraft, ItemId, ItemRef, Money};

    fn stocked(addressing: Addressing) -> Inventory {
        let mut inv = Inventory::new(addressing);
        inv.add_item(ItemDraft::new("Bolt", 100, Money::from_cents(5)).unwrap())
            .unwrap();
        inv.add_item(ItemDraft::new("Nut", 50, Money::from_cents(10)).unwrap())
            .unwrap();
        inv
    }

    #[test]
    fn empty_inventory_lists_as_empty() {
        let inv = Inventory::new(Addressing::StableId);
        let listing = inv.list();

        assert!(listing.is_empty());
        assert_eq!(listing, super::Listing::Empty);
        assert_eq!(listing.iter().count(), 0);
        assert_eq!(listing.total_value(), Money::ZERO);
    }

    #[test]
    fn listing_is_restartable_and_idempotent() {
        let inv = stocked(Addressing::StableId);
        let listing = inv.list();

        let first: Vec<_> = listing.iter().collect();
        let second: Vec<_> = listing.iter().collect();
        assert_eq!(first, second);
        assert_eq!(listing.iter().len(), 2);

        assert_eq!(inv.list(), inv.list());
        assert_eq!(inv.list().total_value(), inv.list().total_value());
    }

    #[test]
    fn entries_reference_by_policy() {
        let inv = stocked(Addressing::StableId);
        let refs: Vec<_> = inv.list().iter().map(|e| e.reference()).collect();
        assert_eq!(refs, vec![ItemRef::Id(ItemId::new(1)), ItemRef::Id(ItemId::new(2))]);

        let inv = stocked(Addressing::Positional);
        let refs: Vec<_> = inv.list().iter().map(|e| e.reference()).collect();
        assert_eq!(refs, vec![ItemRef::Position(0), ItemRef::Position(1)]);
    }

    #[test]
    fn labels_match_picker_format() {
        let mut inv = stocked(Addressing::StableId);
        inv.remove_item(ItemRef::Id(ItemId::new(1))).unwrap();

        let labels: Vec<_> = inv.list().iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["ID 2: Nut (quantity: 50)"]);

        let inv = stocked(Addressing::Positional);
        let labels: Vec<_> = inv.list().iter().map(|e| e.label()).collect();
        assert_eq!(labels[1], "ID 1: Nut (quantity: 50)");
    }
}
