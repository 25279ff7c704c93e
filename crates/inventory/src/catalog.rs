//! Catalog port and the in-memory reference implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use common::{ItemId, Money, PartNumber, Quantity, Unit};

use crate::error::{InventoryError, Result};

/// A stock-keeping catalog item.
///
/// Catalog entries are read-mostly: stock activity never mutates them, only
/// catalog maintenance does. Retiring an item keeps it readable so that its
/// ledger history stays auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,

    /// Human-readable name.
    pub name: String,

    /// Manufacturer part number, unique within the catalog.
    pub part_number: PartNumber,

    /// Unit of measure. Immutable after creation: changing it would
    /// reinterpret every historical quantity of the item.
    pub unit: Unit,

    /// Price per unit.
    pub unit_price: Money,

    /// Threshold below which the item counts as low stock.
    pub min_level: Quantity,

    /// True once the item has been retired (soft delete).
    pub retired: bool,

    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Builds a new active catalog item, validating price and minimum level.
    pub fn new(
        name: impl Into<String>,
        part_number: impl Into<PartNumber>,
        unit: Unit,
        unit_price: Money,
        min_level: Quantity,
    ) -> Result<Self> {
        if unit_price.is_negative() {
            return Err(InventoryError::NegativePrice { price: unit_price });
        }
        if min_level.is_negative() {
            return Err(InventoryError::NegativeMinLevel { min_level });
        }
        if !unit.accepts(min_level) {
            return Err(InventoryError::QuantityPrecision {
                quantity: min_level,
                unit,
            });
        }

        Ok(Self {
            id: ItemId::new(),
            name: name.into(),
            part_number: part_number.into(),
            unit,
            unit_price,
            min_level,
            retired: false,
            created_at: Utc::now(),
        })
    }

    /// Returns true if the item accepts mutations (not retired).
    pub fn is_active(&self) -> bool {
        !self.retired
    }
}

/// Catalog port.
///
/// Implementations must keep part numbers unique across non-removed items
/// and must be thread-safe. Stock activity only ever calls `get`/`list`;
/// the remaining operations are catalog maintenance.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks up an item by ID, retired or not.
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// Returns all items in creation order, retired ones included.
    async fn list(&self) -> Result<Vec<Item>>;

    /// Inserts a new item, rejecting duplicate part numbers.
    async fn insert(&self, item: Item) -> Result<()>;

    /// Replaces an existing item by ID.
    async fn update(&self, item: Item) -> Result<()>;

    /// Physically removes an item. Callers are responsible for only doing
    /// this when the item has no ledger history.
    async fn remove(&self, item_id: ItemId) -> Result<()>;
}

/// In-memory catalog for tests and the reference deployment.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<RwLock<Vec<Item>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items, retired ones included.
    pub async fn item_count(&self) -> usize {
        self.items.read().await.len()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Item>> {
        Ok(self.items.read().await.clone())
    }

    async fn insert(&self, item: Item) -> Result<()> {
        let mut items = self.items.write().await;
        if items.iter().any(|i| i.part_number == item.part_number) {
            return Err(InventoryError::DuplicatePartNumber {
                part_number: item.part_number,
            });
        }
        items.push(item);
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<()> {
        let mut items = self.items.write().await;
        if items
            .iter()
            .any(|i| i.id != item.id && i.part_number == item.part_number)
        {
            return Err(InventoryError::DuplicatePartNumber {
                part_number: item.part_number,
            });
        }
        let existing = items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or(InventoryError::UnknownItem { item_id: item.id })?;
        *existing = item;
        Ok(())
    }

    async fn remove(&self, item_id: ItemId) -> Result<()> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Err(InventoryError::UnknownItem { item_id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_item() -> Item {
        Item::new(
            "Pleated filter 16x25",
            "FLT-1625",
            Unit::Piece,
            Money::from_cents(899),
            Quantity::from_whole(10),
        )
        .unwrap()
    }

    #[test]
    fn new_item_rejects_negative_price() {
        let result = Item::new(
            "Filter",
            "FLT-1",
            Unit::Piece,
            Money::from_cents(-1),
            Quantity::zero(),
        );
        assert!(matches!(result, Err(InventoryError::NegativePrice { .. })));
    }

    #[test]
    fn new_item_rejects_min_level_precision_mismatch() {
        let result = Item::new(
            "Refrigerant R410A",
            "REF-410",
            Unit::Kilogram,
            Money::from_cents(4500),
            Quantity::from_thousandths(1_550),
        );
        assert!(matches!(
            result,
            Err(InventoryError::QuantityPrecision { .. })
        ));
    }

    #[tokio::test]
    async fn insert_and_get() {
        let catalog = InMemoryCatalog::new();
        let item = filter_item();
        let item_id = item.id;

        catalog.insert(item.clone()).await.unwrap();

        let fetched = catalog.get(item_id).await.unwrap().unwrap();
        assert_eq!(fetched, item);
        assert!(catalog.get(ItemId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_part_number() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(filter_item()).await.unwrap();

        let result = catalog.insert(filter_item()).await;
        assert!(matches!(
            result,
            Err(InventoryError::DuplicatePartNumber { .. })
        ));
        assert_eq!(catalog.item_count().await, 1);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let catalog = InMemoryCatalog::new();
        let mut item = filter_item();
        catalog.insert(item.clone()).await.unwrap();

        item.name = "Pleated filter 16x25 MERV 11".to_string();
        item.unit_price = Money::from_cents(1099);
        catalog.update(item.clone()).await.unwrap();

        let fetched = catalog.get(item.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Pleated filter 16x25 MERV 11");
        assert_eq!(fetched.unit_price, Money::from_cents(1099));
    }

    #[tokio::test]
    async fn update_rejects_part_number_collision() {
        let catalog = InMemoryCatalog::new();
        let item_a = filter_item();
        let item_b = Item::new(
            "Run capacitor 35/5",
            "CAP-355",
            Unit::Piece,
            Money::from_cents(1250),
            Quantity::from_whole(4),
        )
        .unwrap();
        catalog.insert(item_a.clone()).await.unwrap();
        catalog.insert(item_b.clone()).await.unwrap();

        let mut renamed = item_b.clone();
        renamed.part_number = item_a.part_number.clone();
        let result = catalog.update(renamed).await;
        assert!(matches!(
            result,
            Err(InventoryError::DuplicatePartNumber { .. })
        ));
    }

    #[tokio::test]
    async fn remove_deletes_and_rejects_unknown() {
        let catalog = InMemoryCatalog::new();
        let item = filter_item();
        let item_id = item.id;
        catalog.insert(item).await.unwrap();

        catalog.remove(item_id).await.unwrap();
        assert_eq!(catalog.item_count().await, 0);

        let result = catalog.remove(item_id).await;
        assert!(matches!(result, Err(InventoryError::UnknownItem { .. })));
    }

    #[tokio::test]
    async fn list_preserves_creation_order() {
        let catalog = InMemoryCatalog::new();
        let item_a = filter_item();
        let item_b = Item::new(
            "Copper pipe 3/8",
            "PIP-38",
            Unit::Meter,
            Money::from_cents(320),
            Quantity::from_whole(25),
        )
        .unwrap();
        catalog.insert(item_a.clone()).await.unwrap();
        catalog.insert(item_b.clone()).await.unwrap();

        let listed = catalog.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, item_a.id);
        assert_eq!(listed[1].id, item_b.id);
    }
}
