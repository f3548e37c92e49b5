//! Persisted cart envelope.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cart::pricing::checked_totals;
use crate::cart::LineItem;
use crate::options::CartOptions;

/// Schema version written with every snapshot.
pub(crate) const SNAPSHOT_VERSION: u32 = 1;

/// Borrowed form used for writes.
#[derive(Debug, Serialize)]
pub(crate) struct SnapshotRef<'a> {
    pub version: u32,
    pub items: &'a [LineItem],
    pub updated_at: i64,
}

/// Owned form used for reads.
#[derive(Debug, Deserialize)]
pub(crate) struct Snapshot {
    pub version: u32,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub updated_at: i64,
}

impl Snapshot {
    /// Accept the snapshot only if it satisfies the cart invariants.
    pub(crate) fn into_items(self, options: &CartOptions) -> Result<Vec<LineItem>, String> {
        if self.version != SNAPSHOT_VERSION {
            return Err(format!("unsupported snapshot version {}", self.version));
        }

        let currency = options.currency;
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.product_id.is_blank() {
                return Err("line item without product id".to_string());
            }
            if item.name.trim().is_empty() {
                return Err(format!("line item {} without name", item.product_id));
            }
            if item.quantity < 1 {
                return Err(format!(
                    "non-positive quantity {} for {}",
                    item.quantity, item.product_id
                ));
            }
            if item.quantity > options.max_quantity_per_item {
                return Err(format!(
                    "quantity {} for {} exceeds limit {}",
                    item.quantity, item.product_id, options.max_quantity_per_item
                ));
            }
            if item.price.currency != currency {
                return Err(format!(
                    "{} priced in {}, cart is {}",
                    item.product_id, item.price.currency, currency
                ));
            }
            if !seen.insert(&item.product_id) {
                return Err(format!("duplicate product id {}", item.product_id));
            }
        }

        if checked_totals(self.items.iter().map(|i| (&i.price, i.quantity)), currency).is_none() {
            return Err("cart totals overflow".to_string());
        }

        Ok(self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductSnapshot;
    use crate::money::{Currency, Money};

    fn usd() -> CartOptions {
        CartOptions::default()
    }

    fn item(id: &str, qty: i64) -> LineItem {
        LineItem::from_snapshot(
            &ProductSnapshot::new(id, id, Money::new(100, Currency::USD)),
            qty,
        )
    }

    fn snapshot(items: Vec<LineItem>) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            items,
            updated_at: 0,
        }
    }

    #[test]
    fn test_valid_snapshot_keeps_order() {
        let items = snapshot(vec![item("c", 1), item("a", 2)])
            .into_items(&usd())
            .unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_rejects_duplicates() {
        assert!(snapshot(vec![item("a", 1), item("a", 1)])
            .into_items(&usd())
            .is_err());
    }

    #[test]
    fn test_rejects_zero_quantity() {
        assert!(snapshot(vec![item("a", 0)]).into_items(&usd()).is_err());
    }

    #[test]
    fn test_rejects_foreign_currency() {
        let eur = usd().with_currency(Currency::EUR);
        assert!(snapshot(vec![item("a", 1)]).into_items(&eur).is_err());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut s = snapshot(vec![]);
        s.version = 99;
        assert!(s.into_items(&usd()).is_err());
    }

    #[test]
    fn test_written_shape_reads_back() {
        let items = vec![item("a", 3)];
        let json = serde_json::to_string(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            items: &items,
            updated_at: 17,
        })
        .unwrap();
        let read: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(read.updated_at, 17);
        assert_eq!(read.into_items(&usd()).unwrap(), items);
    }

    #[test]
    fn test_rejects_blank_name() {
        let mut blank = item("a", 1);
        blank.name = " ".to_string();
        assert!(snapshot(vec![blank]).into_items(&usd()).is_err());
    }

    #[test]
    fn test_rejects_quantity_over_limit() {
        assert!(snapshot(vec![item("a", 50_000)]).into_items(&usd()).is_err());
        let roomy = usd().with_max_quantity(50_000);
        assert!(snapshot(vec![item("a", 50_000)]).into_items(&roomy).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_totals() {
        let unlimited = usd().with_max_quantity(i64::MAX);
        let mut free = item("a", i64::MAX);
        free.price = Money::zero(Currency::USD);
        let mut other = item("b", 1);
        other.price = Money::zero(Currency::USD);
        assert!(snapshot(vec![free, other]).into_items(&unlimited).is_err());

        let costly = item("c", i64::MAX / 2);
        assert!(snapshot(vec![costly]).into_items(&unlimited).is_err());
    }
}
