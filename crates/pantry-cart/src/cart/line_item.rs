//! Product snapshots and line items.

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// Display data for a product, copied from the catalog when the shopper
/// adds it.
///
/// The cart never re-fetches a product; later price changes in the catalog
/// do not reach items already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Catalog product ID.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Product image, if the catalog has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductSnapshot {
    /// Create a snapshot without an image.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            price,
            image_url: None,
        }
    }

    /// Attach an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Check that the required fields are present.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.product_id.is_blank() {
            return Err(CartError::InvalidItem("missing product id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CartError::InvalidItem(format!(
                "missing name for product {}",
                self.product_id
            )));
        }
        Ok(())
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product ID; unique within a cart.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price at the time the item was added.
    pub price: Money,
    /// Product image (denormalized for display).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Quantity; always at least 1.
    pub quantity: i64,
}

impl LineItem {
    pub(crate) fn from_snapshot(snapshot: &ProductSnapshot, quantity: i64) -> Self {
        Self {
            product_id: snapshot.product_id.clone(),
            name: snapshot.name.clone(),
            price: snapshot.price,
            image_url: snapshot.image_url.clone(),
            quantity,
        }
    }

    /// Price times quantity, or `None` on overflow.
    pub fn subtotal(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_snapshot_validate() {
        let ok = ProductSnapshot::new("milk-1l", "Milk 1L", Money::new(129, Currency::USD));
        assert!(ok.validate().is_ok());

        let no_id = ProductSnapshot::new("", "Milk 1L", Money::new(129, Currency::USD));
        assert!(matches!(no_id.validate(), Err(CartError::InvalidItem(_))));

        let no_name = ProductSnapshot::new("milk-1l", "  ", Money::new(129, Currency::USD));
        assert!(matches!(no_name.validate(), Err(CartError::InvalidItem(_))));
    }

    #[test]
    fn test_line_item_copies_snapshot() {
        let snapshot = ProductSnapshot::new(7u64, "Eggs x12", Money::new(399, Currency::USD))
            .with_image("https://cdn.example.com/eggs.jpg");
        let item = LineItem::from_snapshot(&snapshot, 2);

        assert_eq!(item.product_id, ProductId::new("7"));
        assert_eq!(item.image_url.as_deref(), Some("https://cdn.example.com/eggs.jpg"));
        assert_eq!(item.subtotal(), Some(Money::new(798, Currency::USD)));
    }

    #[test]
    fn test_missing_image_is_omitted_from_json() {
        let item = LineItem::from_snapshot(
            &ProductSnapshot::new("bread", "Bread", Money::new(250, Currency::USD)),
            1,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("image_url").is_none());
    }
}
