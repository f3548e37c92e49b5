//! Derived cart totals.

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Totals for the whole cart, computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineSummary>,
    /// Sum of all quantities.
    pub item_count: i64,
    /// Number of distinct products.
    pub unique_item_count: usize,
    /// Sum of line subtotals.
    pub total: Money,
}

/// Pricing for one line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSummary {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// unit_price * quantity.
    pub subtotal: Money,
}

impl CartSummary {
    /// Build a summary over `items`.
    ///
    /// Returns `CartError::Overflow` if any subtotal or the total overflows.
    pub fn compute(items: &[LineItem], currency: Currency) -> Result<Self, CartError> {
        let lines = items
            .iter()
            .map(|item| {
                Ok(LineSummary {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    unit_price: item.price,
                    quantity: item.quantity,
                    subtotal: item.subtotal().ok_or(CartError::Overflow)?,
                })
            })
            .collect::<Result<Vec<_>, CartError>>()?;

        let (item_count, total) =
            checked_totals(items.iter().map(|i| (&i.price, i.quantity)), currency)
                .ok_or(CartError::Overflow)?;

        Ok(Self {
            item_count,
            unique_item_count: items.len(),
            lines,
            total,
        })
    }

    /// Check if the summary covers no items.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Total units and total price over `(unit price, quantity)` pairs.
///
/// Returns `None` if any subtotal, the unit count or the total overflows.
pub(crate) fn checked_totals<'a, I>(lines: I, currency: Currency) -> Option<(i64, Money)>
where
    I: IntoIterator<Item = (&'a Money, i64)>,
{
    let mut units: i64 = 0;
    let mut total = Money::zero(currency);
    for (price, quantity) in lines {
        units = units.checked_add(quantity)?;
        total = total.checked_add(&price.checked_mul(quantity)?)?;
    }
    Some((units, total))
}
