//! Checkout receipts.

use chrono::{DateTime, Utc};
use pantry_cache::SessionId;
use serde::{Deserialize, Serialize};

use crate::cart::{CartSummary, LineSummary};
use crate::ids::ReceiptId;
use crate::money::Money;

/// Confirmation of a checked-out cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    /// Receipt identifier.
    pub id: ReceiptId,
    /// Session the cart belonged to.
    pub session_id: SessionId,
    /// Purchased lines, in cart order.
    pub lines: Vec<LineSummary>,
    /// Total units purchased.
    pub item_count: i64,
    /// Amount charged.
    pub total: Money,
    /// When the checkout happened.
    pub placed_at: DateTime<Utc>,
}

impl Receipt {
    pub(crate) fn from_summary(session_id: SessionId, summary: CartSummary) -> Self {
        Self {
            id: ReceiptId::generate(),
            session_id,
            lines: summary.lines,
            item_count: summary.item_count,
            total: summary.total,
            placed_at: Utc::now(),
        }
    }
}
