//! Shopping cart module.
//!
//! Contains the persisted cart store, its line items, derived totals,
//! change events, and checkout receipts.

mod event;
mod line_item;
mod persist;
mod pricing;
mod receipt;
mod store;

pub use event::{CartEvent, SubscriptionId};
pub use line_item::{LineItem, ProductSnapshot};
pub use pricing::{CartSummary, LineSummary};
pub use receipt::Receipt;
pub use store::CartStore;
