//! Shopping cart core for the Pantry grocery storefront.
//!
//! - **Cart**: [`CartStore`] keeps a shopper's line items in insertion order,
//!   one per product, and writes them through to a Key-Value store after
//!   every change
//! - **Money**: integer minor-unit amounts with checked arithmetic
//! - **Receipts**: checkout turns the cart into a [`Receipt`] and empties it
//!
//! # Example
//!
//! ```
//! use pantry_cache::{Cache, SessionId};
//! use pantry_cart::prelude::*;
//!
//! let cache = Cache::in_memory();
//! let session = SessionId::new("sess_42");
//!
//! let mut cart = CartStore::open(cache.clone(), session.clone());
//! let milk = ProductSnapshot::new("milk-1l", "Whole milk 1L", Money::new(129, Currency::USD));
//! cart.add_item_with_quantity(&milk, 2).unwrap();
//! drop(cart);
//!
//! // A new store for the same session picks the items back up.
//! let cart = CartStore::open(cache, session);
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total().unwrap().display(), "$2.58");
//! ```

pub mod cart;
pub mod error;
pub mod ids;
pub mod money;
pub mod options;

pub use cart::{
    CartEvent, CartStore, CartSummary, LineItem, LineSummary, ProductSnapshot, Receipt,
    SubscriptionId,
};
pub use error::CartError;
pub use ids::{ProductId, ReceiptId};
pub use money::{Currency, Money};
pub use options::{CartOptions, MAX_QUANTITY_PER_ITEM};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{
        CartEvent, CartStore, CartSummary, LineItem, LineSummary, ProductSnapshot, Receipt,
        SubscriptionId,
    };
    pub use crate::error::CartError;
    pub use crate::ids::{ProductId, ReceiptId};
    pub use crate::money::{Currency, Money};
    pub use crate::options::CartOptions;
}
