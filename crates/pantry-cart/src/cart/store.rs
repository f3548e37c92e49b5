//! The persisted cart store.

use std::fmt;

use pantry_cache::{Cache, SessionId};
use tracing::{debug, warn};

use crate::cart::event::{Listeners, SubscriptionId};
use crate::cart::persist::{Snapshot, SnapshotRef, SNAPSHOT_VERSION};
use crate::cart::pricing::checked_totals;
use crate::cart::{CartEvent, CartSummary, LineItem, ProductSnapshot, Receipt};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use crate::options::CartOptions;

/// A shopper's cart, kept in memory and written through to a [`Cache`]
/// after every mutation.
///
/// Items are unique by product ID, have a quantity of at least one, and
/// stay in the order they were first added. The in-memory list is
/// authoritative: a failed persistence write is logged and reported as
/// [`CartEvent::PersistFailed`], never rolled back.
///
/// # Example
///
/// ```
/// use pantry_cache::{Cache, SessionId};
/// use pantry_cart::prelude::*;
///
/// let mut cart = CartStore::open(Cache::in_memory(), SessionId::new("sess_1"));
/// let apples = ProductSnapshot::new("apple", "Gala apple", Money::new(1000, Currency::USD));
/// let pears = ProductSnapshot::new("pear", "Pear", Money::new(500, Currency::USD));
///
/// cart.add_item_with_quantity(&apples, 2).unwrap();
/// cart.add_item_with_quantity(&pears, 3).unwrap();
///
/// assert_eq!(cart.total().unwrap(), Money::new(3500, Currency::USD));
/// assert_eq!(cart.item_count(), 5);
/// ```
pub struct CartStore {
    session_id: SessionId,
    key: String,
    cache: Cache,
    options: CartOptions,
    items: Vec<LineItem>,
    updated_at: i64,
    listeners: Listeners,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("session_id", &self.session_id)
            .field("key", &self.key)
            .field("items", &self.items)
            .field("updated_at", &self.updated_at)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CartStore {
    /// Open the cart for a session with default options.
    ///
    /// Rehydrates from `cache` if a well-formed snapshot exists; otherwise
    /// starts empty.
    pub fn open(cache: Cache, session_id: SessionId) -> Self {
        Self::open_with_options(cache, session_id, CartOptions::default())
    }

    /// Open the cart for a session.
    pub fn open_with_options(cache: Cache, session_id: SessionId, options: CartOptions) -> Self {
        let key = options.storage_key(&session_id);
        let mut store = Self {
            session_id,
            key,
            cache,
            options,
            items: Vec::new(),
            updated_at: 0,
            listeners: Listeners::default(),
        };
        store.rehydrate();
        store
    }

    /// Re-read the persisted snapshot, replacing the in-memory items.
    ///
    /// Missing or malformed data yields an empty cart. Returns the number
    /// of items loaded.
    pub fn reload(&mut self) -> usize {
        self.rehydrate();
        self.items.len()
    }

    fn rehydrate(&mut self) {
        let (items, updated_at) = match self.cache.get::<Snapshot>(&self.key) {
            Ok(Some(snapshot)) => {
                let updated_at = snapshot.updated_at;
                match snapshot.into_items(&self.options) {
                    Ok(items) => (items, updated_at),
                    Err(reason) => {
                        warn!(key = %self.key, %reason, "discarding malformed cart snapshot");
                        (Vec::new(), 0)
                    }
                }
            }
            Ok(None) => (Vec::new(), 0),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read cart snapshot; starting empty");
                (Vec::new(), 0)
            }
        };
        debug!(key = %self.key, items = items.len(), "cart rehydrated");
        self.items = items;
        self.updated_at = updated_at;
    }

    /// Add one unit of a product.
    ///
    /// Returns the product's quantity after the add.
    pub fn add_item(&mut self, product: &ProductSnapshot) -> Result<i64, CartError> {
        self.add_item_with_quantity(product, 1)
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line for the same product has its quantity incremented
    /// and keeps its original snapshot and position; otherwise a new line is
    /// appended. Returns the product's quantity after the add.
    ///
    /// Returns an error, without changing the cart, if:
    /// - The snapshot lacks a product ID or name
    /// - Quantity is not positive
    /// - The price is in a different currency than the cart
    /// - The new quantity would exceed the per-item limit
    /// - Arithmetic overflow would occur
    pub fn add_item_with_quantity(
        &mut self,
        product: &ProductSnapshot,
        quantity: i64,
    ) -> Result<i64, CartError> {
        product.validate()?;
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if product.price.currency != self.options.currency {
            return Err(CartError::CurrencyMismatch {
                expected: self.options.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        let max = self.options.max_quantity_per_item;
        let new_quantity = match self.position(&product.product_id) {
            Some(idx) => {
                let new_quantity = self.items[idx]
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::Overflow)?;
                if new_quantity > max {
                    return Err(CartError::QuantityExceedsLimit(new_quantity, max));
                }
                let price = self.items[idx].price;
                self.check_totals(Some(idx), &price, new_quantity)?;
                self.items[idx].quantity = new_quantity;
                new_quantity
            }
            None => {
                if quantity > max {
                    return Err(CartError::QuantityExceedsLimit(quantity, max));
                }
                self.check_totals(None, &product.price, quantity)?;
                self.items.push(LineItem::from_snapshot(product, quantity));
                quantity
            }
        };

        self.commit(CartEvent::ItemAdded {
            product_id: product.product_id.clone(),
            added: quantity,
            quantity: new_quantity,
        });
        Ok(new_quantity)
    }

    /// Set a product's quantity.
    ///
    /// A quantity of zero or less removes the item. Returns `Ok(false)` if
    /// the product is not in the cart, in which case nothing changes and
    /// nothing is written.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CartError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let Some(idx) = self.position(product_id) else {
            debug!(session = %self.session_id, %product_id, "update for product not in cart");
            return Ok(false);
        };

        let max = self.options.max_quantity_per_item;
        if quantity > max {
            return Err(CartError::QuantityExceedsLimit(quantity, max));
        }
        let price = self.items[idx].price;
        self.check_totals(Some(idx), &price, quantity)?;

        let from = std::mem::replace(&mut self.items[idx].quantity, quantity);

        self.commit(CartEvent::QuantityChanged {
            product_id: product_id.clone(),
            from,
            to: quantity,
        });
        Ok(true)
    }

    /// Like [`update_quantity`](Self::update_quantity), but reports an
    /// unknown product as `CartError::NotFound`.
    pub fn update_quantity_strict(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if self.update_quantity(product_id, quantity)? {
            Ok(())
        } else {
            Err(CartError::NotFound(product_id.to_string()))
        }
    }

    /// Remove a product from the cart.
    ///
    /// Returns `false` if it was not there. Other items keep their order.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        self.items.remove(idx);
        self.commit(CartEvent::ItemRemoved {
            product_id: product_id.clone(),
        });
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit(CartEvent::Cleared);
    }

    /// Check out: produce a receipt for the current items and empty the
    /// cart.
    pub fn checkout(&mut self) -> Result<Receipt, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let summary = self.summary()?;
        let receipt = Receipt::from_summary(self.session_id.clone(), summary);

        self.items.clear();
        self.commit(CartEvent::CheckedOut {
            receipt_id: receipt.id.clone(),
            total: receipt.total,
        });
        Ok(receipt)
    }

    /// Empty the cart and delete its persisted snapshot.
    pub fn discard(&mut self) -> Result<(), CartError> {
        self.items.clear();
        self.updated_at = 0;
        self.cache.delete(&self.key)?;
        debug!(key = %self.key, "cart snapshot discarded");
        self.listeners.emit(&CartEvent::Cleared);
        Ok(())
    }

    /// Sum of price times quantity over all items, recomputed on each call.
    pub fn total(&self) -> Result<Money, CartError> {
        let mut total = Money::zero(self.options.currency);
        for item in &self.items {
            let subtotal = item.subtotal().ok_or(CartError::Overflow)?;
            total = total.checked_add(&subtotal).ok_or(CartError::Overflow)?;
        }
        Ok(total)
    }

    /// Total units in the cart.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |count, item| count.saturating_add(item.quantity))
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Per-line and overall totals.
    pub fn summary(&self) -> Result<CartSummary, CartError> {
        CartSummary::compute(&self.items, self.options.currency)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by product ID.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The session this cart belongs to.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.options.currency
    }

    /// Persistence key of this cart.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Unix timestamp of the last mutation, or of the loaded snapshot.
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Register a listener called after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product_id == product_id)
    }

    /// Check that unit count and total stay representable with `quantity`
    /// units at `price` in line `slot` (a new line when `None`).
    fn check_totals(
        &self,
        slot: Option<usize>,
        price: &Money,
        quantity: i64,
    ) -> Result<(), CartError> {
        let others = self
            .items
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != slot)
            .map(|(_, item)| (&item.price, item.quantity));
        checked_totals(
            others.chain(std::iter::once((price, quantity))),
            self.options.currency,
        )
        .map(|_| ())
        .ok_or(CartError::Overflow)
    }

    fn commit(&mut self, event: CartEvent) {
        self.updated_at = current_timestamp();
        debug!(session = %self.session_id, ?event, items = self.items.len(), "cart changed");
        self.listeners.emit(&event);
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            items: &self.items,
            updated_at: self.updated_at,
        };
        if let Err(e) = self.cache.set(&self.key, &snapshot) {
            warn!(key = %self.key, error = %e, "failed to persist cart; keeping in-memory state");
            self.listeners.emit(&CartEvent::PersistFailed {
                reason: e.to_string(),
            });
        }
    }
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
