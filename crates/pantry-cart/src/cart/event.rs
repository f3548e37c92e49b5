//! Change notifications.

use serde::Serialize;

use crate::ids::{ProductId, ReceiptId};
use crate::money::Money;

/// A change to the cart, delivered to subscribers after it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// A product was added, or its quantity incremented.
    ItemAdded {
        product_id: ProductId,
        added: i64,
        quantity: i64,
    },
    /// A quantity was set to a new positive value.
    QuantityChanged {
        product_id: ProductId,
        from: i64,
        to: i64,
    },
    /// A line item was removed.
    ItemRemoved { product_id: ProductId },
    /// All items were removed.
    Cleared,
    /// The cart was checked out and emptied.
    CheckedOut { receipt_id: ReceiptId, total: Money },
    /// The persistence write after a mutation failed. The in-memory cart
    /// still holds the mutation.
    PersistFailed { reason: String },
}

/// Handle returned by [`CartStore::subscribe`](crate::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Listener = Box<dyn FnMut(&CartEvent)>;

/// Ordered set of event listeners.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() < len_before
    }

    pub(crate) fn emit(&mut self, event: &CartEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();

        let a = seen.clone();
        listeners.add(Box::new(move |_| a.borrow_mut().push("a")));
        let b = seen.clone();
        listeners.add(Box::new(move |_| b.borrow_mut().push("b")));

        listeners.emit(&CartEvent::Cleared);
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_listener() {
        let mut listeners = Listeners::default();
        let id = listeners.add(Box::new(|_| {}));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let event = CartEvent::ItemRemoved {
            product_id: ProductId::new("apple"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "item_removed");
        assert_eq!(json["product_id"], "apple");
    }
}
