//! Cart configuration.

use pantry_cache::{cache_key, SessionId};
use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// Default maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Tunables for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOptions {
    /// Namespace prefix of the persistence key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Currency every line item must be priced in.
    #[serde(default)]
    pub currency: Currency,

    /// Upper bound on a single line item's quantity.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_item: i64,
}

fn default_key_prefix() -> String {
    "cart".to_string()
}

fn default_max_quantity() -> i64 {
    MAX_QUANTITY_PER_ITEM
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            currency: Currency::default(),
            max_quantity_per_item: default_max_quantity(),
        }
    }
}

impl CartOptions {
    /// Set the cart currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the per-item quantity ceiling.
    pub fn with_max_quantity(mut self, max: i64) -> Self {
        self.max_quantity_per_item = max;
        self
    }

    /// Set the persistence key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Persistence key for a session's cart, e.g. `cart:sess_abc`.
    pub fn storage_key(&self, session_id: &SessionId) -> String {
        cache_key!(self.key_prefix.as_str(), session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CartOptions::default();
        assert_eq!(options.key_prefix, "cart");
        assert_eq!(options.currency, Currency::USD);
        assert_eq!(options.max_quantity_per_item, MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_storage_key() {
        let session = SessionId::new("sess_1");
        assert_eq!(CartOptions::default().storage_key(&session), "cart:sess_1");
        assert_eq!(
            CartOptions::default()
                .with_key_prefix("grocer")
                .storage_key(&session),
            "grocer:sess_1"
        );
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: CartOptions = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(options.currency, Currency::EUR);
        assert_eq!(options.key_prefix, "cart");
        assert_eq!(options.max_quantity_per_item, MAX_QUANTITY_PER_ITEM);
    }
}
