//! Persistence behaviour of the cart store against real and faulty backends.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pantry_cache::{Cache, CacheError, FileStore, KvStore, MemoryStore, SessionId};
use pantry_cart::prelude::*;

/// Memory store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FlakyStore {
    fn failing_writes() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store
    }
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError("read unavailable".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError("write unavailable".to_string()));
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.inner.keys()
    }
}

fn product(id: &str, cents: i64) -> ProductSnapshot {
    ProductSnapshot::new(id, format!("Product {}", id), Money::new(cents, Currency::USD))
        .with_image(format!("https://cdn.example.com/{}.jpg", id))
}

fn session() -> SessionId {
    SessionId::new("sess_test")
}

#[test]
fn round_trip_reproduces_ordered_items() {
    let cache = Cache::in_memory();
    let mut cart = CartStore::open(cache.clone(), session());
    cart.add_item_with_quantity(&product("carrot", 99), 4).unwrap();
    cart.add_item(&product("bread", 349)).unwrap();
    cart.add_item_with_quantity(&product("apple", 50), 6).unwrap();
    cart.remove_item(&ProductId::new("bread"));
    cart.add_item(&product("bread", 349)).unwrap();
    let before = cart.items().to_vec();
    drop(cart);

    let cart = CartStore::open(cache, session());
    assert_eq!(cart.items(), before.as_slice());
    let ids: Vec<_> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(ids, vec!["carrot", "apple", "bread"]);
}

#[test]
fn sessions_are_isolated() {
    let cache = Cache::in_memory();
    let mut alice = CartStore::open(cache.clone(), SessionId::new("alice"));
    alice.add_item(&product("milk", 129)).unwrap();

    let bob = CartStore::open(cache.clone(), SessionId::new("bob"));
    assert!(bob.is_empty());
    assert_eq!(cache.keys().unwrap(), vec!["cart:alice".to_string()]);
}

#[test]
fn clear_is_persisted() {
    let cache = Cache::in_memory();
    let mut cart = CartStore::open(cache.clone(), session());
    cart.add_item(&product("milk", 129)).unwrap();
    cart.clear();

    let reopened = CartStore::open(cache, session());
    assert!(reopened.is_empty());
    assert_eq!(reopened.item_count(), 0);
}

#[test]
fn checkout_empties_persisted_cart() {
    let cache = Cache::in_memory();
    let mut cart = CartStore::open(cache.clone(), session());
    cart.add_item_with_quantity(&product("a", 1000), 2).unwrap();
    cart.add_item_with_quantity(&product("b", 500), 3).unwrap();

    let receipt = cart.checkout().unwrap();
    assert_eq!(receipt.total, Money::new(3500, Currency::USD));

    let reopened = CartStore::open(cache, session());
    assert!(reopened.is_empty());
}

#[test]
fn missing_snapshot_opens_empty() {
    let cart = CartStore::open(Cache::in_memory(), session());
    assert!(cart.is_empty());
    assert_eq!(cart.updated_at(), 0);
}

#[test]
fn malformed_json_opens_empty() {
    let cache = Cache::in_memory();
    cache.set_raw("cart:sess_test", b"{\"items\": [oops").unwrap();

    let cart = CartStore::open(cache, session());
    assert!(cart.is_empty());
}

#[test]
fn wrong_shape_opens_empty() {
    let cache = Cache::in_memory();
    cache.set("cart:sess_test", &vec![1, 2, 3]).unwrap();

    let cart = CartStore::open(cache, session());
    assert!(cart.is_empty());
}

#[test]
fn invariant_violations_open_empty() {
    let price = serde_json::json!({"amount_cents": 100, "currency": "USD"});
    let free = serde_json::json!({"amount_cents": 0, "currency": "USD"});
    let cases = [
        // duplicate product ids
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "A", "price": price, "quantity": 1},
            {"product_id": "a", "name": "A", "price": price, "quantity": 2}
        ]}),
        // zero quantity
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "A", "price": price, "quantity": 0}
        ]}),
        // unknown schema version
        serde_json::json!({"version": 7, "items": []}),
        // blank name
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "", "price": price, "quantity": 1}
        ]}),
        // above the per-item limit
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "A", "price": price, "quantity": 50_000}
        ]}),
        // subtotal overflows
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "A", "price": {"amount_cents": i64::MAX, "currency": "USD"}, "quantity": 2}
        ]}),
        // unit count overflows
        serde_json::json!({"version": 1, "items": [
            {"product_id": "a", "name": "A", "price": free, "quantity": i64::MAX},
            {"product_id": "b", "name": "B", "price": free, "quantity": 1}
        ]}),
    ];

    for case in cases {
        let cache = Cache::in_memory();
        cache.set("cart:sess_test", &case).unwrap();
        let cart = CartStore::open(cache, session());
        assert!(cart.is_empty(), "expected empty cart for {}", case);
        assert_eq!(cart.item_count(), 0);
    }
}

#[test]
fn snapshot_within_a_raised_limit_loads() {
    let cache = Cache::in_memory();
    let snapshot = serde_json::json!({"version": 1, "items": [
        {"product_id": "a", "name": "A", "price": {"amount_cents": 100, "currency": "USD"}, "quantity": 50_000}
    ]});
    cache.set("cart:sess_test", &snapshot).unwrap();

    let options = CartOptions::default().with_max_quantity(100_000);
    let cart = CartStore::open_with_options(cache, session(), options);
    assert_eq!(cart.item_count(), 50_000);
    assert_eq!(cart.total().unwrap(), Money::new(5_000_000, Currency::USD));
}

#[test]
fn well_formed_external_snapshot_is_loaded() {
    let cache = Cache::in_memory();
    let snapshot = serde_json::json!({
        "version": 1,
        "updated_at": 1_700_000_000,
        "items": [
            {"product_id": "42", "name": "Oats", "price": {"amount_cents": 450, "currency": "USD"}, "quantity": 2}
        ]
    });
    cache.set("cart:sess_test", &snapshot).unwrap();

    let cart = CartStore::open(cache, session());
    assert_eq!(cart.item_count(), 2);
    assert!(cart.contains(&ProductId::from(42u64)));
    assert_eq!(cart.updated_at(), 1_700_000_000);
    assert!(cart.get_item(&ProductId::new("42")).unwrap().image_url.is_none());
}

#[test]
fn read_failure_opens_empty() {
    let store = Arc::new(FlakyStore::default());
    store.fail_reads.store(true, Ordering::SeqCst);

    let cart = CartStore::open(Cache::new(store), session());
    assert!(cart.is_empty());
}

#[test]
fn write_failure_keeps_in_memory_state() {
    let cache = Cache::new(Arc::new(FlakyStore::failing_writes()));
    let mut cart = CartStore::open(cache, session());

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    cart.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    cart.add_item_with_quantity(&product("a", 1000), 2).unwrap();
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total().unwrap().amount_cents, 2000);

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], CartEvent::ItemAdded { quantity: 2, .. }));
    assert!(matches!(&events[1], CartEvent::PersistFailed { reason } if reason.contains("write unavailable")));
}

#[test]
fn writes_resume_after_backend_recovers() {
    let store = Arc::new(FlakyStore::failing_writes());
    let cache = Cache::new(store.clone());
    let mut cart = CartStore::open(cache.clone(), session());

    cart.add_item(&product("a", 100)).unwrap();
    assert!(!cache.exists("cart:sess_test").unwrap());

    store.fail_writes.store(false, Ordering::SeqCst);
    cart.add_item(&product("b", 100)).unwrap();

    let reopened = CartStore::open(cache, session());
    assert_eq!(reopened.unique_item_count(), 2);
}

#[test]
fn reload_picks_up_external_writes() {
    let cache = Cache::in_memory();
    let mut reader = CartStore::open(cache.clone(), session());
    let mut writer = CartStore::open(cache, session());

    writer.add_item(&product("a", 100)).unwrap();
    writer.add_item(&product("b", 100)).unwrap();

    assert!(reader.is_empty());
    assert_eq!(reader.reload(), 2);
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = Cache::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        let mut cart = CartStore::open(cache, session());
        cart.add_item_with_quantity(&product("tomato", 79), 5).unwrap();
        cart.add_item(&product("basil", 199)).unwrap();
    }

    let cache = Cache::open_dir(dir.path()).unwrap();
    let cart = CartStore::open(cache, session());
    assert_eq!(cart.item_count(), 6);
    assert_eq!(cart.total().unwrap(), Money::new(5 * 79 + 199, Currency::USD));
}

#[test]
fn options_scope_key_and_currency() {
    let cache = Cache::in_memory();
    let options = CartOptions::default()
        .with_key_prefix("grocer")
        .with_currency(Currency::EUR);

    let mut cart = CartStore::open_with_options(cache.clone(), session(), options.clone());
    let brie = ProductSnapshot::new("brie", "Brie", Money::new(650, Currency::EUR));
    cart.add_item(&brie).unwrap();
    assert!(cache.exists("grocer:sess_test").unwrap());

    // A USD cart over the same key rejects the EUR snapshot.
    let usd = CartStore::open_with_options(
        cache.clone(),
        session(),
        options.with_currency(Currency::USD),
    );
    assert!(usd.is_empty());

    let eur = CartStore::open_with_options(
        cache,
        session(),
        CartOptions::default()
            .with_key_prefix("grocer")
            .with_currency(Currency::EUR),
    );
    assert_eq!(eur.currency(), Currency::EUR);
    assert_eq!(eur.item_count(), 1);
}
