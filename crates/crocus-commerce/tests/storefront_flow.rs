//! End-to-end storefront sessions against real storage.
//!
//! Each test drives the public API only, then reopens the storefront over the
//! same cache to check what a returning shopper would see.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use crocus_cache::{Cache, CacheError, KvStore, MemoryStore};
use crocus_commerce::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

/// Memory store whose writes fail while `down` is set.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    down: AtomicBool,
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.inner.exists(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.inner.keys().await
    }
}

fn shopper() -> User {
    let mut book = AddressBook::new();
    book.add(Address::new("Home", "12 Hang Bac", "Hanoi", "HN", "100000", "VN").with_id("home"));
    book.add(Address::new("Office", "5 Ly Thai To", "Hanoi", "HN", "100000", "VN").with_id("office"));
    User::new("u-1", "Linh", "linh@example.com").with_addresses(book)
}

fn tee() -> Product {
    Product::new("p-tee", "Linen Tee", 250_000.0)
        .with_discount_price(200_000.0)
        .with_sizes(["S", "M", "L"])
        .with_colors(["White", "Sand"])
}

fn file_config(dir: &std::path::Path) -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.storage.data_dir = Some(dir.to_path_buf());
    config
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    {
        let mut shop = Storefront::open(file_config(dir.path())).await.unwrap();
        shop.login(shopper()).await.unwrap();
        shop.cart.add_item(&tee(), 2, "M", "White").unwrap();
        shop.cart.add_item(&tee(), 1, "M", "White").unwrap();
        shop.cart.add_item(&tee(), 1, "L", "Sand").unwrap();
        assert!(shop.wishlist.toggle(&tee()));
        shop.spin(&mut rng).unwrap();
        shop.sync_all().await.unwrap();
    }

    let shop = Storefront::open(file_config(dir.path())).await.unwrap();
    assert!(shop.is_synced());
    assert_eq!(shop.cart.unique_line_count(), 2);
    assert_eq!(shop.cart.item_count(), 4);
    assert_eq!(shop.cart.subtotal(), 800_000.0);
    assert!(shop.wishlist.is_in_wishlist(&ProductId::new("p-tee")));
    assert_eq!(shop.account.default_address().unwrap().id.as_str(), "home");

    let vouchers = shop.vouchers().unwrap();
    assert_eq!(vouchers.engine().remaining(), 2);
    assert_eq!(vouchers.engine().history().len(), 1);
}

#[tokio::test]
async fn test_checkout_to_alternate_address() {
    let mut shop = Storefront::new(StorefrontConfig::default(), Cache::in_memory());
    shop.login(shopper()).await.unwrap();
    shop.cart.add_item(&tee(), 1, "S", "Sand").unwrap();

    let totals = shop.checkout_totals(ShippingMethod::Express);
    assert_eq!(totals.subtotal, 200_000.0);
    assert_eq!(totals.shipping, 29_000.0);
    assert_eq!(totals.tax, 16_000.0);
    assert_eq!(totals.total, 245_000.0);

    let order = shop
        .place_order(
            &OrderRequest::new(ShippingMethod::Express, PaymentMethod::CashOnDelivery)
                .with_address("office"),
        )
        .unwrap();

    assert_eq!(order.total, totals.total);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.shipping_address.name, "Office");
    assert!(order.id.as_str().starts_with("ORD-"));
    assert!(shop.cart.is_empty());
}

#[tokio::test]
async fn test_checkout_rejects_unknown_address() {
    let mut shop = Storefront::new(StorefrontConfig::default(), Cache::in_memory());
    shop.login(shopper()).await.unwrap();
    shop.cart.add_item(&tee(), 1, "S", "Sand").unwrap();

    let err = shop
        .place_order(
            &OrderRequest::new(ShippingMethod::Standard, PaymentMethod::CreditCard)
                .with_address("cottage"),
        )
        .unwrap_err();

    assert!(matches!(err, CommerceError::CheckoutIncomplete(_)));
    assert_eq!(shop.cart.item_count(), 1);
}

#[tokio::test]
async fn test_legacy_snapshots_load() {
    let cache = Cache::in_memory();
    cache
        .set(
            "cart-storage",
            &json!({
                "state": {
                    "items": [{
                        "product": {"id": "1", "name": "Shirt", "price": 10},
                        "quantity": 3,
                        "size": "M",
                        "color": "Red"
                    }]
                },
                "version": 0
            }),
        )
        .await
        .unwrap();
    cache
        .set(
            "posts-storage",
            &json!({
                "state": {
                    "posts": [{
                        "id": "post-1",
                        "userId": "u-9",
                        "userName": "Minh",
                        "content": "New drop!",
                        "images": [],
                        "likes": 2,
                        "likedBy": ["u-2", "u-3"],
                        "comments": [],
                        "createdAt": "2024-05-01T10:00:00Z",
                        "updatedAt": "2024-05-01T10:00:00Z"
                    }]
                },
                "version": 0
            }),
        )
        .await
        .unwrap();

    let mut shop = Storefront::new(StorefrontConfig::default(), cache);
    shop.rehydrate_all().await.unwrap();

    assert_eq!(shop.cart.item_count(), 3);
    let post = shop.posts.post(&PostId::new("post-1")).unwrap();
    assert_eq!(post.likes, 2);
    assert_eq!(post.author.name, "Minh");
    assert!(shop.posts.is_liked(&post.id, &UserId::new("u-3")));
}

#[tokio::test]
async fn test_newer_schema_is_refused() {
    let cache = Cache::in_memory();
    cache
        .set("wishlist-storage", &json!({"state": {"items": []}, "version": 99}))
        .await
        .unwrap();

    let mut shop = Storefront::new(StorefrontConfig::default(), cache);
    let err = shop.rehydrate_all().await.unwrap_err();

    assert!(matches!(
        err,
        CommerceError::CacheError(CacheError::UnsupportedSchema { found: 99, .. })
    ));
}

#[tokio::test]
async fn test_spin_budget_is_per_user() {
    let cache = Cache::in_memory();
    let mut rng = StdRng::seed_from_u64(11);
    let mut shop = Storefront::new(StorefrontConfig::default(), cache);

    shop.login(shopper()).await.unwrap();
    for _ in 0..3 {
        shop.spin(&mut rng).unwrap();
    }
    assert!(shop.spin(&mut rng).is_err());

    shop.login(User::new("u-2", "Minh", "minh@example.com")).await.unwrap();
    assert_eq!(shop.vouchers().unwrap().engine().remaining(), 3);

    shop.login(shopper()).await.unwrap();
    assert_eq!(shop.vouchers().unwrap().engine().remaining(), 0);
}

#[tokio::test]
async fn test_others_cannot_delete_posts() {
    let mut shop = Storefront::new(StorefrontConfig::default(), Cache::in_memory());
    shop.login(shopper()).await.unwrap();
    let post_id = shop.add_post("Linen season", Vec::new()).unwrap();

    shop.login(User::new("u-2", "Minh", "minh@example.com")).await.unwrap();
    assert!(matches!(
        shop.delete_post(&post_id),
        Err(CommerceError::Forbidden(_))
    ));

    shop.login(User::new("admin", "Ops", "ops@example.com").with_admin(true))
        .await
        .unwrap();
    assert!(shop.delete_post(&post_id).unwrap());
}

#[tokio::test]
async fn test_failed_voucher_flush_keeps_session() {
    let store = Arc::new(FlakyStore::default());
    let mut shop = Storefront::new(StorefrontConfig::default(), Cache::new(store.clone()));
    let mut rng = StdRng::seed_from_u64(5);

    shop.login(shopper()).await.unwrap();
    for _ in 0..3 {
        shop.spin(&mut rng).unwrap();
    }

    store.down.store(true, Ordering::SeqCst);
    assert!(matches!(
        shop.logout().await,
        Err(CommerceError::CacheError(CacheError::StoreError(_)))
    ));
    assert!(shop.account.is_authenticated());
    assert_eq!(shop.vouchers().unwrap().engine().remaining(), 0);
    assert!(matches!(
        shop.spin(&mut rng),
        Err(CommerceError::SpinRejected(SpinRejection::NoSpinsRemaining))
    ));

    assert!(shop
        .login(User::new("u-2", "Minh", "minh@example.com"))
        .await
        .is_err());
    assert_eq!(shop.account.user().unwrap().id.as_str(), "u-1");

    store.down.store(false, Ordering::SeqCst);
    assert!(shop.logout().await.unwrap());
    shop.login(shopper()).await.unwrap();
    assert_eq!(shop.vouchers().unwrap().engine().remaining(), 0);
}
