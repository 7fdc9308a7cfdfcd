//! The storefront: every client store wired to one cache.

use chrono::Utc;
use crocus_cache::{Cache, SyncStatus};
use rand::Rng;
use tracing::{info, warn};

use crate::account::{User, UserStore};
use crate::cart::CartStore;
use crate::checkout::{build_order, CheckoutCalculator, CheckoutTotals, Order, OrderRequest, ShippingMethod};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;
use crate::ids::{CommentId, PostId};
use crate::social::{NewComment, PostAuthor, PostsStore};
use crate::voucher::{SpinOutcome, VoucherStore, Wheel};
use crate::wishlist::WishlistStore;

/// Client-side state for one shopper.
///
/// # Example
///
/// ```rust,ignore
/// let mut shop = Storefront::open(StorefrontConfig::load("crocus.toml")?).await?;
/// shop.login(user).await?;
/// shop.cart.add_item(&product, 1, "M", "Black")?;
/// let order = shop.place_order(&OrderRequest::new(ShippingMethod::Express, PaymentMethod::PayPal))?;
/// shop.sync_all().await?;
/// ```
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    cache: Cache,
    calculator: CheckoutCalculator,
    wheel: Wheel,
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub account: UserStore,
    pub posts: PostsStore,
    vouchers: Option<VoucherStore>,
}

impl Storefront {
    /// Wire the stores to `cache` without reading anything.
    pub fn new(config: StorefrontConfig, cache: Cache) -> Self {
        let storage = &config.storage;
        Self {
            cart: CartStore::new(cache.clone(), storage.cart_key.clone()),
            wishlist: WishlistStore::new(cache.clone(), storage.wishlist_key.clone()),
            account: UserStore::new(cache.clone(), storage.user_key.clone()),
            posts: PostsStore::new(cache.clone(), storage.posts_key.clone(), config.social.like_policy),
            calculator: config.calculator(),
            wheel: Wheel::default(),
            vouchers: None,
            cache,
            config,
        }
    }

    /// Open the configured cache and rehydrate every store.
    pub async fn open(config: StorefrontConfig) -> Result<Self, CommerceError> {
        let cache = match &config.storage.data_dir {
            Some(dir) => Cache::open_dir(dir.clone()).await?,
            None => Cache::in_memory(),
        };
        let mut storefront = Self::new(config, cache);
        storefront.rehydrate_all().await?;
        Ok(storefront)
    }

    /// Use a custom prize wheel for vouchers loaded from now on.
    pub fn with_wheel(mut self, wheel: Wheel) -> Self {
        self.wheel = wheel;
        self
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn calculator(&self) -> &CheckoutCalculator {
        &self.calculator
    }

    /// Load every store from the cache.
    pub async fn rehydrate_all(&mut self) -> Result<(), CommerceError> {
        self.cart.rehydrate().await?;
        self.wishlist.rehydrate().await?;
        self.account.rehydrate().await?;
        self.posts.rehydrate().await?;
        self.load_vouchers().await?;
        info!(
            cart_lines = self.cart.unique_line_count(),
            authenticated = self.account.is_authenticated(),
            "storefront rehydrated"
        );
        Ok(())
    }

    /// Write every dirty store.
    ///
    /// All stores are attempted; the first failure is returned.
    pub async fn sync_all(&mut self) -> Result<(), CommerceError> {
        let mut results = vec![
            (self.cart.storage_key().to_string(), self.cart.sync().await),
            (self.wishlist.storage_key().to_string(), self.wishlist.sync().await),
            (self.account.storage_key().to_string(), self.account.sync().await),
            (self.posts.storage_key().to_string(), self.posts.sync().await),
        ];
        if let Some(vouchers) = self.vouchers.as_mut() {
            results.push((vouchers.storage_key().to_string(), vouchers.sync().await));
        }

        let mut first_error = None;
        for (key, result) in results {
            if let Err(e) = result {
                warn!(key = %key, error = %e, "store sync failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether every store matches its persisted snapshot.
    pub fn is_synced(&self) -> bool {
        let mut statuses = vec![
            self.cart.status(),
            self.wishlist.status(),
            self.account.status(),
            self.posts.status(),
        ];
        if let Some(vouchers) = &self.vouchers {
            statuses.push(vouchers.status());
        }
        statuses.iter().all(|s| *s == SyncStatus::Synced)
    }

    /// Start a session and load the user's voucher state.
    ///
    /// The previous user's voucher state is flushed first; if that write
    /// fails the session is left unchanged.
    pub async fn login(&mut self, user: User) -> Result<(), CommerceError> {
        self.flush_vouchers().await?;
        self.vouchers = None;
        self.account.login(user);
        self.load_vouchers().await
    }

    /// End the session. Voucher state is flushed before it is dropped; if
    /// that write fails the user stays logged in with their vouchers.
    pub async fn logout(&mut self) -> Result<bool, CommerceError> {
        self.flush_vouchers().await?;
        self.vouchers = None;
        Ok(self.account.logout())
    }

    async fn flush_vouchers(&mut self) -> Result<(), CommerceError> {
        if let Some(vouchers) = self.vouchers.as_mut() {
            if let Err(e) = vouchers.sync().await {
                warn!(key = %vouchers.storage_key(), error = %e, "voucher flush failed");
                return Err(e);
            }
        }
        Ok(())
    }

    async fn load_vouchers(&mut self) -> Result<(), CommerceError> {
        let Some(user) = self.account.user() else {
            self.vouchers = None;
            return Ok(());
        };
        let mut vouchers = VoucherStore::new(
            self.cache.clone(),
            &user.id,
            self.wheel.clone(),
            self.config.vouchers.daily_spins,
        );
        vouchers.rehydrate().await?;
        vouchers.reset_budget(Utc::now().date_naive());
        self.vouchers = Some(vouchers);
        Ok(())
    }

    /// Totals for the current cart.
    pub fn checkout_totals(&self, method: ShippingMethod) -> CheckoutTotals {
        self.calculator.totals(self.cart.subtotal(), method)
    }

    /// Turn the cart into an order and empty the cart.
    ///
    /// On error the cart is left untouched.
    pub fn place_order(&mut self, request: &OrderRequest) -> Result<Order, CommerceError> {
        let order = build_order(
            self.cart.lines(),
            self.account.user(),
            request,
            &self.calculator,
        )?;
        self.cart.clear_cart();
        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = order.total,
            "order placed"
        );
        Ok(order)
    }

    /// The logged-in user's voucher store.
    pub fn vouchers(&self) -> Option<&VoucherStore> {
        self.vouchers.as_ref()
    }

    pub fn vouchers_mut(&mut self) -> Result<&mut VoucherStore, CommerceError> {
        self.vouchers.as_mut().ok_or(CommerceError::NotAuthenticated)
    }

    /// Spin the wheel for the logged-in user.
    pub fn spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinOutcome, CommerceError> {
        Ok(self.vouchers_mut()?.spin(rng)?)
    }

    /// Post as the logged-in user.
    pub fn add_post(
        &mut self,
        content: impl Into<String>,
        images: Vec<String>,
    ) -> Result<PostId, CommerceError> {
        let user = self.account.user().ok_or(CommerceError::NotAuthenticated)?;
        Ok(self.posts.add_post(PostAuthor::from(user), content, images))
    }

    /// Like a post as the logged-in user.
    pub fn like_post(&mut self, post_id: &PostId) -> Result<bool, CommerceError> {
        let user = self.account.user().ok_or(CommerceError::NotAuthenticated)?;
        Ok(self.posts.like_post(post_id, &user.id))
    }

    /// Remove the logged-in user's like.
    pub fn unlike_post(&mut self, post_id: &PostId) -> Result<bool, CommerceError> {
        let user = self.account.user().ok_or(CommerceError::NotAuthenticated)?;
        Ok(self.posts.unlike_post(post_id, &user.id))
    }

    /// Comment as the logged-in user.
    pub fn comment(
        &mut self,
        post_id: &PostId,
        content: impl Into<String>,
    ) -> Result<Option<CommentId>, CommerceError> {
        let user = self.account.user().ok_or(CommerceError::NotAuthenticated)?;
        let comment = NewComment::new(PostAuthor::from(user), content);
        Ok(self.posts.add_comment(post_id, comment))
    }

    /// Delete a post the logged-in user may moderate.
    pub fn delete_post(&mut self, post_id: &PostId) -> Result<bool, CommerceError> {
        let user = self.account.user().ok_or(CommerceError::NotAuthenticated)?;
        self.posts.delete_post_as(post_id, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Address, AddressBook};
    use crate::catalog::Product;
    use crate::checkout::PaymentMethod;
    use crate::voucher::SpinRejection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shopper() -> User {
        let mut book = AddressBook::new();
        book.add(Address::new("Home", "1 Main St", "Hanoi", "HN", "10000", "VN").with_id("a1"));
        User::new("u1", "Linh", "linh@example.com").with_addresses(book)
    }

    fn storefront() -> Storefront {
        Storefront::new(StorefrontConfig::default(), Cache::in_memory())
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let mut shop = storefront();
        shop.login(shopper()).await.unwrap();
        shop.cart
            .add_item(&Product::new("p1", "Tee", 100_000.0), 2, "M", "Black")
            .unwrap();

        let order = shop
            .place_order(&OrderRequest::new(ShippingMethod::Standard, PaymentMethod::CreditCard))
            .unwrap();

        assert_eq!(order.subtotal, 200_000.0);
        assert_eq!(order.shipping_cost, 15_000.0);
        assert_eq!(order.shipping_address.id.as_str(), "a1");
        assert!(shop.cart.is_empty());
    }

    #[tokio::test]
    async fn test_failed_order_keeps_cart() {
        let mut shop = storefront();
        shop.cart
            .add_item(&Product::new("p1", "Tee", 100.0), 1, "M", "Black")
            .unwrap();

        let err = shop
            .place_order(&OrderRequest::new(ShippingMethod::Express, PaymentMethod::PayPal))
            .unwrap_err();

        assert!(matches!(err, CommerceError::NotAuthenticated));
        assert_eq!(shop.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_spin_requires_login() {
        let mut shop = storefront();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(matches!(
            shop.spin(&mut rng),
            Err(CommerceError::NotAuthenticated)
        ));

        shop.login(shopper()).await.unwrap();
        for _ in 0..3 {
            shop.spin(&mut rng).unwrap();
        }
        assert!(matches!(
            shop.spin(&mut rng),
            Err(CommerceError::SpinRejected(SpinRejection::NoSpinsRemaining))
        ));
    }

    #[tokio::test]
    async fn test_social_actions_use_current_user() {
        let mut shop = storefront();
        assert!(shop.add_post("hello", Vec::new()).is_err());

        shop.login(shopper()).await.unwrap();
        let post_id = shop.add_post("hello", Vec::new()).unwrap();
        assert!(shop.like_post(&post_id).unwrap());
        assert!(shop.comment(&post_id, "first").unwrap().is_some());

        let post = shop.posts.post(&post_id).unwrap();
        assert_eq!(post.author.user_id.as_str(), "u1");
        assert_eq!(post.likes, 1);

        assert!(shop.delete_post(&post_id).unwrap());
        assert!(shop.posts.posts().is_empty());
    }

    #[tokio::test]
    async fn test_sync_all_then_restart() {
        let cache = Cache::in_memory();
        let mut shop = Storefront::new(StorefrontConfig::default(), cache.clone());
        shop.login(shopper()).await.unwrap();
        shop.wishlist.add_item(&Product::new("p2", "Cap", 50.0));
        assert!(!shop.is_synced());

        shop.sync_all().await.unwrap();
        assert!(shop.is_synced());

        let mut restarted = Storefront::new(StorefrontConfig::default(), cache);
        restarted.rehydrate_all().await.unwrap();
        assert!(restarted.account.is_authenticated());
        assert_eq!(restarted.wishlist.len(), 1);
        assert!(restarted.vouchers().is_some());
    }

    #[tokio::test]
    async fn test_logout_drops_vouchers() {
        let mut shop = storefront();
        shop.login(shopper()).await.unwrap();
        assert!(shop.vouchers().is_some());

        assert!(shop.logout().await.unwrap());
        assert!(shop.vouchers().is_none());
        assert!(!shop.account.is_authenticated());
    }
}
