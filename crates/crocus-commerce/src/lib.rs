//! Client-side commerce state for the Crocus storefront.
//!
//! Every store keeps its state in memory and persists it as a versioned
//! snapshot through [`crocus_cache`]:
//!
//! - **Cart**: line items keyed by product, size and color
//! - **Wishlist**: saved products, one entry per product
//! - **Account**: the session user and their address book
//! - **Social**: posts, likes and comments
//! - **Checkout**: shipping, tax and order assembly
//! - **Vouchers**: a daily-limited prize wheel
//!
//! # Example
//!
//! ```rust,ignore
//! use crocus_commerce::prelude::*;
//!
//! let mut shop = Storefront::open(StorefrontConfig::default()).await?;
//! shop.login(User::new("u1", "Linh", "linh@example.com")).await?;
//!
//! let tee = Product::new("p1", "Linen Tee", 250_000.0).with_sizes(["S", "M"]);
//! shop.cart.add_item(&tee, 2, "M", "White")?;
//!
//! let totals = shop.checkout_totals(ShippingMethod::Express);
//! println!("Total: {}", totals.total);
//!
//! shop.sync_all().await?;
//! ```

pub mod error;
pub mod ids;

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod social;
pub mod storefront;
pub mod voucher;
pub mod wishlist;

mod store;

pub use config::StorefrontConfig;
pub use error::CommerceError;
pub use ids::*;
pub use storefront::Storefront;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::StorefrontConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::storefront::Storefront;

    // Catalog
    pub use crate::catalog::Product;

    // Cart and wishlist
    pub use crate::cart::{CartLine, CartStore, LineKey};
    pub use crate::wishlist::WishlistStore;

    // Account
    pub use crate::account::{Address, AddressBook, AddressPatch, User, UserPatch, UserStore};

    // Social
    pub use crate::social::{LikePolicy, NewComment, Post, PostAuthor, PostsStore};

    // Checkout
    pub use crate::checkout::{
        CheckoutCalculator, CheckoutTotals, Order, OrderRequest, OrderStatus, PaymentMethod,
        ShippingMethod,
    };

    // Vouchers
    pub use crate::voucher::{Reward, SpinOutcome, SpinRejection, VoucherStore, Wheel};

    pub use crocus_cache::SyncStatus;
}
