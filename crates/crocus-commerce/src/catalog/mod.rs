//! Product catalog module.
//!
//! The catalog is read-only to the stores.

mod product;

pub use product::Product;
