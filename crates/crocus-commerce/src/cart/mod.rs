//! Shopping cart module.
//!
//! Lines are identified by (product, size, color); adding an existing
//! variant merges quantities.

mod cart;
mod store;

pub use cart::{CartLine, CartState, LineKey};
pub use store::CartStore;
