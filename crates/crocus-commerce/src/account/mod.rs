//! Account module.
//!
//! Contains the user profile, the address book and the session store.

mod address;
mod store;
mod user;

pub use address::{Address, AddressBook, AddressPatch};
pub use store::{UserState, UserStore};
pub use user::{User, UserPatch};
