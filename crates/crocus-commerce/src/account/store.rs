//! User/address store.

use crocus_cache::{Cache, Persisted};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::account::{Address, AddressBook, AddressPatch, User, UserPatch};
use crate::ids::AddressId;
use crate::store::impl_persisted_store;

/// Persisted session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// The logged-in user and their address book.
///
/// Every operation is a no-op returning `false` while nobody is logged in.
#[derive(Debug)]
pub struct UserStore {
    inner: Persisted<UserState>,
}

impl UserStore {
    /// Create a logged-out store persisted under `key`.
    pub fn new(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            inner: Persisted::new(cache, key),
        }
    }

    /// Replace the session with `user`.
    pub fn login(&mut self, mut user: User) {
        user.addresses.normalize();
        info!(user_id = %user.id, "user logged in");
        self.inner.replace(UserState {
            user: Some(user),
            is_authenticated: true,
        });
    }

    /// Clear the session.
    pub fn logout(&mut self) -> bool {
        let logged_out = self.inner.mutate(|s| {
            let was_logged_in = s.user.is_some() || s.is_authenticated;
            *s = UserState::default();
            was_logged_in
        });
        if logged_out {
            info!("user logged out");
        }
        logged_out
    }

    /// Merge profile fields into the current user.
    pub fn update_profile(&mut self, patch: &UserPatch) -> bool {
        self.inner.mutate(|s| match s.user.as_mut() {
            Some(user) => patch.apply(user),
            None => false,
        })
    }

    /// Append an address; see [`AddressBook::add`].
    pub fn add_address(&mut self, address: Address) -> bool {
        self.with_book(|book| book.add(address))
    }

    /// Patch an address; see [`AddressBook::update`].
    pub fn update_address(&mut self, id: &AddressId, patch: &AddressPatch) -> bool {
        self.with_book(|book| book.update(id, patch))
    }

    /// Delete an address; the first remaining one inherits the default.
    pub fn remove_address(&mut self, id: &AddressId) -> bool {
        self.with_book(|book| book.remove(id))
    }

    /// Same as `update_address(id, &AddressPatch::make_default())`.
    pub fn set_default_address(&mut self, id: &AddressId) -> bool {
        self.with_book(|book| book.set_default(id))
    }

    pub fn user(&self) -> Option<&User> {
        self.inner.state().user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state().is_authenticated && self.user().is_some()
    }

    /// Saved addresses, empty while logged out.
    pub fn addresses(&self) -> &[Address] {
        self.user().map(|u| u.addresses.as_slice()).unwrap_or(&[])
    }

    pub fn default_address(&self) -> Option<&Address> {
        self.user()?.addresses.default_address()
    }

    /// Address checkout preselects: the default, else the first.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.user()?.addresses.shipping_address()
    }

    fn with_book<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut AddressBook) -> bool,
    {
        let changed = self.inner.mutate(|s| match s.user.as_mut() {
            Some(user) => f(&mut user.addresses),
            None => false,
        });
        if !changed && self.user().is_none() {
            debug!("address operation ignored while logged out");
        }
        changed
    }

    fn normalize_after_rehydrate(&mut self) {
        let repaired = self.inner.mutate(|s| match s.user.as_mut() {
            Some(user) => user.addresses.normalize(),
            None => false,
        });
        if repaired {
            debug!("repaired default address flags in stored session");
        }
    }
}

impl_persisted_store!(UserStore, after_rehydrate = normalize_after_rehydrate);

#[cfg(test)]
mod tests {
    use super::*;
    use crocus_cache::SyncStatus;

    fn store() -> UserStore {
        UserStore::new(Cache::in_memory(), "user-storage")
    }

    fn home() -> Address {
        Address::new("Home", "123 Main", "Hanoi", "Hanoi", "100000", "Vietnam").with_id("home")
    }

    fn office() -> Address {
        Address::new("Office", "9 Ly Thuong Kiet", "Hanoi", "Hanoi", "100000", "Vietnam")
            .with_id("office")
    }

    fn logged_in() -> UserStore {
        let mut store = store();
        store.login(User::new("1", "An", "an@example.com"));
        store
    }

    #[test]
    fn test_operations_are_noops_when_logged_out() {
        let mut store = store();

        assert!(!store.update_profile(&UserPatch::default().name("X")));
        assert!(!store.add_address(home()));
        assert!(!store.remove_address(&"home".into()));
        assert!(!store.set_default_address(&"home".into()));
        assert!(store.addresses().is_empty());
        assert_eq!(store.status(), SyncStatus::Synced);
    }

    #[test]
    fn test_login_logout() {
        let mut store = logged_in();
        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().name, "An");

        assert!(store.logout());
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert!(!store.logout());
    }

    #[test]
    fn test_update_address_default_scenario() {
        let mut store = logged_in();
        store.add_address(home());
        store.add_address(office());
        assert!(store.addresses()[0].is_default);

        store.update_address(&"office".into(), &AddressPatch::make_default());

        assert!(!store.addresses()[0].is_default);
        assert!(store.addresses()[1].is_default);
    }

    #[test]
    fn test_remove_default_promotes_first() {
        let mut store = logged_in();
        store.add_address(home());
        store.add_address(office());

        store.remove_address(&"home".into());
        assert_eq!(store.default_address().unwrap().id.as_str(), "office");
    }

    #[test]
    fn test_login_normalizes_address_book() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "1", "name": "An", "email": "an@example.com",
            "addresses": [
                {"id": "a", "name": "Home", "street": "1", "city": "Hanoi",
                 "state": "Hanoi", "zipCode": "1", "country": "VN", "isDefault": true},
                {"id": "b", "name": "Work", "street": "2", "city": "Hanoi",
                 "state": "Hanoi", "zipCode": "1", "country": "VN", "isDefault": true}
            ]
        }))
        .unwrap();

        let mut store = store();
        store.login(user);
        let defaults: Vec<_> = store.addresses().iter().filter(|a| a.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(store.shipping_address().unwrap().id.as_str(), "a");
    }

    #[tokio::test]
    async fn test_rehydrate_repairs_missing_default() {
        let cache = Cache::in_memory();
        cache
            .set(
                "user-storage",
                &serde_json::json!({
                    "state": {
                        "user": {
                            "id": "1", "name": "An", "email": "an@example.com", "isAdmin": false,
                            "addresses": [
                                {"id": "a", "name": "Home", "street": "1", "city": "Hanoi",
                                 "state": "Hanoi", "zipCode": "1", "country": "VN", "isDefault": false},
                                {"id": "b", "name": "Work", "street": "2", "city": "Hanoi",
                                 "state": "Hanoi", "zipCode": "1", "country": "VN", "isDefault": false}
                            ]
                        },
                        "isAuthenticated": true
                    },
                    "version": 0
                }),
            )
            .await
            .unwrap();

        let mut store = UserStore::new(cache, "user-storage");
        assert!(store.rehydrate().await.unwrap());
        assert!(store.is_authenticated());
        assert_eq!(store.default_address().unwrap().id.as_str(), "a");
        assert_eq!(store.status(), SyncStatus::Dirty);
    }
}
