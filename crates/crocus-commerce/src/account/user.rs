//! User profile types.

use serde::{Deserialize, Serialize};

use crate::account::AddressBook;
use crate::ids::UserId;

/// A logged-in shopper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Store administrator; may moderate the social feed.
    #[serde(default)]
    pub is_admin: bool,
    /// Saved addresses.
    #[serde(default)]
    pub addresses: AddressBook,
}

impl User {
    /// Create a regular user with no addresses.
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: None,
            avatar: None,
            is_admin: false,
            addresses: AddressBook::new(),
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_addresses(mut self, addresses: AddressBook) -> Self {
        self.addresses = addresses;
        self
    }

    /// Whether this user may act on content owned by `owner`.
    pub fn can_moderate(&self, owner: &UserId) -> bool {
        self.is_admin || &self.id == owner
    }
}

/// Partial profile update. Addresses change only through the address
/// operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn is_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = Some(is_admin);
        self
    }

    /// Shallow-merge the set fields into `user`.
    pub fn apply(&self, user: &mut User) -> bool {
        let before = user.clone();

        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if self.phone.is_some() {
            user.phone = self.phone.clone();
        }
        if self.avatar.is_some() {
            user.avatar = self.avatar.clone();
        }
        if let Some(is_admin) = self.is_admin {
            user.is_admin = is_admin;
        }

        *user != before
    }
}
