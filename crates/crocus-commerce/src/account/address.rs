//! Address types and the single-default address book.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ids::AddressId;

/// A saved postal address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Label shown in the picker (e.g., "Home", "Office").
    pub name: String,
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// State/province.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Country name.
    pub country: String,
    /// Whether this is the user's default shipping address.
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Create a non-default address with a fresh id.
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: AddressId::generate(),
            name: name.into(),
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            country: country.into(),
            is_default: false,
        }
    }

    /// Use a specific id.
    pub fn with_id(mut self, id: impl Into<AddressId>) -> Self {
        self.id = id.into();
        self
    }

    /// Request default status when added.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip_code, &self.country]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check if the fields checkout needs are filled in.
    pub fn is_complete(&self) -> bool {
        !self.street.is_empty() && !self.city.is_empty() && !self.country.is_empty()
    }
}

/// Partial update for an [`Address`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressPatch {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    /// `Some(true)` makes the target the default and ignores every other
    /// field in the patch.
    pub is_default: Option<bool>,
}

impl AddressPatch {
    /// A patch that only sets the default flag.
    pub fn make_default() -> Self {
        Self {
            is_default: Some(true),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn is_default(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }

    /// Merge the text fields into `address`. The default flag is not touched.
    fn apply_fields(&self, address: &mut Address) -> bool {
        let mut changed = false;
        let fields = [
            (&self.name, &mut address.name),
            (&self.street, &mut address.street),
            (&self.city, &mut address.city),
            (&self.state, &mut address.state),
            (&self.zip_code, &mut address.zip_code),
            (&self.country, &mut address.country),
        ];
        for (patch, field) in fields {
            if let Some(value) = patch {
                if *field != *value {
                    *field = value.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}

/// A user's addresses in insertion order.
///
/// Whenever the book is non-empty exactly one address is the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AddressBook(Vec<Address>);

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored addresses, repairing the default flags.
    pub fn from_addresses(addresses: Vec<Address>) -> Self {
        let mut book = Self(addresses);
        book.normalize();
        book
    }

    /// Append an address.
    ///
    /// A default address demotes every other one; the first address in an
    /// empty book always becomes the default. Duplicate ids are ignored.
    pub fn add(&mut self, mut address: Address) -> bool {
        if self.get(&address.id).is_some() {
            return false;
        }

        if self.0.is_empty() {
            address.is_default = true;
        } else if address.is_default {
            self.clear_default();
        }
        self.0.push(address);
        true
    }

    /// Apply a patch to one address.
    ///
    /// `is_default: Some(true)` only moves the default flag; the other
    /// patch fields are dropped for that call.
    pub fn update(&mut self, id: &AddressId, patch: &AddressPatch) -> bool {
        if patch.is_default == Some(true) {
            return self.set_default(id);
        }

        match self.0.iter_mut().find(|a| &a.id == id) {
            Some(address) => patch.apply_fields(address),
            None => false,
        }
    }

    /// Delete an address, promoting the first remaining one when the default
    /// was removed.
    pub fn remove(&mut self, id: &AddressId) -> bool {
        let Some(index) = self.0.iter().position(|a| &a.id == id) else {
            return false;
        };

        let removed = self.0.remove(index);
        if removed.is_default {
            if let Some(first) = self.0.first_mut() {
                first.is_default = true;
                debug!(address_id = %first.id, "promoted address to default");
            }
        }
        true
    }

    /// Make `id` the only default address. Unknown ids change nothing.
    pub fn set_default(&mut self, id: &AddressId) -> bool {
        let Some(target) = self.get(id) else {
            return false;
        };
        if target.is_default && self.default_count() == 1 {
            return false;
        }

        for address in &mut self.0 {
            address.is_default = &address.id == id;
        }
        true
    }

    /// Repair the default flags: keep the first default, or promote the
    /// first address when none is marked.
    pub fn normalize(&mut self) -> bool {
        if self.0.is_empty() || self.default_count() == 1 {
            return false;
        }

        let keep = self.0.iter().position(|a| a.is_default).unwrap_or(0);
        for (i, address) in self.0.iter_mut().enumerate() {
            address.is_default = i == keep;
        }
        true
    }

    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.0.iter().find(|a| &a.id == id)
    }

    /// The default address.
    pub fn default_address(&self) -> Option<&Address> {
        self.0.iter().find(|a| a.is_default)
    }

    /// Address checkout preselects: the default, else the first.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.default_address().or_else(|| self.0.first())
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn default_count(&self) -> usize {
        self.0.iter().filter(|a| a.is_default).count()
    }

    fn clear_default(&mut self) {
        for address in &mut self.0 {
            address.is_default = false;
        }
    }
}
