//! Address entry form state.
//!
//! The form is a plain value: the presentation layer writes user edits into
//! it, the resolver writes lookup results into it, and both read it back.

use serde::Serialize;

use crate::types::Address;

/// Editable address fields plus the busy flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressForm {
    /// Masked zip code as displayed (`NNNNN-NNN` once complete)
    pub zip_code: String,
    pub street_address: String,
    /// Typed by the user only; lookups never touch it
    pub address_number: String,
    pub complement: String,
    pub state: String,
    pub city: String,
    pub district: String,
    /// True only while a lookup is in flight
    pub is_loading: bool,
}

impl AddressForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_street_address(&mut self, value: impl Into<String>) {
        self.street_address = value.into();
    }

    pub fn set_address_number(&mut self, value: impl Into<String>) {
        self.address_number = value.into();
    }

    pub fn set_complement(&mut self, value: impl Into<String>) {
        self.complement = value.into();
    }

    pub fn set_state(&mut self, value: impl Into<String>) {
        self.state = value.into();
    }

    pub fn set_city(&mut self, value: impl Into<String>) {
        self.city = value.into();
    }

    pub fn set_district(&mut self, value: impl Into<String>) {
        self.district = value.into();
    }

    /// Write a successful lookup into the form
    ///
    /// Only street, district, city and state come from the service. The
    /// complement stays as the user typed it.
    pub fn fill_from(&mut self, address: &Address) {
        self.street_address = address.street.clone();
        self.district = address.district.clone();
        self.city = address.city.clone();
        self.state = address.state.clone();
    }

    /// Reset everything a lookup owns, keeping zip code and number
    pub fn clear_address_fields(&mut self) {
        self.street_address.clear();
        self.district.clear();
        self.city.clear();
        self.state.clear();
        self.complement.clear();
    }
}

/// Fields the presentation layer can edit directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StreetAddress,
    AddressNumber,
    Complement,
    State,
    City,
    District,
}

impl FormField {
    /// Parse the kebab-case name used in URLs (`street-address`, ...)
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "street-address" => Some(Self::StreetAddress),
            "address-number" => Some(Self::AddressNumber),
            "complement" => Some(Self::Complement),
            "state" => Some(Self::State),
            "city" => Some(Self::City),
            "district" => Some(Self::District),
            _ => None,
        }
    }

    pub fn apply(self, form: &mut AddressForm, value: String) {
        match self {
            Self::StreetAddress => form.set_street_address(value),
            Self::AddressNumber => form.set_address_number(value),
            Self::Complement => form.set_complement(value),
            Self::State => form.set_state(value),
            Self::City => form.set_city(value),
            Self::District => form.set_district(value),
        }
    }
}
