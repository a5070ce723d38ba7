pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod resolver;
pub mod types;
pub mod zipcode;

pub use client::CepClient;
pub use config::ResolverConfig;
pub use error::{FailureKind, LookupError};
pub use form::{AddressForm, FormField};
pub use resolver::{AddressResolver, SharedForm};
pub use types::{Address, ViaCepResponse};
pub use zipcode::{apply_mask, normalize_code};
