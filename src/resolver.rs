//! Postal code driven address resolution.
//!
//! [`AddressResolver`] owns the lookup flow for one [`AddressForm`]: each zip
//! code edit is masked and stored, and an edit that completes the code spawns
//! a lookup whose outcome is written back into the form. Lookups are never
//! cancelled and failures never reach the caller; they only show up as empty
//! address fields and a log line.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::client::CepClient;
use crate::config::ResolverConfig;
use crate::error::FailureKind;
use crate::form::{AddressForm, FormField};
use crate::zipcode;

/// Shared handle to a form the resolver writes into
pub type SharedForm = Arc<Mutex<AddressForm>>;

/// Drives postal code lookups for a single address form.
///
/// Cloning is cheap; clones share the form, the HTTP client and the request
/// counter.
#[derive(Clone)]
pub struct AddressResolver {
    client: CepClient,
    form: SharedForm,
    latest_request: Arc<AtomicU64>,
    discard_stale_responses: bool,
}

impl AddressResolver {
    /// Create a resolver with a fresh, empty form
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Self::with_form(config, Arc::new(Mutex::new(AddressForm::new())))
    }

    /// Create a resolver writing into an existing form
    pub fn with_form(config: &ResolverConfig, form: SharedForm) -> Result<Self> {
        Ok(Self {
            client: CepClient::new(config)?,
            form,
            latest_request: Arc::new(AtomicU64::new(0)),
            discard_stale_responses: config.discard_stale_responses,
        })
    }

    pub fn client(&self) -> &CepClient {
        &self.client
    }

    pub fn form(&self) -> SharedForm {
        Arc::clone(&self.form)
    }

    /// Copy of the current field values
    pub fn snapshot(&self) -> AddressForm {
        self.form.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.form.lock().is_loading
    }

    pub fn set_street_address(&self, value: impl Into<String>) {
        self.form.lock().set_street_address(value);
    }

    pub fn set_address_number(&self, value: impl Into<String>) {
        self.form.lock().set_address_number(value);
    }

    pub fn set_complement(&self, value: impl Into<String>) {
        self.form.lock().set_complement(value);
    }

    pub fn set_state(&self, value: impl Into<String>) {
        self.form.lock().set_state(value);
    }

    pub fn set_city(&self, value: impl Into<String>) {
        self.form.lock().set_city(value);
    }

    pub fn set_district(&self, value: impl Into<String>) {
        self.form.lock().set_district(value);
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        field.apply(&mut self.form.lock(), value.into());
    }

    /// Masked setter for the zip code field.
    ///
    /// The raw text is cut to the field length, masked and stored. When the
    /// stored value changed and is now a complete 9-character code, a lookup
    /// is spawned and its handle returned. Submitting the same text twice is
    /// not an edit and starts nothing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_zip_code_changed(&self, text: &str) -> Option<JoinHandle<()>> {
        let masked = zipcode::apply_mask(zipcode::truncate_to_field(text));

        let sequence = {
            let mut form = self.form.lock();
            if form.zip_code == masked {
                return None;
            }
            form.zip_code = masked.clone();
            if !zipcode::is_complete(&masked) {
                return None;
            }
            // Raised here as well so the flag is visible before the task runs
            form.is_loading = true;
            // Numbered at the edit, not when the task first runs
            self.next_sequence()
        };

        tracing::debug!(zip_code = %masked, sequence, "Zip code complete, starting lookup");
        let resolver = self.clone();
        Some(tokio::spawn(async move {
            resolver.resolve_numbered(&masked, sequence).await
        }))
    }

    /// Look up `code` and write the outcome into the form.
    ///
    /// Sets the loading flag, performs one request, then either fills the
    /// address fields or clears them. The loading flag is lowered last on
    /// every path. Never fails: errors are logged and absorbed.
    pub async fn resolve(&self, code: &str) {
        let sequence = self.next_sequence();
        self.resolve_numbered(code, sequence).await
    }

    fn next_sequence(&self) -> u64 {
        self.latest_request.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn resolve_numbered(&self, code: &str, sequence: u64) {
        self.form.lock().is_loading = true;

        let normalized = zipcode::normalize_code(code);
        let result = self.client.lookup(&normalized).await;

        if self.discard_stale_responses && self.latest_request.load(Ordering::SeqCst) != sequence
        {
            tracing::debug!(
                code = %normalized,
                sequence,
                "Discarding response from superseded lookup"
            );
            return;
        }

        let mut form = self.form.lock();
        match result {
            Ok(address) => {
                tracing::info!(
                    code = %normalized,
                    city = %address.city,
                    state = %address.state,
                    "Postal code resolved"
                );
                form.fill_from(&address);
            }
            Err(e) => {
                match e.kind() {
                    FailureKind::LookupNotFound => {
                        tracing::warn!(code = %normalized, error = %e, "Postal code lookup failed")
                    }
                    FailureKind::TransportFailure => {
                        tracing::error!(code = %normalized, error = %e, "Postal code lookup failed")
                    }
                }
                form.clear_address_fields();
            }
        }
        form.is_loading = false;
    }
}
