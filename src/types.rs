use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LookupError;

/// Response body from the ViaCEP `/ws/<code>/json/` endpoint
///
/// Every field is optional: a not-found answer is just `{"erro": true}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViaCepResponse {
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub complemento: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub ibge: Option<String>,
    #[serde(default)]
    pub ddd: Option<String>,
    /// Not-found marker. Older deployments send `true`, newer ones `"true"`.
    #[serde(default)]
    pub erro: Option<Value>,
}

impl ViaCepResponse {
    /// Whether the service flagged the code as unknown
    pub fn is_not_found(&self) -> bool {
        self.erro.as_ref().map(is_truthy).unwrap_or(false)
    }

    /// Convert into an [`Address`], or `NotFound` when the marker is set
    pub fn into_address(self, code: &str) -> Result<Address, LookupError> {
        if self.is_not_found() {
            return Err(LookupError::NotFound {
                code: code.to_string(),
            });
        }

        Ok(Address {
            cep: self.cep.unwrap_or_else(|| code.to_string()),
            street: self.logradouro.unwrap_or_default(),
            complement: self.complemento.unwrap_or_default(),
            district: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            state: self.uf.unwrap_or_default(),
            ibge: self.ibge,
            ddd: self.ddd,
        })
    }
}

/// Address resolved from a postal code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddd: Option<String>,
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
