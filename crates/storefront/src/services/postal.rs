//! Postal-code lookup against the public CEP service.
//!
//! The service answers with the street/neighborhood/city/state for an
//! 8-digit code, or an `erro` flag for unknown codes. Callers cannot tell
//! a lookup miss from a transport failure - both mean "the code was not
//! found" to the user, so both collapse to [`CepLookupError::NotFound`].

use serde::Deserialize;
use url::Url;

use mangaba_core::Cep;

/// Error from a postal-code lookup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CepLookupError {
    /// The code was not found (or the service was unreachable).
    #[error("postal code not found")]
    NotFound,
}

/// The address fields the lookup service returns for a known code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CepAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Raw response shape of the lookup service.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    erro: bool,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// Client for the postal-code lookup service.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CepClient {
    /// Create a new lookup client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Look up the address for a postal code.
    ///
    /// # Errors
    ///
    /// Returns [`CepLookupError::NotFound`] for unknown codes and for any
    /// transport or decode failure.
    pub async fn lookup(&self, cep: &Cep) -> Result<CepAddress, CepLookupError> {
        let url = self
            .base_url
            .join(&format!("/ws/{}/json/", cep.as_str()))
            .map_err(|e| {
                tracing::warn!("failed to build CEP lookup URL: {e}");
                CepLookupError::NotFound
            })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::warn!("CEP lookup request failed: {e}");
                CepLookupError::NotFound
            })?;

        let body: LookupResponse = response.json().await.map_err(|e| {
            tracing::warn!("CEP lookup returned an unexpected body: {e}");
            CepLookupError::NotFound
        })?;

        if body.erro {
            return Err(CepLookupError::NotFound);
        }

        Ok(CepAddress {
            street: body.logradouro,
            neighborhood: body.bairro,
            city: body.localidade,
            state: body.uf,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_flag_deserializes() {
        let body: LookupResponse = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(body.erro);
    }

    #[test]
    fn test_full_response_deserializes() {
        let body: LookupResponse = serde_json::from_str(
            r#"{
                "cep": "01310-100",
                "logradouro": "Avenida Paulista",
                "bairro": "Bela Vista",
                "localidade": "Sao Paulo",
                "uf": "SP"
            }"#,
        )
        .unwrap();
        assert!(!body.erro);
        assert_eq!(body.logradouro, "Avenida Paulista");
        assert_eq!(body.uf, "SP");
    }
}
