//! Client for the exchange-rate provider.
//!
//! The provider is queried with `GET {base_url}/{api_key}/latest/ZAR` and
//! answers with
//!
//! ```json
//! { "result": "success", "conversion_rates": { "ZAR": 1, "USD": 0.054 } }
//! ```
//!
//! or, on failure, `{ "result": "error", "error-type": "invalid-key" }`.

use std::collections::HashMap;

use engine::{Currency, ExchangeRates};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum FxError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{status}: {message}")]
    Provider { status: StatusCode, message: String },
}

#[derive(Debug, Deserialize)]
struct LatestBody {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

#[derive(Clone, Debug)]
pub struct RatesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RatesClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn url(&self, base: Currency) -> String {
        format!(
            "{}/{}/latest/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key.trim_matches('/'),
            base.code()
        )
    }

    /// Fetches the latest multipliers from ZAR.
    pub async fn latest(&self) -> Result<ExchangeRates, FxError> {
        let resp = self.client.get(self.url(Currency::Zar)).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<LatestBody>(&body)
                .ok()
                .and_then(|b| b.error_type)
                .unwrap_or_else(|| "provider error".to_string());
            return Err(FxError::Provider { status, message });
        }

        let rates = parse_latest(status, &body)?;
        tracing::debug!(currencies = rates.entries().len(), "exchange rates fetched");
        Ok(rates)
    }
}

/// Reads a `latest` response body. Currencies Cashify does not display are
/// dropped.
pub fn parse_latest(status: StatusCode, body: &[u8]) -> Result<ExchangeRates, FxError> {
    let body: LatestBody = serde_json::from_slice(body)?;
    if body.result != "success" {
        return Err(FxError::Provider {
            status,
            message: body.error_type.unwrap_or(body.result),
        });
    }
    Ok(ExchangeRates::from_codes(
        body.conversion_rates
            .iter()
            .map(|(code, rate)| (code.as_str(), *rate)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_and_keeps_known_codes() {
        let body = br#"{"result":"success","base_code":"ZAR","conversion_rates":{"ZAR":1,"USD":0.054,"EUR":0.05,"AUD":0.08}}"#;
        let rates = parse_latest(StatusCode::OK, body).unwrap();
        assert_eq!(rates.rate(Currency::Usd), Some(0.054));
        assert_eq!(rates.rate(Currency::Eur), Some(0.05));
        assert_eq!(rates.rate(Currency::Zar), Some(1.0));
        assert_eq!(rates.entries().len(), 3);
    }

    #[test]
    fn error_result_carries_error_type() {
        let body = br#"{"result":"error","error-type":"invalid-key"}"#;
        match parse_latest(StatusCode::OK, body) {
            Err(FxError::Provider { message, .. }) => assert_eq!(message, "invalid-key"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            parse_latest(StatusCode::OK, b"<html>"),
            Err(FxError::Decode(_))
        ));
    }

    #[test]
    fn url_joins_parts() {
        let client = RatesClient::new(
            Client::new(),
            "https://rates.example.com/v6/".to_string(),
            "KEY".to_string(),
        );
        assert_eq!(
            client.url(Currency::Zar),
            "https://rates.example.com/v6/KEY/latest/ZAR"
        );
    }
}
