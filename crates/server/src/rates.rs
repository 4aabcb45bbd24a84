use api_types::rates::{RateView, RatesResponse};
use axum::{Json, extract::State};
use engine::Currency;

use crate::{mapping::currency_out, server::ServerState};

/// Currently known exchange rates, ZAR first.
pub async fn get(State(state): State<ServerState>) -> Json<RatesResponse> {
    let rates = state.rates.read().await;
    Json(RatesResponse {
        base: currency_out(Currency::Zar),
        rates: rates
            .entries()
            .into_iter()
            .map(|(currency, rate)| RateView {
                currency: currency_out(currency),
                symbol: currency.symbol().to_string(),
                rate,
            })
            .collect(),
    })
}
