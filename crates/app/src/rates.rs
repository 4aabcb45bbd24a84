//! Periodic exchange rate refresh.

use std::time::Duration;

use fx::RatesClient;
use server::SharedRates;

/// Replaces the shared rates on every tick. On failure the previous rates
/// stay in place.
pub async fn refresh(client: RatesClient, rates: SharedRates, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        match client.latest().await {
            Ok(latest) => {
                *rates.write().await = latest;
                tracing::info!("exchange rates refreshed");
            }
            Err(err) => tracing::warn!("keeping previous exchange rates: {err}"),
        }
    }
}
