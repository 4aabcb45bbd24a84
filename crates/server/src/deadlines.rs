//! Deadlines API endpoints

use api_types::{
    CurrencyQuery,
    deadline::{DeadlineNew, DeadlineView, DeadlinesResponse},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{Currency, Deadline, ExchangeRates, MoneyCents, User};

use crate::{
    ServerError,
    mapping::{currency_in, render},
    server::ServerState,
};

fn map_deadline(deadline: Deadline, rates: &ExchangeRates, currency: Currency) -> DeadlineView {
    DeadlineView {
        days: deadline.days(),
        amount: render(rates, deadline.amount, currency),
        notified: deadline.notified_at.is_some(),
        id: deadline.id,
        title: deadline.title,
        category: deadline.category,
        notes: deadline.notes,
        start_date: deadline.start_date,
        end_date: deadline.end_date,
        remind_at: deadline.remind_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<DeadlinesResponse>, ServerError> {
    let currency = currency_in(query.currency);
    let deadlines = state.engine.list_deadlines(&user.id).await?;

    let rates = state.rates.read().await;
    Ok(Json(DeadlinesResponse {
        deadlines: deadlines
            .into_iter()
            .map(|d| map_deadline(d, &rates, currency))
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<DeadlineNew>,
) -> Result<(StatusCode, Json<DeadlineView>), ServerError> {
    let new = engine::DeadlineNew {
        title: payload.title,
        amount: MoneyCents::new(payload.amount_minor),
        category: payload.category,
        notes: payload.notes,
        start_date: payload.start_date,
        end_date: payload.end_date,
        remind_time: payload.remind_time,
    };
    let deadline = state.engine.create_deadline(&user.id, new).await?;

    let rates = state.rates.read().await;
    Ok((
        StatusCode::CREATED,
        Json(map_deadline(deadline, &rates, Currency::Zar)),
    ))
}
