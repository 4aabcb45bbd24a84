//! Reports API endpoint

use api_types::report::{Period, ReportQuery, ReportResponse};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{ReportPeriod, User};

use crate::{
    ServerError,
    mapping::{amount_view, currency_in, currency_out},
    server::ServerState,
};

fn period_from_query(query: &ReportQuery) -> Result<ReportPeriod, ServerError> {
    match query.period.unwrap_or_default() {
        Period::Week => Ok(ReportPeriod::Week),
        Period::Month => Ok(ReportPeriod::Month),
        Period::Custom => match (query.from, query.to) {
            (Some(from), Some(to)) => Ok(ReportPeriod::Custom { from, to }),
            _ => Err(ServerError::Generic(
                "custom period requires 'from' and 'to'".to_string(),
            )),
        },
    }
}

/// Chart series of income and expenses per category.
pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ServerError> {
    let period = period_from_query(&query)?;
    let currency = currency_in(query.currency);
    let today = Utc::now().date_naive();

    let rates = state.rates.read().await.clone();
    let report = state
        .engine
        .period_report(&user.id, period, today, &rates, currency)
        .await?;

    Ok(Json(ReportResponse {
        from: report.from,
        to: report.to,
        currency: currency_out(report.currency),
        labels: report.labels,
        expenses: report.expenses.into_iter().map(amount_view).collect(),
        incomes: report.incomes.into_iter().map(amount_view).collect(),
        target_month: report.target_month.to_string(),
        min_goals: report
            .min_goals
            .into_iter()
            .map(|g| g.map(amount_view))
            .collect(),
        max_goals: report
            .max_goals
            .into_iter()
            .map(|g| g.map(amount_view))
            .collect(),
    }))
}
