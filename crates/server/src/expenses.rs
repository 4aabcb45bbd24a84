//! Expenses API endpoints

use api_types::transaction::{ExpenseList, ExpenseListResponse, ExpenseNew, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Days;
use engine::{Currency, ExchangeRates, Expense, ExpenseFilter, MoneyCents, User, dates};

use crate::{
    ServerError,
    mapping::{currency_in, kind_in, kind_out, render},
    server::ServerState,
};

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 500;

fn map_expense(expense: Expense, rates: &ExchangeRates, currency: Currency) -> ExpenseView {
    ExpenseView {
        amount: render(rates, expense.amount, currency),
        id: expense.id,
        kind: kind_out(expense.kind),
        category: expense.category,
        category_id: expense.category_id,
        date: expense.date,
        occurred_at: expense.occurred_at,
        start_time: expense.start_time,
        end_time: expense.end_time,
        description: expense.description,
        photo_path: expense.photo_path,
    }
}

fn filter_from_query(query: &ExpenseList) -> Result<ExpenseFilter, ServerError> {
    let to = match query.to {
        Some(to) => {
            let next_day = to
                .checked_add_days(Days::new(1))
                .ok_or_else(|| ServerError::Generic("invalid 'to' date".to_string()))?;
            Some(dates::midnight_utc(next_day))
        }
        None => None,
    };
    Ok(ExpenseFilter {
        kind: query.kind.map(kind_in),
        category: query.category.clone(),
        from: query.from.map(dates::midnight_utc),
        to,
    })
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseList>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let currency = currency_in(query.currency);
    let filter = filter_from_query(&query)?;

    let (expenses, next_cursor) = state
        .engine
        .list_expenses_page(&user.id, limit, query.cursor.as_deref(), &filter)
        .await?;

    let rates = state.rates.read().await;
    Ok(Json(ExpenseListResponse {
        expenses: expenses
            .into_iter()
            .map(|e| map_expense(e, &rates, currency))
            .collect(),
        next_cursor,
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let new = engine::ExpenseNew {
        amount: MoneyCents::new(payload.amount_minor),
        category: payload.category,
        kind: kind_in(payload.kind),
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        description: payload.description,
        photo_path: payload.photo_path,
    };
    let expense = state.engine.create_expense(&user.id, new).await?;

    let rates = state.rates.read().await;
    Ok((
        StatusCode::CREATED,
        Json(map_expense(expense, &rates, Currency::Zar)),
    ))
}
