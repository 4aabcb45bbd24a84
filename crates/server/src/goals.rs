//! Goals API endpoints

use api_types::{
    CurrencyQuery,
    goal::{GoalNew, GoalView, GoalsResponse},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{Currency, ExchangeRates, ExpenseFilter, GoalItem, MoneyCents, User, reports};

use crate::{
    ServerError,
    mapping::{currency_in, kind_in, kind_out, render},
    server::ServerState,
};

fn map_goal_item(item: GoalItem, rates: &ExchangeRates, currency: Currency) -> GoalView {
    let status = item.status().label().to_string();
    let progress_percent = item.progress_percent();
    let goal = item.goal;
    GoalView {
        id: goal.id,
        month: goal.month,
        category: goal.category,
        category_id: goal.category_id,
        kind: kind_out(goal.kind),
        description: goal.description,
        photo_path: goal.photo_path,
        min_goal: render(rates, goal.min_goal, currency),
        max_goal: render(rates, goal.max_goal, currency),
        total_spent: render(rates, item.total_spent, currency),
        status,
        progress_percent,
    }
}

/// Every goal with its progress.
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<GoalsResponse>, ServerError> {
    let currency = currency_in(query.currency);
    let items = state.engine.goal_items(&user.id).await?;

    let rates = state.rates.read().await;
    Ok(Json(GoalsResponse {
        goals: items
            .into_iter()
            .map(|item| map_goal_item(item, &rates, currency))
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let new = engine::GoalNew {
        month: payload.month,
        category: payload.category,
        kind: kind_in(payload.kind),
        description: payload.description,
        photo_path: payload.photo_path,
        min_goal: MoneyCents::new(payload.min_goal_minor),
        max_goal: MoneyCents::new(payload.max_goal_minor),
    };
    let goal = state.engine.create_goal(&user.id, new).await?;
    let expenses = state
        .engine
        .list_expenses(&user.id, &ExpenseFilter::default())
        .await?;
    let item = GoalItem {
        total_spent: reports::goal_total_spent(&goal, &expenses)?,
        goal,
    };

    let rates = state.rates.read().await;
    Ok((
        StatusCode::CREATED,
        Json(map_goal_item(item, &rates, Currency::Zar)),
    ))
}
