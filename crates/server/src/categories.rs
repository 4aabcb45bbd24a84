//! Categories API endpoints.

use api_types::{
    CurrencyQuery,
    category::{
        CategoriesResponse, CategoryNew, CategoryTotalView, CategoryTotalsResponse, CategoryView,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{ExpenseFilter, User};

use crate::{
    ServerError,
    mapping::{currency_in, render},
    server::ServerState,
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let names = state.engine.category_names(&user.id).await?;
    let custom = state
        .engine
        .list_categories(&user.id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoriesResponse { names, custom }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .create_category(&user.id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

/// Signed totals per category plus the overall balance.
pub async fn totals(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<CurrencyQuery>,
) -> Result<Json<CategoryTotalsResponse>, ServerError> {
    let currency = currency_in(query.currency);
    let totals = state
        .engine
        .category_totals(&user.id, &ExpenseFilter::default())
        .await?;
    let balance = state.engine.balance(&user.id).await?;

    let rates = state.rates.read().await;
    Ok(Json(CategoryTotalsResponse {
        totals: totals
            .into_iter()
            .map(|t| CategoryTotalView {
                category: t.category,
                total: render(&rates, t.total, currency),
            })
            .collect(),
        balance: render(&rates, balance, currency),
    }))
}
