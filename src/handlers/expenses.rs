use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::database::Expense;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /expenses - create an expense; any `id` in the body is ignored
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Expense>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let Json(expense) = payload?;

    let created = state.store.create(expense).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /expenses/:id
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Expense>, ApiError> {
    let Path(id) = id?;

    let expense = state.store.get(id).await?;
    Ok(Json(expense))
}

/// PUT /expenses/:id - full replacement; the path id wins over the body id
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Expense>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
    let Json(expense) = payload?;
    let Path(id) = id?;

    let updated = state.store.update(expense.with_id(id)).await?;
    Ok(Json(updated))
}

/// GET /expenses
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = state.store.list().await?;
    Ok(Json(expenses))
}
