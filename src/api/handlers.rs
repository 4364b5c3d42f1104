use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::category::Category;
use crate::error::AppError;
use crate::normalize::ClassifiedAnswer;
use crate::service::{self, ModeResponse};
use crate::AppState;

use super::models::{AskRequest, ErrorResponse, RespondRequest};

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<ClassifiedAnswer>, AppError> {
    let Json(payload) = payload?;

    let answer = service::ask(state.model.as_ref(), &payload.message).await?;
    Ok(Json(answer))
}

pub async fn respond(
    State(state): State<AppState>,
    payload: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<Json<ModeResponse>, AppError> {
    let Json(payload) = payload?;
    let category = payload
        .category
        .as_deref()
        .map(Category::parse)
        .unwrap_or_default();

    let response = service::respond(state.model.as_ref(), &payload.prompt, category).await?;
    Ok(Json(response))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
