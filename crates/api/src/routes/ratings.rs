//! Story rating endpoint.
//!
//! The upsert-and-recompute runs inside a transaction holding a row lock on
//! the story, so two concurrent raters cannot lose each other's update and
//! the cached average/count always matches the stored rating set.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;
use verse_core::story::ratings::{self, Rating};

use crate::error::{ApiError, ApiResult};
use crate::extract::Identity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stories/rate", post(rate_story))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatePayload {
    story_id: Uuid,
    rating: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateResponse {
    message: String,
    average_rating: f64,
    rating_count: u32,
}

/// `POST /api/stories/rate` — upsert the caller's rating, one per user.
async fn rate_story(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<RatePayload>,
) -> ApiResult<Json<RateResponse>> {
    let user_id = identity.require()?;
    ratings::validate_score(payload.rating)?;

    let mut tx = state.pool().begin().await?;
    let row: Option<(SqlJson<Vec<Rating>>,)> =
        sqlx::query_as("SELECT ratings FROM stories WHERE id = $1 FOR UPDATE")
            .bind(payload.story_id)
            .fetch_optional(&mut *tx)
            .await?;
    let (SqlJson(mut set),) =
        row.ok_or_else(|| ApiError::NotFound("Story not found.".to_string()))?;

    let summary = ratings::apply(&mut set, user_id, payload.rating)?;

    sqlx::query(
        "UPDATE stories
         SET ratings = $2, average_rating = $3, rating_count = $4, updated_at = now()
         WHERE id = $1",
    )
    .bind(payload.story_id)
    .bind(SqlJson(&set))
    .bind(summary.average_rating)
    .bind(summary.rating_count as i32)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(RateResponse {
        message: "Rating submitted successfully.".to_string(),
        average_rating: summary.average_rating,
        rating_count: summary.rating_count,
    }))
}
