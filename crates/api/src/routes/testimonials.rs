//! Testimonial submission and moderation endpoints.
//!
//! One testimonial per user, enforced by the unique index on `user_id`
//! rather than a pre-check query, so concurrent submissions cannot slip
//! past each other. Moderation (publish, edit, delete) is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verse_core::story::ratings::validate_score;
use verse_core::testimonial::{
    validate_opinion, TestimonialRow, DEFAULT_AUTHOR_TITLE, DEFAULT_RATING,
};
use verse_core::user::UserRow;

use crate::error::{ApiError, ApiResult};
use crate::extract::{require_admin, Identity};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/testimonials", get(list_published).post(create_testimonial))
        .route("/api/admin/testimonials", get(list_all))
        .route(
            "/api/admin/testimonials/{id}",
            axum::routing::put(update_testimonial).delete(delete_testimonial),
        )
}

const PUBLISHED_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
struct TestimonialsResponse {
    testimonials: Vec<TestimonialRow>,
}

#[derive(Debug, Serialize)]
struct TestimonialResponse {
    message: String,
    testimonial: TestimonialRow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTestimonialPayload {
    opinion: String,
    #[serde(default)]
    author_title: Option<String>,
    #[serde(default)]
    rating: Option<u8>,
}

/// `POST /api/testimonials` — authenticated; starts unpublished.
async fn create_testimonial(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<CreateTestimonialPayload>,
) -> ApiResult<(StatusCode, Json<TestimonialResponse>)> {
    let user_id = identity.require()?;
    let opinion = validate_opinion(&payload.opinion)?;
    let rating = match payload.rating {
        Some(score) => {
            validate_score(score)?;
            i16::from(score)
        }
        None => DEFAULT_RATING,
    };
    let author_title = payload
        .author_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUTHOR_TITLE.to_string());

    let author: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(state.pool())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
    let author_name = author.display_name().to_string();

    let inserted = sqlx::query_as::<_, TestimonialRow>(
        "INSERT INTO testimonials (user_id, author_name, author_title, opinion, rating)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&author_name)
    .bind(&author_title)
    .bind(&opinion)
    .bind(rating)
    .fetch_one(state.pool())
    .await;

    let testimonial = match inserted {
        Ok(row) => row,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::BadRequest(
                "You have already submitted an opinion. Only one submission per user is allowed."
                    .to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(TestimonialResponse {
            message: "Thank you! Your opinion has been submitted for review.".to_string(),
            testimonial,
        }),
    ))
}

/// `GET /api/testimonials` — public; published only, newest first.
async fn list_published(State(state): State<AppState>) -> ApiResult<Json<TestimonialsResponse>> {
    let testimonials: Vec<TestimonialRow> = sqlx::query_as(
        "SELECT * FROM testimonials WHERE is_published ORDER BY created_at DESC LIMIT $1",
    )
    .bind(PUBLISHED_LIMIT)
    .fetch_all(state.pool())
    .await?;
    Ok(Json(TestimonialsResponse { testimonials }))
}

/// `GET /api/admin/testimonials` — admin; everything, newest first.
async fn list_all(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<TestimonialsResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;

    let testimonials: Vec<TestimonialRow> =
        sqlx::query_as("SELECT * FROM testimonials ORDER BY created_at DESC")
            .fetch_all(state.pool())
            .await?;
    Ok(Json(TestimonialsResponse { testimonials }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTestimonialPayload {
    opinion: String,
    #[serde(default)]
    author_title: Option<String>,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    is_published: Option<bool>,
}

/// `PUT /api/admin/testimonials/{id}` — admin; edits text/title/rating and
/// flips publication. Omitted optional fields keep their stored values.
async fn update_testimonial(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTestimonialPayload>,
) -> ApiResult<Json<TestimonialResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;

    let opinion = validate_opinion(&payload.opinion)?;
    let rating = match payload.rating {
        Some(score) => {
            validate_score(score)?;
            Some(i16::from(score))
        }
        None => None,
    };

    let testimonial: TestimonialRow = sqlx::query_as(
        "UPDATE testimonials
         SET opinion = $2,
             author_title = COALESCE($3, author_title),
             rating = COALESCE($4, rating),
             is_published = COALESCE($5, is_published),
             updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&opinion)
    .bind(payload.author_title.as_deref())
    .bind(rating)
    .bind(payload.is_published)
    .fetch_optional(state.pool())
    .await?
    .ok_or_else(|| ApiError::NotFound("Testimonial not found for update.".to_string()))?;

    Ok(Json(TestimonialResponse {
        message: "Testimonial updated successfully.".to_string(),
        testimonial,
    }))
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: String,
}

/// `DELETE /api/admin/testimonials/{id}` — admin; unconditional.
async fn delete_testimonial(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;

    let deleted: Option<(Uuid,)> =
        sqlx::query_as("DELETE FROM testimonials WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(state.pool())
            .await?;
    if deleted.is_none() {
        return Err(ApiError::NotFound(
            "Testimonial not found for deletion.".to_string(),
        ));
    }

    Ok(Json(DeleteResponse {
        message: "Testimonial deleted successfully.".to_string(),
    }))
}
