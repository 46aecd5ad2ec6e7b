//! Story CRUD and read endpoints.
//!
//! Reads are public for published stories; drafts and all mutations are
//! admin-gated. Listing returns summaries without the embedded trees;
//! fetching a single story resolves its full comment tree.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verse_core::story::model::{validate_story_fields, StoryRow};

use crate::error::{ApiError, ApiResult};
use crate::extract::{is_admin, require_admin, Identity};
use crate::routes::comments::{resolve_comments, CommentView};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/stories", get(list_stories).post(create_story))
        .route(
            "/api/stories/{id}",
            get(get_story).put(update_story).delete(delete_story),
        )
}

/// Listing entry: no embedded trees, just the cached rating projection and
/// a comment count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryListItem {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    cover_image: String,
    tags: Vec<String>,
    is_published: bool,
    is_featured: bool,
    is_series: bool,
    series_name: Option<String>,
    average_rating: f64,
    rating_count: i32,
    comment_count: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoryRow> for StoryListItem {
    fn from(row: StoryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            cover_image: row.cover_image,
            tags: row.tags,
            is_published: row.is_published,
            is_featured: row.is_featured,
            is_series: row.is_series,
            series_name: row.series_name,
            average_rating: row.average_rating,
            rating_count: row.rating_count,
            comment_count: row.comments.0.len(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A full story with its resolved comment tree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryDetail {
    id: Uuid,
    title: String,
    description: String,
    content: String,
    category: String,
    cover_image: String,
    tags: Vec<String>,
    is_published: bool,
    is_featured: bool,
    is_series: bool,
    series_name: Option<String>,
    average_rating: f64,
    rating_count: i32,
    comments: Vec<CommentView>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoryDetail {
    fn new(row: StoryRow, comments: Vec<CommentView>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            content: row.content,
            category: row.category,
            cover_image: row.cover_image,
            tags: row.tags,
            is_published: row.is_published,
            is_featured: row.is_featured,
            is_series: row.is_series,
            series_name: row.series_name,
            average_rating: row.average_rating,
            rating_count: row.rating_count,
            comments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct StoriesResponse {
    stories: Vec<StoryListItem>,
}

#[derive(Debug, Serialize)]
struct StoryResponse {
    message: String,
    story: StoryDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryPayload {
    title: String,
    description: String,
    content: String,
    category: String,
    cover_image: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    is_featured: bool,
    #[serde(default)]
    is_series: bool,
    #[serde(default)]
    series_name: Option<String>,
}

impl StoryPayload {
    fn validate(&self) -> ApiResult<()> {
        validate_story_fields(
            &self.title,
            &self.description,
            &self.content,
            &self.category,
            &self.cover_image,
            self.is_series,
            self.series_name.as_deref(),
        )?;
        Ok(())
    }

    /// The series name as stored: `NULL` unless the story is a series.
    fn series_name_for_storage(&self) -> Option<&str> {
        if self.is_series {
            self.series_name.as_deref()
        } else {
            None
        }
    }
}

/// `GET /api/stories` — published stories for everyone, drafts included for
/// admins; newest first.
async fn list_stories(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<StoriesResponse>> {
    let admin = is_admin(state.pool(), identity).await?;
    let rows: Vec<StoryRow> = if admin {
        sqlx::query_as("SELECT * FROM stories ORDER BY created_at DESC")
            .fetch_all(state.pool())
            .await?
    } else {
        sqlx::query_as("SELECT * FROM stories WHERE is_published ORDER BY created_at DESC")
            .fetch_all(state.pool())
            .await?
    };
    Ok(Json(StoriesResponse {
        stories: rows.into_iter().map(StoryListItem::from).collect(),
    }))
}

/// `GET /api/stories/{id}` — full story with resolved comments. Unpublished
/// drafts are visible to admins only.
async fn get_story(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StoryResponse>> {
    let row: StoryRow = sqlx::query_as("SELECT * FROM stories WHERE id = $1")
        .bind(id)
        .fetch_optional(state.pool())
        .await?
        .ok_or_else(|| ApiError::NotFound("Story not found.".to_string()))?;

    if !row.is_published {
        let user_id = identity.require()?;
        require_admin(state.pool(), user_id)
            .await
            .map_err(|_| ApiError::Forbidden("Only Admin can view drafts.".to_string()))?;
    }

    let comments = resolve_comments(state.pool(), &row.comments.0).await?;
    Ok(Json(StoryResponse {
        message: "Story fetched successfully.".to_string(),
        story: StoryDetail::new(row, comments),
    }))
}

/// `POST /api/stories` — admin only.
async fn create_story(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<StoryPayload>,
) -> ApiResult<(StatusCode, Json<StoryResponse>)> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;
    payload.validate()?;

    let row: StoryRow = sqlx::query_as(
        "INSERT INTO stories
             (title, description, content, category, cover_image, tags,
              is_published, is_featured, is_series, series_name)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(&payload.category)
    .bind(&payload.cover_image)
    .bind(&payload.tags)
    .bind(payload.is_published)
    .bind(payload.is_featured)
    .bind(payload.is_series)
    .bind(payload.series_name_for_storage())
    .fetch_one(state.pool())
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StoryResponse {
            message: "Story created successfully.".to_string(),
            story: StoryDetail::new(row, Vec::new()),
        }),
    ))
}

/// `PUT /api/stories/{id}` — admin only; full replace of the editable
/// fields. Ratings and comments are untouched.
async fn update_story(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<StoryPayload>,
) -> ApiResult<Json<StoryResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;
    payload.validate()?;

    let row: StoryRow = sqlx::query_as(
        "UPDATE stories
         SET title = $2, description = $3, content = $4, category = $5,
             cover_image = $6, tags = $7, is_published = $8, is_featured = $9,
             is_series = $10, series_name = $11, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(&payload.category)
    .bind(&payload.cover_image)
    .bind(&payload.tags)
    .bind(payload.is_published)
    .bind(payload.is_featured)
    .bind(payload.is_series)
    .bind(payload.series_name_for_storage())
    .fetch_optional(state.pool())
    .await?
    .ok_or_else(|| ApiError::NotFound("Story not found for update.".to_string()))?;

    let comments = resolve_comments(state.pool(), &row.comments.0).await?;
    Ok(Json(StoryResponse {
        message: "Story updated successfully.".to_string(),
        story: StoryDetail::new(row, comments),
    }))
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: String,
}

/// `DELETE /api/stories/{id}` — admin only. Embedded comments and ratings
/// go with the row.
async fn delete_story(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;

    let deleted: Option<(Uuid,)> = sqlx::query_as("DELETE FROM stories WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(state.pool())
        .await?;
    if deleted.is_none() {
        return Err(ApiError::NotFound("Story not found for deletion.".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Story deleted successfully.".to_string(),
    }))
}
