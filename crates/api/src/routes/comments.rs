//! Comment and reply endpoints.
//!
//! Every mutation runs as one transaction: lock the story row, rewrite the
//! embedded tree in memory, write it back. The response always carries the
//! entire refreshed tree with author display info attached, so clients can
//! replace their view atomically.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use verse_core::story::comments::{self, Comment};
use verse_core::user::AuthorInfo;

use crate::error::{ApiError, ApiResult};
use crate::extract::Identity;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/stories/comments",
        post(add_comment).put(edit_comment).delete(delete_comment),
    )
}

/// A comment with its author resolved for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub author: Option<AuthorInfo>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: Uuid,
    pub author: Option<AuthorInfo>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct CommentsResponse {
    message: String,
    comments: Vec<CommentView>,
}

/// Attach author display info to every comment and reply in the tree.
/// Authors whose accounts have since disappeared resolve to `None`.
pub async fn resolve_comments(
    pool: &PgPool,
    comments: &[Comment],
) -> ApiResult<Vec<CommentView>> {
    let mut author_ids: Vec<Uuid> = comments
        .iter()
        .flat_map(|c| std::iter::once(c.user_id).chain(c.replies.iter().map(|r| r.user_id)))
        .collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: Vec<AuthorInfo> = sqlx::query_as(
        "SELECT id, name, username, profile_image FROM users WHERE id = ANY($1)",
    )
    .bind(&author_ids)
    .fetch_all(pool)
    .await?;
    let by_id: HashMap<Uuid, AuthorInfo> =
        authors.into_iter().map(|a| (a.id, a)).collect();

    Ok(comments
        .iter()
        .map(|c| CommentView {
            id: c.id,
            author: by_id.get(&c.user_id).cloned(),
            text: c.text.clone(),
            created_at: c.created_at,
            replies: c
                .replies
                .iter()
                .map(|r| ReplyView {
                    id: r.id,
                    author: by_id.get(&r.user_id).cloned(),
                    text: r.text.clone(),
                    created_at: r.created_at,
                })
                .collect(),
        })
        .collect())
}

/// Lock the story row and load its comment tree.
async fn load_comments_for_update(
    tx: &mut Transaction<'_, Postgres>,
    story_id: Uuid,
) -> ApiResult<Vec<Comment>> {
    let row: Option<(SqlJson<Vec<Comment>>,)> =
        sqlx::query_as("SELECT comments FROM stories WHERE id = $1 FOR UPDATE")
            .bind(story_id)
            .fetch_optional(&mut **tx)
            .await?;
    let (SqlJson(comments),) =
        row.ok_or_else(|| ApiError::NotFound("Story not found.".to_string()))?;
    Ok(comments)
}

async fn store_comments(
    tx: &mut Transaction<'_, Postgres>,
    story_id: Uuid,
    comments: &[Comment],
) -> ApiResult<()> {
    sqlx::query("UPDATE stories SET comments = $2, updated_at = now() WHERE id = $1")
        .bind(story_id)
        .bind(SqlJson(comments))
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCommentPayload {
    story_id: Uuid,
    comment_text: String,
    #[serde(default)]
    parent_comment_id: Option<Uuid>,
}

/// `POST /api/stories/comments` — top-level comment, or a reply when
/// `parentCommentId` is given.
async fn add_comment(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<AddCommentPayload>,
) -> ApiResult<(StatusCode, Json<CommentsResponse>)> {
    let user_id = identity.require()?;

    let mut tx = state.pool().begin().await?;
    let mut tree = load_comments_for_update(&mut tx, payload.story_id).await?;
    let message = match payload.parent_comment_id {
        Some(parent_id) => {
            comments::push_reply(&mut tree, parent_id, user_id, &payload.comment_text)?;
            "Reply posted successfully."
        }
        None => {
            comments::push_comment(&mut tree, user_id, &payload.comment_text)?;
            "Comment posted successfully."
        }
    };
    store_comments(&mut tx, payload.story_id, &tree).await?;
    tx.commit().await?;

    let comments = resolve_comments(state.pool(), &tree).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentsResponse {
            message: message.to_string(),
            comments,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditCommentPayload {
    story_id: Uuid,
    comment_id: Uuid,
    new_text: String,
}

/// `PUT /api/stories/comments` — edit a comment or reply; author only.
async fn edit_comment(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<EditCommentPayload>,
) -> ApiResult<Json<CommentsResponse>> {
    let user_id = identity.require()?;

    let mut tx = state.pool().begin().await?;
    let mut tree = load_comments_for_update(&mut tx, payload.story_id).await?;
    comments::edit_text(&mut tree, payload.comment_id, user_id, &payload.new_text)?;
    store_comments(&mut tx, payload.story_id, &tree).await?;
    tx.commit().await?;

    let comments = resolve_comments(state.pool(), &tree).await?;
    Ok(Json(CommentsResponse {
        message: "Comment updated successfully.".to_string(),
        comments,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCommentParams {
    story_id: Uuid,
    comment_id: Uuid,
}

/// `DELETE /api/stories/comments?storyId=..&commentId=..` — remove a comment
/// (with all its replies) or a single reply; author only.
async fn delete_comment(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<DeleteCommentParams>,
) -> ApiResult<Json<CommentsResponse>> {
    let user_id = identity.require()?;

    let mut tx = state.pool().begin().await?;
    let mut tree = load_comments_for_update(&mut tx, params.story_id).await?;
    comments::remove(&mut tree, params.comment_id, user_id)?;
    store_comments(&mut tx, params.story_id, &tree).await?;
    tx.commit().await?;

    let comments = resolve_comments(state.pool(), &tree).await?;
    Ok(Json(CommentsResponse {
        message: "Comment deleted successfully.".to_string(),
        comments,
    }))
}
