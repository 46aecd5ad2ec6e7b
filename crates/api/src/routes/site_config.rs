//! The global site-configuration document.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use verse_core::site_config::{SiteConfigRow, CONFIG_ID, DEFAULTS};

use crate::error::ApiResult;
use crate::extract::{require_admin, Identity};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(get_config))
        .route("/api/admin/config", axum::routing::put(update_config))
}

#[derive(Debug, Serialize)]
struct ConfigResponse {
    config: SiteConfigRow,
}

/// `GET /api/config` — public; seeds the default row on first access.
async fn get_config(State(state): State<AppState>) -> ApiResult<Json<ConfigResponse>> {
    sqlx::query(
        "INSERT INTO site_config
             (config_id, hero_title, hero_subtitle, about_summary,
              about_bio_long, author_image_url, admin_profile_image)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (config_id) DO NOTHING",
    )
    .bind(CONFIG_ID)
    .bind(DEFAULTS.hero_title)
    .bind(DEFAULTS.hero_subtitle)
    .bind(DEFAULTS.about_summary)
    .bind(DEFAULTS.about_bio_long)
    .bind(DEFAULTS.author_image_url)
    .bind(DEFAULTS.admin_profile_image)
    .execute(state.pool())
    .await?;

    let config: SiteConfigRow = sqlx::query_as("SELECT * FROM site_config WHERE config_id = $1")
        .bind(CONFIG_ID)
        .fetch_one(state.pool())
        .await?;
    Ok(Json(ConfigResponse { config }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateConfigPayload {
    hero_title: String,
    hero_subtitle: String,
    about_summary: String,
    about_bio_long: String,
    author_image_url: String,
}

/// `PUT /api/admin/config` — admin; full replace of the editable text and
/// image fields. All fields are resent even when only one changed.
async fn update_config(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<UpdateConfigPayload>,
) -> ApiResult<Json<ConfigResponse>> {
    let user_id = identity.require()?;
    require_admin(state.pool(), user_id).await?;

    let config: SiteConfigRow = sqlx::query_as(
        "INSERT INTO site_config
             (config_id, hero_title, hero_subtitle, about_summary,
              about_bio_long, author_image_url, admin_profile_image)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (config_id) DO UPDATE SET
             hero_title = EXCLUDED.hero_title,
             hero_subtitle = EXCLUDED.hero_subtitle,
             about_summary = EXCLUDED.about_summary,
             about_bio_long = EXCLUDED.about_bio_long,
             author_image_url = EXCLUDED.author_image_url,
             updated_at = now()
         RETURNING *",
    )
    .bind(CONFIG_ID)
    .bind(&payload.hero_title)
    .bind(&payload.hero_subtitle)
    .bind(&payload.about_summary)
    .bind(&payload.about_bio_long)
    .bind(&payload.author_image_url)
    .bind(DEFAULTS.admin_profile_image)
    .fetch_one(state.pool())
    .await?;

    Ok(Json(ConfigResponse { config }))
}
