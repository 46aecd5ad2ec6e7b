pub mod comments;
pub mod health;
pub mod ratings;
pub mod site_config;
pub mod stories;
pub mod testimonials;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(stories::routes())
        .merge(comments::routes())
        .merge(ratings::routes())
        .merge(testimonials::routes())
        .merge(site_config::routes())
        .with_state(state)
}
