use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use verse_core::story::comments::TreeError;
use verse_core::story::model::StoryFieldError;
use verse_core::story::ratings::RatingError;
use verse_core::testimonial::OpinionError;

/// API error type that maps the domain taxonomy onto JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<TreeError> for ApiError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::EmptyText => ApiError::BadRequest(err.to_string()),
            TreeError::ParentNotFound | TreeError::TargetNotFound => {
                ApiError::NotFound(err.to_string())
            }
            TreeError::NotOwner => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<RatingError> for ApiError {
    fn from(err: RatingError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<OpinionError> for ApiError {
    fn from(err: OpinionError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoryFieldError> for ApiError {
    fn from(err: StoryFieldError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_errors_map_onto_the_http_taxonomy() {
        let forbidden: ApiError = TreeError::NotOwner.into();
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let missing: ApiError = TreeError::TargetNotFound.into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let missing_parent: ApiError = TreeError::ParentNotFound.into();
        assert_eq!(
            missing_parent.into_response().status(),
            StatusCode::NOT_FOUND
        );

        let empty: ApiError = TreeError::EmptyText.into();
        assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let rating: ApiError = RatingError::OutOfRange.into();
        assert_eq!(rating.into_response().status(), StatusCode::BAD_REQUEST);

        let opinion: ApiError = OpinionError::Empty.into();
        assert_eq!(opinion.into_response().status(), StatusCode::BAD_REQUEST);

        let series: ApiError = StoryFieldError::MissingSeriesName.into();
        assert_eq!(series.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_is_401() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
