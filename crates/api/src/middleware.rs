use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the CORS layer. Permissive for development; tighten for production.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the tracing layer for request/response logging.
pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}
