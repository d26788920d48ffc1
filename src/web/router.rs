//! Web application router and middleware setup.

use crate::state::SharedState;
use crate::web::config::WebConfig;
use crate::web::handlers;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, state: SharedState) -> Router {
    let v1 = Router::new()
        .route("/current", get(handlers::get_current))
        .route("/history", get(handlers::get_history))
        .route("/moreInfo", get(handlers::get_more_info))
        .route("/health", get(handlers::health_check));

    let mut app = Router::new().nest("/v1", v1).with_state(state);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
