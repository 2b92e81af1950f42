pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{delete, get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

/// Headroom over the image limit for the text fields of a form.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings.clone());

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Auth routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        // Stored images
        .nest_service(
            &settings.storage.public_path,
            ServeDir::new(&settings.storage.root),
        )

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(DefaultBodyLimit::max(settings.storage.max_upload_bytes + FORM_OVERHEAD_BYTES))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes())
        .route("/comments/:id", delete(handlers::comments::delete))
        .route("/profile", get(handlers::profile::me).put(handlers::profile::edit))
        .route("/profile/setup", post(handlers::profile::setup))
        .route("/users/:uid", get(handlers::profile::preview))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::feed).post(handlers::announcements::create))
        .route(
            "/:id",
            get(handlers::announcements::detail)
                .put(handlers::announcements::update)
                .delete(handlers::announcements::delete),
        )
        .route(
            "/:id/comments",
            get(handlers::comments::list).post(handlers::comments::create),
        )
}
