//! API router.
//!
//! Returns a composable `Router` mounted under `/api/`.
//!
//! Two route groups share the prefix: a public group (health, registration,
//! login, doctor roster) and a protected group behind the bearer-token
//! middleware. Middleware uses `Extension<ApiContext>` (injected as the
//! outermost layer); endpoint handlers use `State<ApiContext>`.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config;

/// Build the full API router with CORS and auth middleware.
pub fn api_router(ctx: ApiContext) -> Router {
    // Protected routes — bearer token required.
    //
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → Auth → Handler
    // Extension must be outermost so the middleware can access ApiContext.
    let protected = Router::new()
        .route(
            "/doctors/:id",
            get(endpoints::doctors::get)
                .put(endpoints::doctors::update)
                .delete(endpoints::doctors::delete),
        )
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::get)
                .put(endpoints::patients::update)
                .delete(endpoints::patients::delete),
        )
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::get)
                .put(endpoints::appointments::update)
                .delete(endpoints::appointments::delete),
        )
        .route(
            "/prescriptions",
            get(endpoints::prescriptions::list).post(endpoints::prescriptions::create),
        )
        .route("/prescriptions/generate", post(endpoints::prescriptions::generate))
        .route("/prescriptions/validate", post(endpoints::prescriptions::validate))
        .route(
            "/prescriptions/:id",
            get(endpoints::prescriptions::get)
                .put(endpoints::prescriptions::update)
                .delete(endpoints::prescriptions::delete),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    // Public routes — no auth. Doctor listing and creation stay open: the
    // booking screen shows the roster, and creation is registration.
    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::auth::register),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", protected)
        .nest("/api", public)
        .layer(cors_layer())
}

/// CORS with the fixed office-front-end allow-list.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::ALLOWED_ORIGINS
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
