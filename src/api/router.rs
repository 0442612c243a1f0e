use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

use super::handlers::{audit, auth, farmers, farming, health, home, products};
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Pages
        .route("/", get(home::index))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(farmers::register_form).post(farmers::register))
        .route("/farmerdetails", get(farmers::farmer_details))
        .route("/edit/{rid}", get(farmers::edit_form).post(farmers::edit))
        .route("/delete/{rid}", post(farmers::delete))
        .route("/addfarming", get(farming::farming_page).post(farming::add_farming))
        .route("/agroproducts", get(products::list_products))
        .route(
            "/addagroproduct",
            get(products::product_form).post(products::add_product),
        )
        .route("/triggers", get(audit::triggers))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Full router plus the Prometheus scrape endpoint, when metrics are on
pub fn create_router_with_metrics(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let router = create_router(state);

    match metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics, metrics_path)),
        None => router,
    }
}
