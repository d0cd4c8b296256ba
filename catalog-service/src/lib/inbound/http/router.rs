use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::login::login;
use super::handlers::auth::logout::logout;
use super::handlers::auth::me::me;
use super::handlers::auth::register::register;
use super::handlers::categories::create_category::create_category;
use super::handlers::categories::delete_category::delete_category;
use super::handlers::categories::list_categories::list_categories;
use super::handlers::categories::update_category::update_category;
use super::handlers::health::health;
use super::handlers::products::create_product::create_product;
use super::handlers::products::delete_product::delete_product;
use super::handlers::products::get_product::get_product;
use super::handlers::products::list_products::list_products;
use super::handlers::products::update_product::update_product;
use super::middleware::authenticate as auth_middleware;
use crate::config::UploadsConfig;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::product::ports::ProductServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub category_service: Arc<dyn CategoryServicePort>,
    pub product_service: Arc<dyn ProductServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub jwt_expiration_hours: i64,
}

pub fn create_router(state: AppState, uploads: &UploadsConfig) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route(
            "/api/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/categories/:category_id",
            put(update_category).delete(delete_category),
        )
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:product_id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&uploads.directory))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(uploads.max_request_bytes))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
