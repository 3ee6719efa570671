use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::guard::guard;
use super::guard::RouteTable;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::me::me;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use crate::domain::identity::ports::AuthGatewayPort;

pub const SIGN_IN: &str = "/auth/sign-in";
pub const SIGN_UP: &str = "/auth/sign-up";
pub const ME: &str = "/auth/me";
pub const USERS: &str = "/users";
pub const USER: &str = "/users/:id";

#[derive(Clone)]
pub struct AppState {
    pub auth_gateway: Arc<dyn AuthGatewayPort>,
    pub authenticator: Arc<Authenticator>,
    pub routes: Arc<RouteTable>,
}

/// Access table for every route this service exposes. Only the credential exchanges are public.
pub fn route_table() -> RouteTable {
    RouteTable::new()
        .public(Method::POST, SIGN_IN)
        .public(Method::POST, SIGN_UP)
}

pub fn create_router(
    auth_gateway: Arc<dyn AuthGatewayPort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        auth_gateway,
        authenticator,
        routes: Arc::new(route_table()),
    };

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
        .route(SIGN_IN, post(sign_in))
        .route(SIGN_UP, post(sign_up))
        .route(ME, get(me))
        .route(USERS, get(list_users).post(create_user))
        .route(USER, get(get_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
