use std::collections::HashSet;

use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::identity::models::Principal;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Whether an operation needs a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// Per-operation access table keyed by method and route pattern.
///
/// Anything not listed as public is protected, including routes added later.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    public: HashSet<(Method, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `method path` as public. `path` is the route pattern, e.g. `/users/:id`.
    pub fn public(mut self, method: Method, path: impl Into<String>) -> Self {
        self.public.insert((method, path.into()));
        self
    }

    pub fn access(&self, method: &Method, path: &str) -> Access {
        if self.public.contains(&(method.clone(), path.to_string())) {
            Access::Public
        } else {
            Access::Protected
        }
    }
}

/// Middleware that enforces the route table.
///
/// Public routes pass through untouched. Protected routes need a valid
/// `Authorization: Bearer <token>`; the verified `Principal` is added to request extensions.
pub async fn guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| state.routes.access(req.method(), path.as_str()))
        .unwrap_or(Access::Protected);

    if access == Access::Public {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(&req).ok_or_else(|| {
        tracing::warn!(uri = %req.uri(), "Missing or malformed Authorization header");
        ApiError::unauthorized()
    })?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        ApiError::unauthorized()
    })?;

    let principal = Principal::try_from(claims).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user ID");
        ApiError::unauthorized()
    })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then_some(token)
}
