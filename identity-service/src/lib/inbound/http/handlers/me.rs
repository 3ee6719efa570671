use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use crate::domain::identity::models::Principal;

/// Echo the principal the guard attached to this request.
pub async fn me(Extension(principal): Extension<Principal>) -> ApiSuccess<Principal> {
    ApiSuccess::new(StatusCode::OK, principal)
}
