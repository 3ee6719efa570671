use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&id).map_err(IdentityError::from)?;

    state
        .auth_gateway
        .remove_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
