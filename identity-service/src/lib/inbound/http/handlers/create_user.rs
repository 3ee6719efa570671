use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use super::sign_up::sign_up;
use super::sign_up::SignUpRequestBody;
use super::sign_up::SignUpResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Account creation by an authenticated caller. Same rules and responses as sign-up.
pub async fn create_user(
    state: State<AppState>,
    payload: Result<Json<SignUpRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    sign_up(state, payload).await
}
