use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::Credentials;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .auth_gateway
        .sign_up(Credentials::new(body.username, body.password))
        .await
        .map_err(ApiError::from)
        .map(|user_id| {
            ApiSuccess::new(
                StatusCode::CREATED,
                SignUpResponseData {
                    external_id: user_id.to_string(),
                },
            )
        })
}

/// Missing fields deserialize as empty strings so they surface as validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponseData {
    pub external_id: String,
}
