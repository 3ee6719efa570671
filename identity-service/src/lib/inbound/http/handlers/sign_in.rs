use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .auth_gateway
        .sign_in(Credentials::new(body.username, body.password))
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token.into()))
}

/// Missing fields deserialize as empty strings and fail as bad credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponseData {
    pub access_token: String,
    pub expires_at: i64,
}

impl From<AccessToken> for SignInResponseData {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.token,
            expires_at: token.expires_at,
        }
    }
}
