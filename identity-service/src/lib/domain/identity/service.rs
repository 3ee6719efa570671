use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Password;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::AuthGatewayPort;
use crate::domain::identity::ports::CredentialStore;

/// Plaintext behind the hash verified when a sign-in names an unknown user.
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

/// Sign-up and sign-in orchestration over a credential store.
///
/// Password hashing and token issuance are delegated to the shared `Authenticator`.
pub struct AuthGateway<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    unknown_user_hash: String,
}

impl<CS> AuthGateway<CS>
where
    CS: CredentialStore,
{
    /// Create a new gateway with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Identity persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        // Hashed with the configured cost so an unknown username costs one full verify.
        let unknown_user_hash = authenticator
            .hash_password(UNKNOWN_USER_PASSWORD)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to prepare unknown-user hash");
                String::new()
            });

        Self {
            store,
            authenticator,
            unknown_user_hash,
        }
    }
}

#[async_trait]
impl<CS> AuthGatewayPort for AuthGateway<CS>
where
    CS: CredentialStore,
{
    async fn sign_up(&self, credentials: Credentials) -> Result<UserId, IdentityError> {
        let username = Username::new(credentials.username)?;
        let password = Password::new(credentials.password)?;

        // Fast rejection only; the store's unique constraint is authoritative.
        if self.store.find_by_username(&username).await?.is_some() {
            tracing::info!(username = %username, "Sign-up rejected: username taken");
            return Err(IdentityError::UsernameAlreadyExists(username.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(password.as_str())
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;

        let user_id = self.store.create(&username, &password_hash).await?;

        tracing::info!(user_id = %user_id, username = %username, "User signed up");

        Ok(user_id)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<AccessToken, IdentityError> {
        let Ok(username) = Username::new(credentials.username) else {
            return Err(IdentityError::InvalidCredentials);
        };

        let Some(identity) = self.store.find_by_username(&username).await? else {
            self.authenticator
                .verify_password(&credentials.password, &self.unknown_user_hash);
            tracing::debug!(username = %username, "Sign-in failed");
            return Err(IdentityError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                &credentials.password,
                &identity.password_hash,
                identity.id,
                identity.username.as_str(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(username = %username, "Sign-in failed");
                    IdentityError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => IdentityError::TokenSigning(err.to_string()),
            })?;

        tracing::info!(user_id = %identity.id, "User signed in");

        Ok(AccessToken {
            token: result.access_token,
            expires_at: result.expires_at,
        })
    }

    async fn remove_user(&self, id: &UserId) -> Result<(), IdentityError> {
        self.store.delete(id).await?;

        tracing::info!(user_id = %id, "User removed");

        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Identity, IdentityError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<Identity>, IdentityError> {
        self.store.list_all().await
    }
}
