use async_trait::async_trait;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::AccessToken;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;

/// Port for sign-up, sign-in and identity management.
#[async_trait]
pub trait AuthGatewayPort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Returns
    /// External ID of the created identity
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidPassword` - Empty or malformed input
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, credentials: Credentials) -> Result<UserId, IdentityError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `TokenSigning` - Token generation failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_in(&self, credentials: Credentials) -> Result<AccessToken, IdentityError>;

    /// Permanently remove an identity.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this ID
    /// * `DatabaseError` - Database operation failed
    async fn remove_user(&self, id: &UserId) -> Result<(), IdentityError>;

    /// Retrieve an identity by external ID.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this ID
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<Identity, IdentityError>;

    /// Retrieve all identities (empty when none exist).
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<Identity>, IdentityError>;
}

/// Persistence boundary for identity records.
///
/// Implementations own username uniqueness: `create` must report a duplicate as
/// `UsernameAlreadyExists` even when two inserts race.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new identity with an already hashed password.
    ///
    /// # Returns
    /// Store-assigned external ID
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, IdentityError>;

    /// Retrieve identity by username.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Identity>, IdentityError>;

    /// Retrieve identity by external ID.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityError>;

    /// Retrieve all identities, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError>;

    /// Hard-delete identity by external ID.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this ID
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), IdentityError>;
}
