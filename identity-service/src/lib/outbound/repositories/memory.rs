use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;

/// Process-local credential store.
///
/// Username uniqueness is checked and the row inserted under one write lock, which gives
/// the same guarantee as a unique index.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_key: u64,
    rows: BTreeMap<u64, Identity>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, IdentityError> {
        if password_hash.is_empty() {
            return Err(IdentityError::DatabaseError(
                "password hash must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        if state.rows.values().any(|row| &row.username == username) {
            return Err(IdentityError::UsernameAlreadyExists(username.to_string()));
        }

        let now = Utc::now();
        let identity = Identity {
            id: UserId::new(),
            username: username.clone(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let user_id = identity.id;

        state.next_key += 1;
        let key = state.next_key;
        state.rows.insert(key, identity);

        tracing::debug!(user_id = %user_id, "Identity row inserted");

        Ok(user_id)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let state = self.state.read().await;

        Ok(state
            .rows
            .values()
            .find(|row| &row.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityError> {
        let state = self.state.read().await;

        Ok(state.rows.values().find(|row| &row.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        let state = self.state.read().await;

        Ok(state.rows.values().cloned().collect())
    }

    async fn delete(&self, id: &UserId) -> Result<(), IdentityError> {
        let mut state = self.state.write().await;

        let key = state
            .rows
            .iter()
            .find(|(_, row)| &row.id == id)
            .map(|(key, _)| *key)
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        state.rows.remove(&key);

        Ok(())
    }
}
