use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::UserId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    external_id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: UserId(row.external_id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, IdentityError> {
        let external_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING external_id
            "#,
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
                {
                    return IdentityError::UsernameAlreadyExists(username.to_string());
                }
            }
            IdentityError::DatabaseError(e.to_string())
        })?;

        tracing::debug!(user_id = %external_id, "Identity row inserted");

        Ok(UserId(external_id))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT external_id, username, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Identity::try_from)
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT external_id, username, password_hash, created_at, updated_at
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?
        .map(Identity::try_from)
        .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Identity>, IdentityError> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT external_id, username, password_hash, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Identity::try_from).collect()
    }

    async fn delete(&self, id: &UserId) -> Result<(), IdentityError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
