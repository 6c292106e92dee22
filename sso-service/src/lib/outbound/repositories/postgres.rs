use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::AppSecret;
use crate::domain::auth::models::Application;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

const USERS_EMAIL_KEY: &str = "users_email_key";

/// PostgreSQL storage gateway for users, applications and admin flags.
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email).map_err(|e| {
            StorageError::Database(format!("Stored email for user {} is invalid: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            email,
            password_hash: PasswordHash::new(row.password_hash),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i32,
    name: String,
    secret: Vec<u8>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Application {
            id: AppId(row.id),
            name: row.name,
            secret: AppSecret::new(row.secret),
        }
    }
}

#[async_trait]
impl UserSaver for PostgresStorage {
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email.as_str())
        .bind(password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some(USERS_EMAIL_KEY) {
                    return StorageError::Conflict(email.to_string());
                }
            }
            StorageError::Database(e.to_string())
        })?;

        Ok(UserId(id))
    }
}

#[async_trait]
impl UserProvider for PostgresStorage {
    async fn find_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_admin_flag(&self, user_id: UserId) -> Result<bool, StorageError> {
        let flag = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_admin
            FROM admin_flags
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(flag.unwrap_or(false))
    }
}

#[async_trait]
impl AppProvider for PostgresStorage {
    async fn find_application(&self, app_id: AppId) -> Result<Option<Application>, StorageError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, name, secret
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(app_id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(row.map(Application::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_conversion() {
        let row = UserRow {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        };

        let user = User::try_from(row).unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.email.as_str(), "a@x.com");
    }

    #[test]
    fn test_user_row_with_corrupt_email() {
        let row = UserRow {
            id: 5,
            email: "corrupt".to_string(),
            password_hash: String::new(),
        };

        let err = User::try_from(row).unwrap_err();
        assert!(matches!(err, StorageError::Database(_)));
        assert!(err.to_string().contains("user 5"));
    }

    #[test]
    fn test_application_row_conversion() {
        let row = ApplicationRow {
            id: 2,
            name: "console".to_string(),
            secret: b"s".to_vec(),
        };

        let application = Application::from(row);
        assert_eq!(application.id, AppId(2));
        assert_eq!(application.secret.as_bytes(), b"s");
    }
}
