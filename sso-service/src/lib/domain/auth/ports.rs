use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::Application;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated email and password
    ///
    /// # Returns
    /// Identifier of the created user
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AuthError>;

    /// Verify credentials and issue a token for the requested application.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and application ID
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `ApplicationNotFound` - No application with this ID
    /// * `Internal` - Storage, hashing or signing failed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, AuthError>;

    /// Report whether a user holds admin privilege.
    ///
    /// # Returns
    /// `false` when no admin record exists
    ///
    /// # Errors
    /// * `Internal` - Storage failed
    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError>;
}

/// Persists new users.
#[async_trait]
pub trait UserSaver: Send + Sync + 'static {
    /// Store a user and return its generated identifier.
    ///
    /// Either the row is written or nothing is.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Database` - Database operation failed
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError>;
}

/// Reads users and their privileges.
#[async_trait]
pub trait UserProvider: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_user_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, StorageError>;

    /// Retrieve the admin flag of a user.
    ///
    /// # Returns
    /// Stored flag, or `false` when no record exists
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_admin_flag(&self, user_id: UserId) -> Result<bool, StorageError>;
}

/// Reads pre-provisioned applications.
#[async_trait]
pub trait AppProvider: Send + Sync + 'static {
    /// Retrieve application by identifier.
    ///
    /// # Returns
    /// Optional application (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_application(&self, app_id: AppId) -> Result<Option<Application>, StorageError>;
}
