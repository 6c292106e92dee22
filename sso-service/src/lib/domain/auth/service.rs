use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::Instrument;
use tracing::Span;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::StorageError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::PasswordHash;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AppProvider;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::UserProvider;
use crate::domain::auth::ports::UserSaver;

/// Domain service implementation for authentication.
///
/// Stateless apart from its collaborators, so one instance serves all
/// requests concurrently. Every operation logs under a child of `span`.
pub struct AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    user_saver: Arc<US>,
    user_provider: Arc<UP>,
    app_provider: Arc<AP>,
    password_hasher: auth::PasswordHasher,
    token_issuer: auth::TokenIssuer,
    // Verified against when the email is unknown, so both failure paths pay one Argon2 run.
    dummy_hash: PasswordHash,
    span: Span,
}

const DUMMY_PASSWORD: &str = "sso-service-dummy-password";

impl<US, UP, AP> AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_saver` - Persists new users
    /// * `user_provider` - Looks up users and admin flags
    /// * `app_provider` - Looks up applications and their secrets
    /// * `password_hasher` - Hasher carrying the configured cost
    /// * `token_issuer` - Issuer carrying the configured TTL
    /// * `span` - Logging context the service's events are recorded under
    ///
    /// # Errors
    /// * `HashingFailed` - The placeholder hash for unknown emails could not be built
    pub fn new(
        user_saver: Arc<US>,
        user_provider: Arc<UP>,
        app_provider: Arc<AP>,
        password_hasher: auth::PasswordHasher,
        token_issuer: auth::TokenIssuer,
        span: Span,
    ) -> Result<Self, auth::PasswordError> {
        let dummy_hash = PasswordHash::new(password_hasher.hash(DUMMY_PASSWORD)?);

        Ok(Self {
            user_saver,
            user_provider,
            app_provider,
            password_hasher,
            token_issuer,
            dummy_hash,
            span,
        })
    }
}

/// Run a hasher call off the async worker threads.
async fn run_blocking<T, F>(op: &'static str, task: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, auth::PasswordError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AuthError::internal(op, e))?
        .map_err(|e| AuthError::internal(op, e))
}

#[async_trait]
impl<US, UP, AP> AuthServicePort for AuthService<US, UP, AP>
where
    US: UserSaver,
    UP: UserProvider,
    AP: AppProvider,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AuthError> {
        const OP: &str = "auth.register";
        let span = tracing::info_span!(parent: &self.span, "register", op = OP, email = %command.email);

        async move {
            tracing::info!("registering user");

            let hasher = self.password_hasher.clone();
            let password = command.password;
            let password_hash = run_blocking(OP, move || hasher.hash(password.as_str()))
                .await
                .map(PasswordHash::new)
                .inspect_err(|e| tracing::error!(error = %e, "failed to hash password"))?;

            let user_id = match self.user_saver.save_user(&command.email, &password_hash).await {
                Ok(user_id) => user_id,
                Err(StorageError::Conflict(_)) => {
                    tracing::warn!("user already exists");
                    return Err(AuthError::AlreadyExists);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to save user");
                    return Err(AuthError::internal(OP, e));
                }
            };

            tracing::info!(user_id = %user_id, "user registered");
            Ok(user_id)
        }
        .instrument(span)
        .await
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, AuthError> {
        const OP: &str = "auth.login";
        let span = tracing::info_span!(
            parent: &self.span,
            "login",
            op = OP,
            email = %command.email,
            app_id = %command.app_id
        );

        async move {
            tracing::info!("logging in user");

            // Unknown email and wrong password must be indistinguishable to the caller.
            let user = match self.user_provider.find_user_by_email(&command.email).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::warn!("user not found");

                    let hasher = self.password_hasher.clone();
                    let password = command.password;
                    let dummy_hash = self.dummy_hash.clone();
                    let _ = run_blocking(OP, move || {
                        hasher.verify(password.as_str(), dummy_hash.as_str())
                    })
                    .await;

                    return Err(AuthError::InvalidCredentials);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to look up user");
                    return Err(AuthError::internal(OP, e));
                }
            };

            let hasher = self.password_hasher.clone();
            let password = command.password;
            let stored_hash = user.password_hash.clone();
            let matches = run_blocking(OP, move || {
                hasher.verify(password.as_str(), stored_hash.as_str())
            })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to verify password"))?;

            if !matches {
                tracing::info!(user_id = %user.id, "invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }

            let application = match self.app_provider.find_application(command.app_id).await {
                Ok(Some(application)) => application,
                Ok(None) => {
                    tracing::warn!("application not found");
                    return Err(AuthError::ApplicationNotFound(command.app_id));
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to look up application");
                    return Err(AuthError::internal(OP, e));
                }
            };

            let template = auth::Claims::new()
                .with_subject(user.id)
                .with_audience(application.id)
                .with_extra("email", user.email.as_str());

            let issued = self
                .token_issuer
                .issue_at(template, application.secret.as_bytes(), Utc::now())
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to generate token");
                    AuthError::internal(OP, e)
                })?;

            tracing::info!(
                user_id = %user.id,
                application = %application.name,
                expires_at = issued.claims.exp,
                "user logged in"
            );

            Ok(AccessToken::new(issued.access_token))
        }
        .instrument(span)
        .await
    }

    async fn is_admin(&self, user_id: UserId) -> Result<bool, AuthError> {
        const OP: &str = "auth.is_admin";
        let span = tracing::info_span!(parent: &self.span, "is_admin", op = OP, user_id = %user_id);

        async move {
            tracing::info!("checking user permissions");

            match self.user_provider.find_admin_flag(user_id).await {
                Ok(is_admin) => {
                    tracing::info!(is_admin, "checked user permissions");
                    Ok(is_admin)
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to look up admin flag");
                    Err(AuthError::internal(OP, e))
                }
            }
        }
        .instrument(span)
        .await
    }
}
