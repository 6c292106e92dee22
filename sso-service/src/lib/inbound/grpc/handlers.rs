use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Password;

pub mod is_admin;
pub mod login;
pub mod register;

/// Maps the service taxonomy onto gRPC codes.
///
/// Internal failures are opaque to the caller; their cause is already in the logs.
impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyExists => Status::already_exists(err.to_string()),
            AuthError::InvalidCredentials => Status::invalid_argument(err.to_string()),
            AuthError::ApplicationNotFound(_) | AuthError::Internal { .. } => {
                Status::internal("internal server error")
            }
        }
    }
}

pub(crate) fn parse_email(email: String) -> Result<EmailAddress, Status> {
    EmailAddress::new(email).map_err(|_| Status::invalid_argument("email is not valid"))
}

pub(crate) fn parse_password(password: String) -> Result<Password, Status> {
    Password::new(password).map_err(|_| {
        Status::invalid_argument(format!(
            "password must be at least {} characters",
            Password::MIN_LENGTH
        ))
    })
}
