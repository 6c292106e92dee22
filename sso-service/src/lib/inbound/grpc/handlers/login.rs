use tonic::Status;

use super::parse_email;
use super::parse_password;
use crate::domain::auth::models::AppId;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let email = parse_email(request.email)?;
    let password = parse_password(request.password)?;
    let app_id = AppId::from_raw(request.app_id)
        .map_err(|_| Status::invalid_argument("app id should not be empty"))?;

    let token = service
        .login(LoginCommand::new(email, password, app_id))
        .await?;

    Ok(LoginResponse {
        token: token.into_inner(),
    })
}
