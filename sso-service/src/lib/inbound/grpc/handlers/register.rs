use tonic::Status;

use super::parse_email;
use super::parse_password;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: &S,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command = RegisterCommand::new(
        parse_email(request.email)?,
        parse_password(request.password)?,
    );

    let user_id = service.register(command).await?;

    Ok(RegisterResponse {
        user_id: user_id.as_i64(),
    })
}
