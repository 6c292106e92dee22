use tonic::Status;

use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::IsAdminRequest;
use crate::proto::IsAdminResponse;

pub async fn is_admin<S: AuthServicePort>(
    service: &S,
    request: IsAdminRequest,
) -> Result<IsAdminResponse, Status> {
    let user_id = UserId::from_raw(request.user_id)
        .map_err(|_| Status::invalid_argument("user id should not be empty"))?;

    let is_admin = service.is_admin(user_id).await?;

    Ok(IsAdminResponse { is_admin })
}
