pub mod handlers;
pub mod middleware;
pub mod password;
pub mod token;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;

/// The authenticated caller, placed in request extensions by `require_auth`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Rejects the request with 403 unless the caller has `role`.
    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
