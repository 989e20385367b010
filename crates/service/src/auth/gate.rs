//! Reusable authorization gate: role and ownership checks applied after
//! identity resolution, never before.

use uuid::Uuid;

use super::domain::{Identity, Role};
use crate::errors::ServiceError;

/// Require a specific role. Admin passes every role gate.
pub fn require_role(identity: &Identity, required: Role, denial: &str) -> Result<(), ServiceError> {
    if identity.role == required || identity.role == Role::Admin {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(denial.to_string()))
    }
}

/// Require the caller to be exactly the owning user. Admin does NOT bypass
/// this gate; it protects user-private rows such as notifications.
pub fn require_owner(identity: &Identity, owner_id: Uuid, denial: &str) -> Result<(), ServiceError> {
    if identity.user_id == owner_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(denial.to_string()))
    }
}

/// Require the caller to own the row or be an admin.
pub fn require_owner_or_admin(
    identity: &Identity,
    owner_id: Uuid,
    denial: &str,
) -> Result<(), ServiceError> {
    if identity.user_id == owner_id || identity.role == Role::Admin {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(denial.to_string()))
    }
}
