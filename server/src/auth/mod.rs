//! Authentication and Authorization
//!
//! - [`JwtService`] - token generation and validation
//! - [`CurrentUser`] - resolved caller principal (id + role)
//! - [`Role`] - fixed three-role RBAC

pub mod extractor;
pub mod jwt;
pub mod roles;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use roles::Role;

use crate::utils::AppError;
use surrealdb::RecordId;

/// The authenticated principal attached to every request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: RecordId,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    /// The caller's id in "user:key" string form, as stored on owned records
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// Guard for order/shipping status transitions
    pub fn require_elevated(&self) -> Result<(), AppError> {
        if self.role.is_elevated() {
            Ok(())
        } else {
            Err(AppError::forbidden("Requires courier or admin role"))
        }
    }

    /// Guard for catalog management
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Requires admin role"))
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id: RecordId = claims
            .sub
            .parse()
            .map_err(|_| format!("invalid subject: {}", claims.sub))?;
        let role: Role = claims.role.parse()?;
        Ok(Self {
            id,
            email: claims.email,
            role,
        })
    }
}
