//! Role Definitions
//!
//! Simplified RBAC: three fixed roles, no per-user permission lists.
//! Basic shopping operations (catalog browsing, own cart/addresses/orders)
//! need no elevation; order and shipping status transitions do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Courier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Courier => "courier",
            Role::Admin => "admin",
        }
    }

    /// Elevated roles may move order/shipping status; plain customers may not
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Courier)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "courier" => Ok(Role::Courier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_customers_lack_elevation() {
        assert!(!Role::Customer.is_elevated());
        assert!(Role::Courier.is_elevated());
        assert!(Role::Admin.is_elevated());
        assert!(!Role::Courier.is_admin());
    }
}
