//! Dashboard session
//!
//! The signed-in identity a request acts as. Built once per request from a
//! validated token and passed explicitly to everything that needs it.

use crate::models::SupplierId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Route the dashboard sends unauthenticated users to
pub const SIGN_IN_ROUTE: &str = "/auth/signin";

/// Dashboard role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees only the products they manufacture
    Supplier,
    /// Sees the whole platform and every supplier
    Superadmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supplier" => Ok(Self::Supplier),
            "superadmin" | "super_admin" => Ok(Self::Superadmin),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("supplier session without manufacturer id")]
    MissingManufacturer,
}

/// Authenticated dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    /// Supplier identity; always present for [`Role::Supplier`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<SupplierId>,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        manufacturer_id: Option<SupplierId>,
    ) -> Result<Self, SessionError> {
        if role == Role::Supplier && manufacturer_id.is_none() {
            return Err(SessionError::MissingManufacturer);
        }
        Ok(Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
            manufacturer_id,
        })
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }

    /// Supplier the session is confined to (`None` for superadmins)
    pub fn supplier_scope(&self) -> Option<&SupplierId> {
        match self.role {
            Role::Supplier => self.manufacturer_id.as_ref(),
            Role::Superadmin => None,
        }
    }

    /// Landing page for this session
    pub fn home_route(&self) -> String {
        match self.role {
            Role::Superadmin => "/".to_string(),
            Role::Supplier => "/dashboard/supplier".to_string(),
        }
    }
}

/// Superadmin page for one supplier's dashboard
pub fn supplier_dashboard_route(supplier: &SupplierId) -> String {
    format!("/supplierDashboard/{}", supplier)
}
