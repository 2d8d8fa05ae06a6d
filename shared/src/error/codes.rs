//! Unified error codes for SupplyBoard
//!
//! This module defines all error codes used across the board server, the
//! upstream client and the dashboard front-end.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication / session errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors
//! - 4xxx: Analytics errors
//! - 5xxx: Upstream API errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Session claims could not be turned into a session
    SessionMalformed = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Superadmin role required
    SuperadminRequired = 2003,
    /// Supplier tried to read another supplier's data
    SupplierScopeViolation = 2004,

    // ==================== 3xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Category not found
    CategoryNotFound = 3101,
    /// Warehouse not found
    WarehouseNotFound = 3201,
    /// Supplier not found
    SupplierNotFound = 3301,

    // ==================== 4xxx: Analytics ====================
    /// Unknown bucket granularity
    InvalidGranularity = 4001,
    /// Start date is after end date or unparseable
    InvalidDateRange = 4002,
    /// Unknown chart identifier
    UnknownChart = 4003,
    /// Unknown metric for the requested chart
    InvalidMetric = 4004,
    /// Chart needs a warehouse filter
    WarehouseRequired = 4005,

    // ==================== 5xxx: Upstream ====================
    /// Upstream API unreachable
    UpstreamUnavailable = 5001,
    /// Upstream API timed out
    UpstreamTimeout = 5002,
    /// Upstream API rejected the request
    UpstreamRejected = 5003,
    /// Upstream API returned a body we could not decode
    UpstreamInvalidResponse = 5004,
    /// Upstream API refused our credentials
    UpstreamUnauthorized = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9005,
    /// No snapshot could be produced
    SnapshotUnavailable = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::SessionMalformed => "Session data is malformed",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::SuperadminRequired => "Superadmin role is required",
            ErrorCode::SupplierScopeViolation => "Suppliers can only read their own data",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::WarehouseNotFound => "Warehouse not found",
            ErrorCode::SupplierNotFound => "Supplier not found",

            // Analytics
            ErrorCode::InvalidGranularity => "Unknown granularity",
            ErrorCode::InvalidDateRange => "Invalid date range",
            ErrorCode::UnknownChart => "Unknown chart",
            ErrorCode::InvalidMetric => "Unknown metric",
            ErrorCode::WarehouseRequired => "A warehouse must be selected",

            // Upstream
            ErrorCode::UpstreamUnavailable => "Upstream API is unavailable",
            ErrorCode::UpstreamTimeout => "Upstream API timed out",
            ErrorCode::UpstreamRejected => "Upstream API rejected the request",
            ErrorCode::UpstreamInvalidResponse => "Upstream API returned an invalid response",
            ErrorCode::UpstreamUnauthorized => "Upstream API refused the credentials",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SnapshotUnavailable => "Dashboard data is not available yet",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1008 => Ok(ErrorCode::SessionMalformed),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::SuperadminRequired),
            2004 => Ok(ErrorCode::SupplierScopeViolation),

            // Catalog
            3001 => Ok(ErrorCode::ProductNotFound),
            3101 => Ok(ErrorCode::CategoryNotFound),
            3201 => Ok(ErrorCode::WarehouseNotFound),
            3301 => Ok(ErrorCode::SupplierNotFound),

            // Analytics
            4001 => Ok(ErrorCode::InvalidGranularity),
            4002 => Ok(ErrorCode::InvalidDateRange),
            4003 => Ok(ErrorCode::UnknownChart),
            4004 => Ok(ErrorCode::InvalidMetric),
            4005 => Ok(ErrorCode::WarehouseRequired),

            // Upstream
            5001 => Ok(ErrorCode::UpstreamUnavailable),
            5002 => Ok(ErrorCode::UpstreamTimeout),
            5003 => Ok(ErrorCode::UpstreamRejected),
            5004 => Ok(ErrorCode::UpstreamInvalidResponse),
            5005 => Ok(ErrorCode::UpstreamUnauthorized),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::SnapshotUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::SupplierNotFound.code(), 3301);
        assert_eq!(ErrorCode::UnknownChart.code(), 4003);
        assert_eq!(ErrorCode::UpstreamTimeout.code(), 5002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1008), Ok(ErrorCode::SessionMalformed));
        assert_eq!(ErrorCode::try_from(2004), Ok(ErrorCode::SupplierScopeViolation));
        assert_eq!(ErrorCode::try_from(4005), Ok(ErrorCode::WarehouseRequired));
        assert_eq!(ErrorCode::try_from(9101), Ok(ErrorCode::SnapshotUnavailable));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4), Err(InvalidErrorCode(4)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::UnknownChart).unwrap();
        assert_eq!(json, "4003");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("1004").unwrap();
        assert_eq!(code, ErrorCode::TokenInvalid);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::TokenExpired,
            ErrorCode::SuperadminRequired,
            ErrorCode::CategoryNotFound,
            ErrorCode::InvalidGranularity,
            ErrorCode::UpstreamUnauthorized,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::WarehouseRequired.message(),
            "A warehouse must be selected"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
