//! Error types for timestamp transforms and predicate projection

use thiserror::Error;

use crate::types::PrimitiveType;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Source column type cannot be transformed
    E001UnsupportedType,
    /// E002: Unknown granularity name
    E002UnsupportedGranularity,
    /// E003: Offset id could not be parsed or is out of range
    E003InvalidOffset,
    /// E004: Value outside the representable calendar or i32 range
    E004OutOfRange,
    /// E005: Predicate shape or literal type does not fit its term
    E005InvalidPredicate,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001UnsupportedType => "E001",
            Self::E002UnsupportedGranularity => "E002",
            Self::E003InvalidOffset => "E003",
            Self::E004OutOfRange => "E004",
            Self::E005InvalidPredicate => "E005",
        }
    }
}

/// Errors raised while building transforms, bucketing values or projecting predicates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The transform was asked to handle a type other than timestamp
    #[error("[{code}] Timestamp transform cannot transform type: {source_type}")]
    UnsupportedType {
        code: &'static str,
        source_type: PrimitiveType,
    },

    /// The granularity name is not one of year, month, day, hour
    #[error("[{code}] Unsupported timestamp method: {name}\n\nSupported: year, month, day, hour")]
    UnsupportedGranularity { code: &'static str, name: String },

    #[error("[{code}] Invalid zone offset '{offset_id}': {reason}")]
    InvalidOffset {
        code: &'static str,
        offset_id: String,
        reason: String,
    },

    /// A bucket count or rendered value does not fit the target range
    #[error("[{code}] Value out of range: {message}")]
    OutOfRange { code: &'static str, message: String },

    #[error("[{code}] Invalid predicate: {message}")]
    InvalidPredicate { code: &'static str, message: String },
}

impl TransformError {
    pub fn unsupported_type(source_type: PrimitiveType) -> Self {
        Self::UnsupportedType {
            code: ErrorCode::E001UnsupportedType.as_str(),
            source_type,
        }
    }

    pub fn unsupported_granularity(name: impl Into<String>) -> Self {
        Self::UnsupportedGranularity {
            code: ErrorCode::E002UnsupportedGranularity.as_str(),
            name: name.into(),
        }
    }

    pub fn invalid_offset(offset_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOffset {
            code: ErrorCode::E003InvalidOffset.as_str(),
            offset_id: offset_id.into(),
            reason: reason.into(),
        }
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            code: ErrorCode::E004OutOfRange.as_str(),
            message: message.into(),
        }
    }

    pub fn invalid_predicate(message: impl Into<String>) -> Self {
        Self::InvalidPredicate {
            code: ErrorCode::E005InvalidPredicate.as_str(),
            message: message.into(),
        }
    }

    /// Error code of this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { code, .. }
            | Self::UnsupportedGranularity { code, .. }
            | Self::InvalidOffset { code, .. }
            | Self::OutOfRange { code, .. }
            | Self::InvalidPredicate { code, .. } => code,
        }
    }
}

/// Result type alias for TransformError
pub type Result<T> = std::result::Result<T, TransformError>;
