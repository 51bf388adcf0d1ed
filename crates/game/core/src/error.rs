//! Common error infrastructure for tactics-core.
//!
//! Domain-specific errors (e.g., `AttackError`, `AbilityError`) are defined in
//! their respective modules alongside the operations they validate. This module
//! provides the shared severity taxonomy:
//!
//! - **Recoverable**: illegal-but-expected gameplay conditions (out of range,
//!   insufficient resources, on cooldown) that callers report and move on from
//! - **Validation**: malformed input that should not be retried unchanged
//! - **Internal**: state inconsistencies that indicate a bug
//! - **Fatal**: the engine cannot continue (game over is the only one)

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: target out of range, insufficient action points
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unit not found, wrong target kind
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: occupancy map desync, initiative slot for a missing unit.
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - the encounter cannot continue.
    ///
    /// Example: acting after the game-over state has been latched
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all tactics-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
