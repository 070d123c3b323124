//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`HydrationError`, `RangedError`, `AbilityError`,
//! ...) live next to the operations that produce them. They share the
//! severity classification below, which the engine uses to decide between
//! silently ignoring an input race and surfacing a broken catalogue.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// A UI/input race: acting out of turn, arming an empty ability,
    /// targeting a monster that is already gone. The state is left unchanged.
    Recoverable,

    /// Malformed authoring data, such as an instance naming an unknown
    /// template. Propagated to the caller.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns true if the error can be ignored without corrupting the run.
    fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }
}
