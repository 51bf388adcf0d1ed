use crate::error::{ErrorSeverity, GameError};

/// Errors produced when a required collaborator is absent from the [`Env`].
///
/// These are degradation signals, not crashes: callers log a warning and
/// fall back where the rules allow it.
///
/// [`Env`]: super::Env
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("tables oracle not available")]
    TablesNotAvailable,

    #[error("effect catalog not available")]
    EffectsNotAvailable,

    #[error("ability catalog not available")]
    AbilitiesNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TablesNotAvailable => "ENV_TABLES_NOT_AVAILABLE",
            Self::EffectsNotAvailable => "ENV_EFFECTS_NOT_AVAILABLE",
            Self::AbilitiesNotAvailable => "ENV_ABILITIES_NOT_AVAILABLE",
            Self::RngNotAvailable => "ENV_RNG_NOT_AVAILABLE",
        }
    }
}
