use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the loading and persistence edges.
///
/// Comparison findings are never errors; the pure functions in this crate
/// return them as data.
#[derive(Debug, Error)]
pub enum I18nError {
    /// The base locale tree is missing or unreadable. Fatal for a whole run.
    #[error("base locale '{locale}' could not be loaded: {reason}")]
    BaseLocale { locale: String, reason: String },

    /// A non-base locale could not be loaded. Recoverable per locale.
    #[error("locale '{locale}' could not be loaded from {}: {reason}", .path.display())]
    LocaleLoad {
        locale: String,
        path: PathBuf,
        reason: String,
    },

    /// A filled locale tree could not be written back.
    #[error("locale '{locale}' could not be written to {}: {reason}", .path.display())]
    Persist {
        locale: String,
        path: PathBuf,
        reason: String,
    },

    /// The check configuration file is unreadable or malformed.
    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl I18nError {
    pub fn base_locale(locale: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BaseLocale {
            locale: locale.into(),
            reason: reason.into(),
        }
    }

    pub fn locale_load(
        locale: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::LocaleLoad {
            locale: locale.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn persist(
        locale: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Persist {
            locale: locale.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that must abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BaseLocale { .. } | Self::Config { .. })
    }
}

pub type Result<T> = std::result::Result<T, I18nError>;
