#![forbid(unsafe_code)]

//! Session configuration.
//!
//! [`SessionConfig`] groups the tunables of a [`NavigationSession`] into
//! sections that can be loaded from TOML or JSON when the `session-config`
//! feature is enabled.
//!
//! ```toml
//! initial_tab = 0
//!
//! [history]
//! max_size = 50
//!
//! [resolver]
//! empty_message = "nothing to go back to"
//! ```
//!
//! ```rust,ignore
//! let config = SessionConfig::from_toml_file("backstack.toml")?.validated()?;
//! ```
//!
//! Missing keys and sections fall back to their defaults.
//!
//! [`NavigationSession`]: crate::session::NavigationSession

#[cfg(feature = "session-config")]
use std::path::Path;

#[cfg(feature = "session-config")]
use serde::{Deserialize, Serialize};

use backstack_core::HistoryConfig;

use crate::resolver::ResolverConfig;

// ---------------------------------------------------------------------------
// Top-level SessionConfig
// ---------------------------------------------------------------------------

/// Everything a navigation session can be tuned with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "session-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "session-config", serde(default))]
pub struct SessionConfig {
    /// Tab shown when the session starts or is reset.
    pub initial_tab: usize,

    /// History store parameters.
    pub history: HistorySection,

    /// Back resolver parameters.
    pub resolver: ResolverConfig,
}

impl SessionConfig {
    /// Load from a TOML string.
    #[cfg(feature = "session-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SessionConfigError> {
        toml::from_str(s).map_err(SessionConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "session-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SessionConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SessionConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "session-config")]
    pub fn from_json_str(s: &str) -> Result<Self, SessionConfigError> {
        serde_json::from_str(s).map_err(SessionConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "session-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SessionConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "session-config")]
    pub fn to_toml_string(&self) -> Result<String, SessionConfigError> {
        toml::to_string_pretty(self).map_err(SessionConfigError::TomlSer)
    }

    /// List every out-of-range parameter. An empty list means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.history.max_size == 0 {
            errors.push("history.max_size must be >= 1".into());
        }

        if self.resolver.empty_message.trim().is_empty() {
            errors.push("resolver.empty_message must not be empty".into());
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, SessionConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SessionConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn to_history_config(&self) -> HistoryConfig {
        HistoryConfig::new(self.history.max_size)
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// History store parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "session-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "session-config", serde(default))]
pub struct HistorySection {
    /// Maximum retained entries; the oldest are evicted first.
    pub max_size: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            max_size: HistoryConfig::default().max_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load or validate a [`SessionConfig`].
#[derive(Debug)]
pub enum SessionConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "session-config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "session-config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "session-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SessionConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "session-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "session-config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "session-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SessionConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "session-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "session-config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "session-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.history.max_size, 50);
        assert_eq!(config.resolver.empty_message, "nothing to go back to");
        assert_eq!(config.initial_tab, 0);
    }

    #[test]
    fn validate_reports_each_problem() {
        let config = SessionConfig {
            history: HistorySection { max_size: 0 },
            resolver: ResolverConfig {
                empty_message: "   ".into(),
            },
            ..SessionConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("history.max_size"));
        assert!(errors[1].contains("resolver.empty_message"));
    }

    #[test]
    fn validated_wraps_errors() {
        let config = SessionConfig {
            history: HistorySection { max_size: 0 },
            ..SessionConfig::default()
        };
        let err = config.validated().expect_err("invalid");
        assert_eq!(
            err.to_string(),
            "validation errors: history.max_size must be >= 1"
        );
    }

    #[test]
    fn to_history_config_carries_max_size() {
        let config = SessionConfig {
            history: HistorySection { max_size: 7 },
            ..SessionConfig::default()
        };
        assert_eq!(config.to_history_config().max_size, 7);
    }

    #[cfg(feature = "session-config")]
    mod serde_tests {
        use super::super::*;

        #[test]
        fn partial_toml_keeps_defaults() {
            let config = SessionConfig::from_toml_str("[history]\nmax_size = 10\n").expect("parse");
            assert_eq!(config.history.max_size, 10);
            assert_eq!(config.resolver, ResolverConfig::default());
        }

        #[test]
        fn json_overrides_message_and_tab() {
            let config = SessionConfig::from_json_str(
                r#"{"initial_tab": 2, "resolver": {"empty_message": "home"}}"#,
            )
            .expect("parse");
            assert_eq!(config.initial_tab, 2);
            assert_eq!(config.resolver.empty_message, "home");
            assert_eq!(config.history.max_size, 50);
        }

        #[test]
        fn malformed_toml_is_a_toml_error() {
            let err = SessionConfig::from_toml_str("[history\n").expect_err("bad toml");
            assert!(matches!(err, SessionConfigError::Toml(_)));
        }

        #[test]
        fn toml_string_reparses() {
            let config = SessionConfig {
                initial_tab: 3,
                ..SessionConfig::default()
            };
            let text = config.to_toml_string().expect("serialize");
            assert_eq!(SessionConfig::from_toml_str(&text).expect("parse"), config);
        }
    }
}
