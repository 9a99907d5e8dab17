use std::fmt;

use crate::config::ConfigError;

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidEnvOverride,
    InvalidWeights,
    InputReadFailed,
    InputParseFailed,
    EmptyQuery,
    LexicalSearchFailed,
}

impl ErrorCode {
    pub const ALL: [Self; 7] = [
        Self::ConfigParseError,
        Self::InvalidEnvOverride,
        Self::InvalidWeights,
        Self::InputReadFailed,
        Self::InputParseFailed,
        Self::EmptyQuery,
        Self::LexicalSearchFailed,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidEnvOverride => "E1002",
            Self::InvalidWeights => "E1003",
            Self::InputReadFailed => "E2001",
            Self::InputParseFailed => "E2002",
            Self::EmptyQuery => "E3001",
            Self::LexicalSearchFailed => "E4001",
        }
    }

    /// Snake-case name used as `error_code` in CLI JSON output.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::ConfigParseError => "config_parse_error",
            Self::InvalidEnvOverride => "invalid_env_override",
            Self::InvalidWeights => "invalid_weights",
            Self::InputReadFailed => "input_read_failed",
            Self::InputParseFailed => "input_parse_failed",
            Self::EmptyQuery => "empty_query",
            Self::LexicalSearchFailed => "lexical_search_failed",
        }
    }

    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .scx/config.toml and retry."),
            Self::InvalidEnvOverride => Some("Set WEIGHT_FTS / WEIGHT_VEC to a number, or unset them."),
            Self::InvalidWeights => {
                Some("Use finite, non-negative weights whose sum is at most 1.")
            }
            Self::InputReadFailed => Some("Check the path and read permissions."),
            Self::InputParseFailed => Some("Provide a JSON array of hit objects."),
            Self::EmptyQuery => Some("Provide a non-empty query string."),
            Self::LexicalSearchFailed => {
                Some("Check the lexical index; there is no fallback for this channel.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<&ConfigError> for ErrorCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::Read { .. } | ConfigError::Parse { .. } => Self::ConfigParseError,
            ConfigError::InvalidEnv { .. } => Self::InvalidEnvOverride,
            ConfigError::InvalidWeights { .. } => Self::InvalidWeights,
        }
    }
}
