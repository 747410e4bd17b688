use std::fmt;

/// Machine-readable error codes for UI-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DatasetLoadFailed,
    EntityNotFound,
    InconsistentData,
    UnknownEntity,
    InvalidRegistry,
    InvalidSelection,
    InvalidEnumValue,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DatasetLoadFailed => "E1002",
            Self::EntityNotFound => "E2001",
            Self::InvalidSelection => "E2002",
            Self::InvalidEnumValue => "E2003",
            Self::InconsistentData => "E3001",
            Self::UnknownEntity => "E3002",
            Self::InvalidRegistry => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DatasetLoadFailed => "Dataset could not be loaded",
            Self::EntityNotFound => "Ganzhi not found",
            Self::InvalidSelection => "Invalid comparison selection",
            Self::InvalidEnumValue => "Invalid enumerated value",
            Self::InconsistentData => "Inconsistent catalog data",
            Self::UnknownEntity => "Record references an unknown ganzhi",
            Self::InvalidRegistry => "Sexagenary registry failed validation",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .ganzhi/config.toml and retry."),
            Self::DatasetLoadFailed => {
                Some("Pass --data <file> or set GANZHI_DATA to a readable JSON dataset.")
            }
            Self::EntityNotFound => Some("Use one of the 60 names from `gz list`, e.g. 甲子."),
            Self::InvalidSelection => Some("Select between 2 and 10 distinct ganzhi."),
            Self::InvalidEnumValue => None,
            Self::InconsistentData => {
                Some("Every ganzhi needs exactly one nayin record; fix the dataset.")
            }
            Self::UnknownEntity => Some("Remove or correct records naming ganzhi outside the cycle."),
            Self::InvalidRegistry => Some("Report a bug: the stem/branch tables are corrupt."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors produced by the engine's transformation operations.
///
/// Each failure is narrowed to the operation that touched the offending
/// data; none of them is fatal to the process except [`EngineError::InvalidRegistry`],
/// which can only arise while constructing the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The requested name is not one of the 60 registered ganzhi.
    #[error("ganzhi not found: '{name}'")]
    NotFound { name: String },

    /// A registered ganzhi is missing (or has duplicated) required 1:1 data.
    #[error("inconsistent data for {name}: {detail}")]
    InconsistentData { name: String, detail: String },

    /// A record names an entity that is not in the registry.
    #[error("{context} references unknown ganzhi '{name}'")]
    UnknownEntity { name: String, context: &'static str },

    /// Registry construction did not produce the 60 unique names.
    #[error("invalid sexagenary registry: {0}")]
    InvalidRegistry(String),

    /// A comparison selection broke the caller contract.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl EngineError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::EntityNotFound,
            Self::InconsistentData { .. } => ErrorCode::InconsistentData,
            Self::UnknownEntity { .. } => ErrorCode::UnknownEntity,
            Self::InvalidRegistry(_) => ErrorCode::InvalidRegistry,
            Self::InvalidSelection(_) => ErrorCode::InvalidSelection,
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }
}
