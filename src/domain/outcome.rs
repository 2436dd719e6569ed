//! Operation outcome model
//!
//! Expected failures flow back through ordinary `Result` values instead of
//! being raised and caught layer by layer. The error carries a closed kind
//! used by the HTTP boundary to pick a transport status.

/// Classification of an operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied data violating a rule; recoverable by resubmission.
    Validation,
    /// The referenced entity does not exist.
    NotFound,
    /// Valid request, but illegal given the current aggregate state.
    Conflict,
    /// Persistence or infrastructure fault; details are logged, not exposed.
    Internal,
    /// Unclassified fault; treated as `Internal` at the boundary.
    Unexpected,
}

impl ErrorKind {
    /// Stable code for error response bodies.
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::Unexpected => "unexpected",
        }
    }
}

/// A classified operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for Error {}

/// Result type used by command and query handlers.
pub type OperationResult<T> = Result<T, Error>;
