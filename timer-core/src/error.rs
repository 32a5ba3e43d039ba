use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    NameTooLong { max: usize },
    MissingTime,
    InvalidTime,
    MissingAttempts,
    ZeroAttempts,
    MissingMessage,
    MessageTooLong { max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "playerName is required"),
            Self::NameTooLong { max } => {
                write!(f, "playerName is too long (max {max} characters)")
            }
            Self::MissingTime => write!(f, "time is required"),
            Self::InvalidTime => write!(f, "time must be a finite, non-negative number"),
            Self::MissingAttempts => write!(f, "attempts is required"),
            Self::ZeroAttempts => write!(f, "attempts must be a positive integer"),
            Self::MissingMessage => write!(f, "message is required"),
            Self::MessageTooLong { max } => {
                write!(f, "message is too long (max {max} characters)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A write collided with an existing record (duplicate name).
    Conflict(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(msg) => write!(f, "store conflict: {msg}"),
            Self::Backend(msg) => write!(f, "store failure: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<String> for StoreError {
    fn from(value: String) -> Self {
        Self::Backend(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptError {
    Validation(ValidationError),
    ContentRejected { field: &'static str },
    NotLeader { name: String },
    Store(StoreError),
}

impl AttemptError {
    /// Stable machine-readable code, surfaced as `error_code` over HTTP.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_request",
            Self::ContentRejected { .. } => "content_rejected",
            Self::NotLeader { .. } => "not_leader",
            Self::Store(StoreError::Conflict(_)) => "conflict",
            Self::Store(StoreError::Backend(_)) => "internal_error",
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContentRejected { field } => write!(f, "{field} contains disallowed content"),
            Self::NotLeader { name } => {
                write!(f, "only the current top player can update the message (got {name:?})")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AttemptError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AttemptError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    InvalidName(ValidationError),
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },
    Gated { cooldown_remaining: u32 },
    NotGated,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "invalid name: {err}"),
            Self::WrongPhase { action, phase } => {
                write!(f, "cannot {action} while in phase {phase}")
            }
            Self::Gated { cooldown_remaining } => write!(
                f,
                "next attempt is gated: watch an ad or wait {cooldown_remaining} more ticks"
            ),
            Self::NotGated => write!(f, "no gate is active"),
        }
    }
}

impl std::error::Error for GameError {}
