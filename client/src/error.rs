use thiserror::Error;

pub type CommandResult<T> = Result<T, CommandError>;

/// Fallback shown when a failure carries no server-supplied message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Everything a user-initiated command can fail with. Validation never
/// reaches the network; the rest are derived from the backend response
/// or the transport.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not allowed: {0}")]
    Authorization(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("backend error: {0}")]
    Backend(String),

    /// A command on the same target is still awaiting its response.
    #[error("another action on this target is still in progress")]
    InFlight,
}

impl CommandError {
    /// The single user-facing message for this failure, preferring a
    /// server-supplied one and falling back to a generic default.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Authorization(msg)
            | Self::Conflict(msg)
            | Self::Backend(msg) => {
                if msg.is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    msg.clone()
                }
            }
            Self::Transport(_) | Self::InFlight => GENERIC_FAILURE.to_string(),
        }
    }

    /// Only transport failures are worth a blind retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
