use thiserror::Error;
use validator::ValidationErrors;

pub mod session;
pub mod task;

#[cfg(test)]
pub(crate) mod test_util;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input was invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("requested data does not exist")]
    DoesNotExist,
    #[error("you are not logged in")]
    Unauthorized,
    #[error("the server refused to {action} (status {status}): {message}")]
    Rejected {
        action: String,
        status: u16,
        message: String,
    },
    #[error("failed to {action} due to a communication failure: {cause}")]
    RetrieveFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

/// Failures reported by gateways when talking to the task backend
#[derive(Error, Debug)]
pub enum DrivenPortError {
    #[error("a communication failure occurred: {0}")]
    CommsFailure(anyhow::Error),
    #[error("the requested data does not exist")]
    DoesNotExist,
    #[error("the session credentials were missing or rejected")]
    Unauthorized,
    #[error("the backend answered with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl DrivenPortError {
    /// Converts this DrivenPortError to a domain error with some extra info on the [action]
    /// being taken when communicating over the port
    pub(crate) fn into_error_trying_to(self, action: &str) -> Error {
        match self {
            Self::DoesNotExist => Error::DoesNotExist,
            Self::Unauthorized => Error::Unauthorized,
            Self::Rejected { status, message } => Error::Rejected {
                action: action.into(),
                status,
                message,
            },
            Self::CommsFailure(err) => Error::RetrieveFailure {
                action: action.into(),
                cause: err,
            },
        }
    }
}
