pub mod repl;
pub mod session;
pub mod task;

use crate::domain::Error;
use derive_more::Display;
use std::fmt;
use validator::ValidationErrors;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Severity {
    #[display("ok")]
    Success,
    #[display("error")]
    Error,
}

/// Short message shown to the user after every command
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Notice {
        Notice {
            severity: Severity::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Turns a failed operation into something a person can act on
    pub fn from_error(title: impl Into<String>, err: &Error) -> Notice {
        Notice::from_error_or_missing(title, err, "That item no longer exists.")
    }

    /// Same as [Notice::from_error], with [missing] shown when the thing acted on is gone
    pub fn from_error_or_missing(title: impl Into<String>, err: &Error, missing: &str) -> Notice {
        let description = match err {
            Error::Invalid(validation_errors) => describe_validation_errors(validation_errors),
            Error::DoesNotExist => missing.to_owned(),
            Error::Unauthorized => "Your session has expired. Please log in again.".to_owned(),
            Error::Rejected { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        };

        Notice::error(title, description)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.title)?;
        if !self.description.is_empty() {
            write!(f, "\n{}", self.description)?;
        }

        Ok(())
    }
}

/// One line per failing field, sorted so output is stable
fn describe_validation_errors(validation_errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    lines.sort();

    lines.join("\n")
}
