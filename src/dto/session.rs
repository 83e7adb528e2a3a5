use crate::domain;
use derive_more::Display;
use validator::Validate;

/// Login form
#[derive(Clone, Debug, Display, Validate)]
#[display("{email}")]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl From<LoginForm> for domain::session::Credentials {
    fn from(value: LoginForm) -> Self {
        domain::session::Credentials {
            email: value.email,
            password: value.password,
        }
    }
}

/// Account creation form
#[derive(Clone, Debug, Display, Validate)]
#[display("{name} <{email}>")]
pub struct SignupForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl From<SignupForm> for domain::session::NewAccount {
    fn from(value: SignupForm) -> Self {
        domain::session::NewAccount {
            name: value.name,
            email: value.email,
            password: value.password,
        }
    }
}
