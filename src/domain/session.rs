use crate::domain::session::driven_ports::{SessionReader, SessionWriter};
use crate::domain::{DrivenPortError, Error};
use crate::external_connections::ExternalConnectivity;
use std::sync::{PoisonError, RwLock};
use tracing::{info, warn};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct User {
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    /// Returned by some backend versions. Authentication rides on the session cookie, so this
    /// is never sent back.
    pub token: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Initialized,
}

/// Snapshot of "who is logged in". The user is either fully present or absent.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Session {
    user: Option<User>,
    phase: SessionPhase,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == SessionPhase::Initialized
    }
}

/// Owns the current [Session]. The phase only ever moves forward.
#[derive(Default)]
pub struct SessionStore {
    state: RwLock<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_user(&self, user: Option<User>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.user = user;
    }

    pub fn logout(&self) {
        self.set_user(None);
    }

    /// Resolves the current user against the backend. Only the first call issues a request;
    /// later calls (including ones made while the first is still running) return the current
    /// state untouched. A failed lookup just means nobody is logged in.
    #[tracing::instrument(skip_all)]
    pub async fn initialize(
        &self,
        ext_cxn: &impl ExternalConnectivity,
        session_read: &impl SessionReader,
    ) -> Session {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.phase != SessionPhase::Uninitialized {
                return state.clone();
            }
            state.phase = SessionPhase::Initializing;
        }

        let user = match session_read.who_am_i(ext_cxn).await {
            Ok(user) => {
                info!(email = %user.email, "resumed existing session");
                Some(user)
            }
            Err(DrivenPortError::Unauthorized) => {
                info!("no active session");
                None
            }
            Err(err) => {
                warn!("Failed to fetch user: {err}");
                None
            }
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.user = user;
        state.phase = SessionPhase::Initialized;
        state.clone()
    }
}

pub mod driven_ports {
    use super::*;

    pub trait SessionReader {
        async fn who_am_i(&self, ext_cxn: &impl ExternalConnectivity)
        -> Result<User, DrivenPortError>;
    }

    pub trait SessionWriter {
        /// Logs in and returns the backend's confirmation message. The session cookie is kept
        /// by the transport.
        async fn login(
            &self,
            credentials: &Credentials,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<String, DrivenPortError>;

        async fn register(
            &self,
            account: &NewAccount,
            ext_cxn: &impl ExternalConnectivity,
        ) -> Result<User, DrivenPortError>;

        async fn logout(&self, ext_cxn: &impl ExternalConnectivity)
        -> Result<(), DrivenPortError>;
    }
}

/// Result of a successful login
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoggedIn {
    pub message: String,
    pub user: User,
}

pub mod driving_ports {
    use super::*;

    pub trait SessionPort {
        async fn log_in(
            &self,
            credentials: &Credentials,
            store: &SessionStore,
            ext_cxn: &impl ExternalConnectivity,
            session_write: &impl driven_ports::SessionWriter,
            session_read: &impl driven_ports::SessionReader,
        ) -> Result<LoggedIn, Error>;
        async fn sign_up(
            &self,
            account: &NewAccount,
            ext_cxn: &impl ExternalConnectivity,
            session_write: &impl driven_ports::SessionWriter,
        ) -> Result<User, Error>;
        async fn log_out(
            &self,
            store: &SessionStore,
            ext_cxn: &impl ExternalConnectivity,
            session_write: &impl driven_ports::SessionWriter,
        ) -> Result<(), Error>;
    }
}

pub struct SessionService {}

impl driving_ports::SessionPort for SessionService {
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    async fn log_in(
        &self,
        credentials: &Credentials,
        store: &SessionStore,
        ext_cxn: &impl ExternalConnectivity,
        session_write: &impl SessionWriter,
        session_read: &impl SessionReader,
    ) -> Result<LoggedIn, Error> {
        let message = session_write
            .login(credentials, ext_cxn)
            .await
            .map_err(|err| match err {
                DrivenPortError::Unauthorized => Error::Rejected {
                    action: "log in".into(),
                    status: 401,
                    message: "Invalid email or password".into(),
                },
                other => other.into_error_trying_to("log in"),
            })?;

        let user = session_read
            .who_am_i(ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("fetch your profile"))?;
        store.set_user(Some(user.clone()));
        info!("login complete");

        Ok(LoggedIn { message, user })
    }

    #[tracing::instrument(skip_all, fields(email = %account.email))]
    async fn sign_up(
        &self,
        account: &NewAccount,
        ext_cxn: &impl ExternalConnectivity,
        session_write: &impl SessionWriter,
    ) -> Result<User, Error> {
        session_write
            .register(account, ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("create your account"))
    }

    #[tracing::instrument(skip_all)]
    async fn log_out(
        &self,
        store: &SessionStore,
        ext_cxn: &impl ExternalConnectivity,
        session_write: &impl SessionWriter,
    ) -> Result<(), Error> {
        if let Err(err) = session_write.logout(ext_cxn).await {
            warn!("Backend logout failed, clearing the local session anyway: {err}");
        }
        store.logout();

        Ok(())
    }
}
