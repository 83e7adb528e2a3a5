use crate::cli::Notice;
use crate::domain;
use crate::domain::session::{NewAccount, SessionStore};
use crate::domain::task::{TaskAction, TaskStore};
use crate::dto::session::{LoginForm, SignupForm};
use crate::external_connections::ExternalConnectivity;
use crate::gateway::http_session_driven_ports::{HttpSessionReader, HttpSessionWriter};
use tracing::{error, info};
use validator::Validate;

/// Creates an account. Signing up does not log the new user in.
pub async fn sign_up(
    form: SignupForm,
    ext_cxn: &impl ExternalConnectivity,
    session_service: &impl domain::session::driving_ports::SessionPort,
) -> Notice {
    info!("Signing up {form}");
    if let Err(validation_errors) = form.validate() {
        return Notice::from_error("Could not sign up", &validation_errors.into());
    }

    let account = NewAccount::from(form);
    let session_write = HttpSessionWriter;

    match session_service
        .sign_up(&account, ext_cxn, &session_write)
        .await
    {
        Ok(user) => Notice::success(
            "Account created",
            format!("Welcome, {}! Log in to get started.", user.name),
        ),
        Err(err) => {
            error!("Sign up failed: {err}");
            Notice::from_error("Could not sign up", &err)
        }
    }
}

/// Logs in and stores the resolved user in the session
pub async fn log_in(
    form: LoginForm,
    store: &SessionStore,
    ext_cxn: &impl ExternalConnectivity,
    session_service: &impl domain::session::driving_ports::SessionPort,
) -> Notice {
    info!("Logging in {form}");
    if let Err(validation_errors) = form.validate() {
        return Notice::from_error("Error", &validation_errors.into());
    }

    let credentials = domain::session::Credentials::from(form);
    let session_write = HttpSessionWriter;
    let session_read = HttpSessionReader;

    match session_service
        .log_in(&credentials, store, ext_cxn, &session_write, &session_read)
        .await
    {
        Ok(logged_in) => Notice::success("Login Successful", logged_in.message),
        Err(err) => {
            error!("Login failed: {err}");
            Notice::from_error_or_missing("Error", &err, "Your account could not be found.")
        }
    }
}

/// Reports who is logged in, straight from the session store
pub fn who_am_i(store: &SessionStore) -> Notice {
    match store.snapshot().user() {
        Some(user) => Notice::success(
            "Logged in",
            format!("{} <{}>", user.name, user.email),
        ),
        None => Notice::success("Not logged in", "Use `login` or `signup` to get started."),
    }
}

/// Ends the session and forgets the previous user's tasks
pub async fn log_out(
    session_store: &SessionStore,
    task_store: &TaskStore,
    ext_cxn: &impl ExternalConnectivity,
    session_service: &impl domain::session::driving_ports::SessionPort,
) -> Notice {
    info!("Logging out");
    let session_write = HttpSessionWriter;

    let result = session_service
        .log_out(session_store, ext_cxn, &session_write)
        .await;
    task_store.dispatch(TaskAction::Sync(Vec::new()));

    match result {
        Ok(()) => Notice::success("Logged out", ""),
        Err(err) => {
            error!("Logout failed: {err}");
            Notice::from_error("Could not log out", &err)
        }
    }
}
