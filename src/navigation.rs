use crate::domain::session::Session;
use derive_more::Display;
use std::str::FromStr;
use thiserror::Error;

/// Screens a user can navigate to
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Route {
    #[display("/")]
    Landing,
    #[display("/signup")]
    Signup,
    #[display("/login")]
    Login,
    #[display("/tasks")]
    Tasks,
}

impl Route {
    /// Whether the route may only be shown to a logged-in user
    pub fn is_private(self) -> bool {
        matches!(self, Route::Tasks)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("no such page: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        match path.trim_end_matches('/') {
            "" => Ok(Route::Landing),
            "/signup" => Ok(Route::Signup),
            "/login" => Ok(Route::Login),
            "/tasks" => Ok(Route::Tasks),
            _ => Err(UnknownRoute(path.to_owned())),
        }
    }
}

/// Outcome of trying to show a route for the current session
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RouteDecision {
    Render(Route),
    /// The session is still being resolved, so nothing can be decided yet
    Loading,
    Redirect(Route),
}

/// Guards private routes: they render only for a resolved session with a user, and send
/// everyone else to the login page.
pub fn resolve(route: Route, session: &Session) -> RouteDecision {
    if !route.is_private() {
        return RouteDecision::Render(route);
    }
    if !session.is_initialized() {
        return RouteDecision::Loading;
    }

    match session.user() {
        Some(_) => RouteDecision::Render(route),
        None => RouteDecision::Redirect(Route::Login),
    }
}
