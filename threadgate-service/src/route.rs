//! Screens of the client and their paths.

use std::fmt;

use serde::Serialize;

/// A navigation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// The login screen.
    Login,
    /// The permission selection screen.
    Permissions,
    /// The main feed, guarded by the session gate.
    Main,
    /// The OAuth redirect endpoint.
    Callback,
}

impl Route {
    /// Returns the path of this screen.
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Permissions => "/permissions",
            Route::Main => "/",
            Route::Callback => "/auth/callback",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
