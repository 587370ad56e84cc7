//! Top-level view states of the portal.
//!
//! `Search` is the public default. `Admin` is entered by navigating to an
//! `/admin` path and starts logged out; a successful credential check logs in,
//! logout returns to the credential form, and leaving the admin path returns
//! to `Search`. There are no other states.

use serde::Serialize;

pub const ADMIN_PATH_PREFIX: &str = "/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminView {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
#[serde(tag = "view", content = "admin", rename_all = "snake_case")]
pub enum View {
    #[default]
    Search,
    Admin(AdminView),
}

/// `/admin` itself or anything below it; `/administrator` is not.
pub fn is_admin_path(path: &str) -> bool {
    match path.strip_prefix(ADMIN_PATH_PREFIX) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl View {
    /// Navigate to `path`. Entering the admin area from outside starts at the
    /// credential form; moving within it keeps the current admin state.
    pub fn navigate(self, path: &str) -> View {
        match (self, is_admin_path(path)) {
            (View::Search, true) => View::Admin(AdminView::LoggedOut),
            (admin @ View::Admin(_), true) => admin,
            (_, false) => View::Search,
        }
    }

    pub fn login_succeeded(self) -> View {
        match self {
            View::Admin(AdminView::LoggedOut) => View::Admin(AdminView::LoggedIn),
            other => other,
        }
    }

    pub fn logged_out(self) -> View {
        match self {
            View::Admin(AdminView::LoggedIn) => View::Admin(AdminView::LoggedOut),
            other => other,
        }
    }

    /// State reached by opening `path` directly, optionally with a valid session.
    pub fn for_path(path: &str, authenticated: bool) -> View {
        let view = View::Search.navigate(path);
        if authenticated {
            view.login_succeeded()
        } else {
            view
        }
    }
}
