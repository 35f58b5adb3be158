//! Route templates served by TaskHelper.
//!
//! Templates use axum's `{param}` syntax and double as the keys the access
//! policy matches against.

/// Landing page.
pub const INDEX: &str = "/";
/// Sign-up page.
pub const REGISTER: &str = "/register";
/// Login form (GET) and login processing (POST).
pub const LOGIN: &str = "/login";
/// Logout, GET or POST.
pub const LOGOUT: &str = "/logout";
/// Account dashboard.
pub const DASHBOARD: &str = "/dashboard";

/// Redirect targets of the login/logout flow.
pub mod redirects {
    /// After a successful login.
    pub const LOGIN_SUCCESS: &str = "/";
    /// After a failed login.
    pub const LOGIN_FAILURE: &str = "/login?error=true";
    /// After logout.
    pub const LOGOUT_SUCCESS: &str = "/login?logout";
    /// Anonymous request to a guarded page.
    pub const LOGIN_REQUIRED: &str = "/login";
}

/// Task pages.
pub mod tasks {
    /// All open tasks.
    pub const LIST: &str = "/tasks/list";
    /// New task form.
    pub const CREATE: &str = "/tasks/create";
    /// One task by numeric id.
    pub const DETAIL: &str = "/tasks/detail/{id}";
    /// Tasks posted by the current user.
    pub const MY: &str = "/tasks/my";
    /// Tasks taken by the current helper.
    pub const HELPER: &str = "/tasks/helper";
    /// Application form for a task.
    pub const APPLICATION: &str = "/tasks/{id}/application";
}

/// Helper pages.
pub mod helper {
    /// Helper earnings summary.
    pub const EARNINGS: &str = "/helper/earnings";
}

/// Template helpers.
pub mod utils {
    /// Substitute the `{id}` placeholder of a template.
    pub fn with_id(template: &str, id: impl std::fmt::Display) -> String {
        template.replace("{id}", &id.to_string())
    }
}
