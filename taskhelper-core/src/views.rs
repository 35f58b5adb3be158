//! View identifiers returned by page routes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::routes;

/// Name of a server-rendered template. Rendering itself happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewId {
    /// Landing page.
    #[serde(rename = "index")]
    Index,
    /// Sign-up form.
    #[serde(rename = "auth/register")]
    Register,
    /// Login form.
    #[serde(rename = "auth/login")]
    Login,
    /// Account dashboard.
    #[serde(rename = "dashboard")]
    Dashboard,
    /// Open tasks.
    #[serde(rename = "task/list")]
    TaskList,
    /// New task form.
    #[serde(rename = "task/create")]
    TaskCreate,
    /// Single task.
    #[serde(rename = "task/detail")]
    TaskDetail,
    /// The user's own tasks.
    #[serde(rename = "task/my")]
    TaskMy,
    /// The helper's accepted tasks.
    #[serde(rename = "task/helper")]
    TaskHelper,
    /// Task application form.
    #[serde(rename = "task/application")]
    TaskApplication,
    /// Helper earnings.
    #[serde(rename = "task/earnings")]
    Earnings,
}

impl ViewId {
    /// Every view, in route order.
    pub const ALL: [ViewId; 11] = [
        ViewId::Index,
        ViewId::Register,
        ViewId::Login,
        ViewId::Dashboard,
        ViewId::TaskList,
        ViewId::TaskCreate,
        ViewId::TaskDetail,
        ViewId::TaskMy,
        ViewId::TaskHelper,
        ViewId::TaskApplication,
        ViewId::Earnings,
    ];

    /// Template name, e.g. `task/detail`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::Index => "index",
            ViewId::Register => "auth/register",
            ViewId::Login => "auth/login",
            ViewId::Dashboard => "dashboard",
            ViewId::TaskList => "task/list",
            ViewId::TaskCreate => "task/create",
            ViewId::TaskDetail => "task/detail",
            ViewId::TaskMy => "task/my",
            ViewId::TaskHelper => "task/helper",
            ViewId::TaskApplication => "task/application",
            ViewId::Earnings => "task/earnings",
        }
    }

    /// Route template that renders this view.
    pub fn route(&self) -> &'static str {
        match self {
            ViewId::Index => routes::INDEX,
            ViewId::Register => routes::REGISTER,
            ViewId::Login => routes::LOGIN,
            ViewId::Dashboard => routes::DASHBOARD,
            ViewId::TaskList => routes::tasks::LIST,
            ViewId::TaskCreate => routes::tasks::CREATE,
            ViewId::TaskDetail => routes::tasks::DETAIL,
            ViewId::TaskMy => routes::tasks::MY,
            ViewId::TaskHelper => routes::tasks::HELPER,
            ViewId::TaskApplication => routes::tasks::APPLICATION,
            ViewId::Earnings => routes::helper::EARNINGS,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
