//! Request middleware for the TaskHelper server.
//!
//! - Session resolution from the session cookie
//! - Access policy enforcement on the matched route

pub mod access;
pub mod session;

pub use access::access_middleware;
pub use session::{
    CurrentSession, clear_session_cookie, create_session_cookie, extract_cookie,
    session_middleware,
};
