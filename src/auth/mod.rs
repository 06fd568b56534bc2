//! Cookie based authentication for the application.
//!
//! A successful log in or registration stores a [token::Token] in a private
//! cookie. The [middleware] module provides guards that check the cookie
//! before protected routes are served.

pub mod cookie;
pub mod middleware;
pub mod token;

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
