//! The route for logging out a user.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (
        invalidate_auth_cookie(jar),
        Redirect::to(endpoints::LOG_IN_VIEW),
    )
        .into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};

    use crate::{auth::cookie::COOKIE_TOKEN, endpoints};

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_invalidates_cookie_and_redirects() {
        let hash = Sha512::digest(b"foobar");
        let jar = PrivateCookieJar::new(Key::from(&hash));

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(axum::http::header::LOCATION).unwrap(),
            endpoints::LOG_IN_VIEW
        );

        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(COOKIE_TOKEN))
            .expect("expected a set-cookie header for the auth token");
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
