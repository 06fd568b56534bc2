//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Password fields in form submissions are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    if headers.method.eq(&axum::http::Method::POST)
        && headers.headers.get(CONTENT_TYPE)
            == Some(&"application/x-www-form-urlencoded".parse().unwrap())
    {
        let display_text = redact_password(&body_text, "password");
        let display_text = redact_password(&display_text, "confirm_password");
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

fn redact_password(form_text: &str, field_name: &str) -> String {
    let field_prefix = format!("{}=", field_name);

    // The field must start the body or follow a separator, so that e.g.
    // "password=" never matches inside "confirm_password=".
    let password_start = if form_text.starts_with(&field_prefix) {
        Some(0)
    } else {
        form_text
            .find(&format!("&{}", field_prefix))
            .map(|position| position + 1)
    };

    let start = match password_start {
        Some(password_pos) => password_pos,
        None => return form_text.to_string(),
    };

    let password_end = form_text[start..].find('&');
    let end = match password_end {
        Some(end) => start + end,
        None => form_text.len(),
    };

    format!(
        "{}{}********{}",
        &form_text[..start],
        field_prefix,
        &form_text[end..]
    )
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod redact_password_tests {
    use super::redact_password;

    #[test]
    fn redacts_password_field() {
        let form_text = "full_name=Ivan+Petrov+Sydorovych&password=hunter2&remember=on";

        let redacted = redact_password(form_text, "password");

        assert_eq!(
            redacted,
            "full_name=Ivan+Petrov+Sydorovych&password=********&remember=on"
        );
    }

    #[test]
    fn redacts_password_at_end_of_body() {
        let redacted = redact_password("password=hunter2", "password");

        assert_eq!(redacted, "password=********");
    }

    #[test]
    fn does_not_match_inside_a_longer_field_name() {
        let form_text = "confirm_password=hunter2&password=hunter3";

        let redacted = redact_password(form_text, "password");

        assert_eq!(redacted, "confirm_password=hunter2&password=********");
    }

    #[test]
    fn redacts_confirm_password_separately() {
        let form_text = "confirm_password=hunter2&password=hunter3";

        let redacted = redact_password(form_text, "confirm_password");

        assert_eq!(redacted, "confirm_password=********&password=hunter3");
    }

    #[test]
    fn leaves_other_fields_untouched() {
        let form_text = "full_name=Ivan+Petrov+Sydorovych";

        assert_eq!(redact_password(form_text, "password"), form_text);
    }
}
