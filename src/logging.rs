//! Middleware for logging UI requests and the responses sent back.

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_htmx::{HX_REQUEST, HX_TRIGGER};

/// Bodies longer than this many bytes are shortened in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The form fields whose values never reach the logs.
const REDACTED_FIELDS: [&str; 1] = ["password"];

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Log the request and response for each request.
///
/// Both are logged at the `info` level, with bodies longer than
/// [LOG_BODY_LENGTH_LIMIT] bytes shortened. The full bodies are logged at the
/// `debug` level. Passwords in submitted forms are replaced with asterisks.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read the body of {} {}: {error}", parts.method, parts.uri);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let display_text = if parts.method == Method::POST && is_form(&parts.headers) {
        redact_passwords(&body_text)
    } else {
        body_text.clone()
    };
    let from_htmx = parts.headers.contains_key(HX_REQUEST);
    tracing::info!(
        "{} {} (htmx: {from_htmx}) body: {}",
        parts.method,
        parts.uri,
        shorten(&display_text)
    );
    tracing::debug!("Request headers: {:#?}\nfull body: {display_text:?}", parts.headers);

    let response = next.run(Request::from_parts(parts, body_text.into())).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read the response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let trigger = parts
        .headers
        .get(HX_TRIGGER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    tracing::info!(
        "Sending {} trigger: {trigger:?} body: {}",
        parts.status,
        shorten(&body_text)
    );
    tracing::debug!("Full response body: {body_text:?}");

    Response::from_parts(parts, body_text.into())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE))
}

async fn read_body(body: Body) -> Result<String, axum::Error> {
    let bytes = to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Replace the values of password fields in a URL encoded form.
fn redact_passwords(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if REDACTED_FIELDS.contains(&name) => format!("{name}=********"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Cut `text` at the last character boundary within [LOG_BODY_LENGTH_LIMIT].
fn shorten(text: &str) -> String {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return format!("{text:?}");
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    format!("{:?}...", &text[..end])
}
