use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

/// Assert the response tells the client to set the body classes to `classes`.
#[track_caller]
pub(crate) fn assert_body_class(response: &Response<Body>, classes: &str) {
    let trigger: serde_json::Value = serde_json::from_str(&get_header(response, "hx-trigger"))
        .expect("hx-trigger is not JSON");

    assert_eq!(trigger["body-class"], classes);
}
