#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod confirm;
pub(crate) mod fixtures;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{BackendCall, FakeBackend, Operation};
pub(crate) use confirm::ScriptedConfirm;
pub(crate) use fixtures::{account, expense, form_data, income};
pub(crate) use form::{
    assert_form_error_message, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, parse_markup};
pub(crate) use http::{assert_body_class, assert_content_type, assert_status_ok};
