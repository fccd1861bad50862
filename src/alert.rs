//! Alerts for reporting failed UI actions without replacing the page.
//!
//! Controls that can fail set `hx-target-error="#alert-container"`, so an
//! error response carrying an alert lands in the container rendered by
//! [base](crate::html::base).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An error message with optional details.
pub struct Alert<'a> {
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self { message, details }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="alert alert-danger flex items-start justify-between gap-4 p-4 mb-4
                    text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
            {
                div
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="alert-dismiss"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}
