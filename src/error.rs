//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, app::ModalId, internal_server_error::InternalServerError, not_found};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transactions page was constructed without an element to render into.
    #[error("the transactions page needs an element to render into")]
    MissingElement,

    /// The backend answered with `success: false`.
    ///
    /// The message is the one supplied by the backend and is meant to be shown
    /// to the user.
    #[error("{0}")]
    Api(String),

    /// The backend answered with success but without the expected payload.
    #[error("the response did not contain any data")]
    MissingData,

    /// The backend could not be reached or its response could not be read.
    ///
    /// Callers should pass in the original error as a string.
    #[error("could not reach the server: {0}")]
    Http(String),

    /// The configured backend URL is not an absolute URL.
    #[error("invalid backend URL \"{0}\"")]
    InvalidBackendUrl(String),

    /// The app has no modal registered under this ID.
    #[error("there is no modal named \"{0}\"")]
    UnknownModal(ModalId),

    /// A submitted form could not be read.
    #[error("{0}")]
    InvalidFormData(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        tracing::warn!("a request to the backend failed: {value}");
        Error::Http(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            Error::Http(_) => InternalServerError {
                description: "The server is unavailable.",
                fix: "Check that the finance server is running and try again.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for the `#alert-container` of the page.
    pub(crate) fn into_alert_response(self) -> Response {
        match self {
            Error::Api(message) => Alert::error("The request was rejected", &message)
                .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidFormData(message) => Alert::error("Invalid form data", &message)
                .into_response_with_status(StatusCode::UNPROCESSABLE_ENTITY),
            Error::Http(_) => Alert::error(
                "Server unavailable",
                "Could not reach the finance server, try again later.",
            )
            .into_response_with_status(StatusCode::BAD_GATEWAY),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
