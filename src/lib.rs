//! Coinpurse is a personal finance web UI for a remote accounts and
//! transactions server.
//!
//! The server renders the UI with [maud] and keeps the state of each browser
//! in a session on the server. Controls in the page send their events with
//! htmx and receive the new contents of the page body.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod accounts_widget;
mod alert;
mod api;
mod app;
mod confirm;
mod dom;
mod endpoints;
mod error;
mod format;
mod forms;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod routing;
mod server_state;
mod session;
mod sidebar;
mod transactions_page;

#[cfg(test)]
mod test_utils;

pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use server_state::{ServerState, ServiceFactory, create_cookie_key};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
