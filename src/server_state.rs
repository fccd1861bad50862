//! Implements a struct that holds the state of the UI server.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    Error,
    api::{HttpBackend, Services},
    session::SessionStore,
};

/// Creates the services of a new UI session.
pub type ServiceFactory = Arc<dyn Fn() -> Result<Services, Error> + Send + Sync>;

/// The state of the UI server.
#[derive(Clone)]
pub struct ServerState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The UI sessions by session ID.
    pub sessions: SessionStore,

    /// Creates the services for each new session.
    pub service_factory: ServiceFactory,
}

impl ServerState {
    /// Create a new [ServerState] that talks to the backend at `backend_url`.
    ///
    /// Every session gets its own HTTP client, so each browser has its own
    /// backend session cookie.
    ///
    /// # Errors
    /// Returns an error if `backend_url` is not a valid absolute URL.
    pub fn new(cookie_secret: &str, backend_url: &str) -> Result<Self, Error> {
        // Fail at startup rather than on the first request.
        HttpBackend::new(backend_url)?;

        let backend_url = backend_url.to_owned();
        let service_factory: ServiceFactory = Arc::new(move || {
            let backend = HttpBackend::new(&backend_url)?;
            Ok(Services::from_backend(Arc::new(backend)))
        });

        Ok(Self::with_service_factory(cookie_secret, service_factory))
    }

    /// Create a new [ServerState] whose sessions use the services from `service_factory`.
    pub fn with_service_factory(cookie_secret: &str, service_factory: ServiceFactory) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            sessions: SessionStore::default(),
            service_factory,
        }
    }

    /// Drop sessions that go without a request for longer than `idle_timeout`.
    ///
    /// Any sessions already stored are discarded.
    pub fn with_session_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.sessions = SessionStore::with_idle_timeout(idle_timeout);
        self
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<ServerState> for Key {
    fn from_ref(state: &ServerState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
