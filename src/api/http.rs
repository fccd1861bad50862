//! The production services: a reqwest client for the REST backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

use super::{
    Account, AccountApi, AccountId, Acknowledgement, ApiResponse, LoginData, NewTransaction,
    RegisterData, RenderOptions, Transaction, TransactionApi, TransactionId, User, UserApi,
};

/// How long a single backend request may take.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct IdForm<'a> {
    id: &'a str,
}

/// A client for the REST backend.
///
/// The backend authenticates with a session cookie, so every UI session
/// should get its own [HttpBackend] and thereby its own cookie store.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url`, e.g. "http://localhost:8000".
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidBackendUrl] if `base_url` is not an absolute URL
    /// and [Error::Http] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let url =
            Url::parse(base_url).map_err(|_| Error::InvalidBackendUrl(base_url.to_owned()))?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBackendUrl(base_url.to_owned()));
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The URL of the account with `id`, with the ID percent-encoded as a single path segment.
    fn account_url(&self, id: &AccountId) -> Result<Url, Error> {
        let invalid = || Error::InvalidBackendUrl(self.base_url.clone());

        let mut url = Url::parse(&self.url("/account")).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(id.as_str());

        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, Error> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();

        let body = response.json::<ApiResponse<T>>().await.inspect_err(|error| {
            tracing::error!("could not read the response from {url} ({status}): {error}");
        })?;

        if !body.success {
            tracing::debug!("{url} answered with an unsuccessful response ({status})");
        }

        Ok(body)
    }
}

#[async_trait]
impl UserApi for HttpBackend {
    async fn register(&self, data: &RegisterData) -> Result<ApiResponse<User>, Error> {
        self.send(self.client.post(self.url("/user/register")).form(data))
            .await
    }

    async fn login(&self, data: &LoginData) -> Result<ApiResponse<User>, Error> {
        self.send(self.client.post(self.url("/user/login")).form(data))
            .await
    }

    async fn logout(&self) -> Result<Acknowledgement, Error> {
        self.send(self.client.post(self.url("/user/logout"))).await
    }

    async fn current(&self) -> Result<ApiResponse<User>, Error> {
        self.send(self.client.get(self.url("/user/current"))).await
    }
}

#[async_trait]
impl AccountApi for HttpBackend {
    async fn get(&self, id: &AccountId) -> Result<ApiResponse<Account>, Error> {
        let url = self.account_url(id)?;

        self.send(self.client.get(url)).await
    }

    async fn list(&self) -> Result<ApiResponse<Vec<Account>>, Error> {
        self.send(self.client.get(self.url("/account"))).await
    }

    async fn remove(&self, id: &AccountId) -> Result<Acknowledgement, Error> {
        let form = IdForm { id: id.as_str() };

        self.send(self.client.delete(self.url("/account")).form(&form))
            .await
    }
}

#[async_trait]
impl TransactionApi for HttpBackend {
    async fn list(&self, options: &RenderOptions) -> Result<ApiResponse<Vec<Transaction>>, Error> {
        self.send(self.client.get(self.url("/transaction")).query(options))
            .await
    }

    async fn create(&self, transaction: &NewTransaction) -> Result<Acknowledgement, Error> {
        self.send(self.client.put(self.url("/transaction")).form(transaction))
            .await
    }

    async fn remove(&self, id: &TransactionId) -> Result<Acknowledgement, Error> {
        let form = IdForm { id: id.as_str() };

        self.send(self.client.delete(self.url("/transaction")).form(&form))
            .await
    }
}
