//! The data-access services the UI components call, and the response envelope
//! the backend wraps every answer in.
//!
//! Components only see the [UserApi], [AccountApi] and [TransactionApi] traits,
//! so tests can substitute in-memory doubles for the HTTP client.

mod http;
mod models;

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, de::IgnoredAny};

use crate::Error;

pub use http::HttpBackend;
pub use models::{
    Account, AccountId, LoginData, NewTransaction, RegisterData, RenderOptions, Transaction,
    TransactionId, TransactionKind, User,
};

/// The error the backend attached to a failed response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Message(String),
    /// Validation errors keyed by the offending field.
    Fields(BTreeMap<String, Vec<String>>),
}

impl Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorDetails::Message(message) => f.write_str(message),
            ErrorDetails::Fields(fields) => {
                let messages = fields.values().flatten().cloned().collect::<Vec<_>>();
                f.write_str(&messages.join(" "))
            }
        }
    }
}

/// The envelope of every backend response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// User endpoints name the payload `user`, the others `data`.
    #[serde(alias = "user")]
    pub data: Option<T>,
    pub error: Option<ErrorDetails>,
}

/// A response whose payload, if any, is not needed.
pub type Acknowledgement = ApiResponse<IgnoredAny>;

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorDetails::Message(message.to_owned())),
        }
    }

    /// Split the response into its success and failure branches.
    ///
    /// # Errors
    ///
    /// Returns [Error::Api] with the backend's message if `success` is false.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        if self.success {
            return Ok(self.data);
        }

        let message = self
            .error
            .map(|error| error.to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "the request was not successful".to_owned());

        Err(Error::Api(message))
    }

    /// Like [ApiResponse::into_result], but a successful response must carry data.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingData] if the response succeeded without data.
    pub fn into_data(self) -> Result<T, Error> {
        self.into_result()?.ok_or(Error::MissingData)
    }
}

/// Registration, authentication and the current user.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn register(&self, data: &RegisterData) -> Result<ApiResponse<User>, Error>;

    async fn login(&self, data: &LoginData) -> Result<ApiResponse<User>, Error>;

    async fn logout(&self) -> Result<Acknowledgement, Error>;

    /// The user the backend session is logged in as.
    async fn current(&self) -> Result<ApiResponse<User>, Error>;
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn get(&self, id: &AccountId) -> Result<ApiResponse<Account>, Error>;

    async fn list(&self) -> Result<ApiResponse<Vec<Account>>, Error>;

    async fn remove(&self, id: &AccountId) -> Result<Acknowledgement, Error>;
}

#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn list(&self, options: &RenderOptions) -> Result<ApiResponse<Vec<Transaction>>, Error>;

    async fn create(&self, transaction: &NewTransaction) -> Result<Acknowledgement, Error>;

    async fn remove(&self, id: &TransactionId) -> Result<Acknowledgement, Error>;
}

/// The services one UI session talks to.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserApi>,
    pub accounts: Arc<dyn AccountApi>,
    pub transactions: Arc<dyn TransactionApi>,
}

impl Services {
    /// Use a single backend for all three services.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserApi + AccountApi + TransactionApi + 'static,
    {
        Self {
            users: backend.clone(),
            accounts: backend.clone(),
            transactions: backend,
        }
    }
}
