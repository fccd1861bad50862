//! The records exchanged with the REST backend.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, forms::FormData};

/// Backends send IDs either as JSON strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// The ID of an account, owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for AccountId {
    fn from(value: RawId) -> Self {
        Self(value.into())
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ID of a transaction, owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for TransactionId {
    fn from(value: RawId) -> Self {
        Self(value.into())
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The sign shown in front of the sum.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        }
    }
}

/// An income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub name: String,
    pub sum: f64,
    /// The creation time as sent by the backend, e.g. "2019-03-10 03:20:41".
    pub created_at: String,
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

/// A named account that transactions belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// The balance, if the backend includes it.
    #[serde(default)]
    pub sum: Option<f64>,
}

/// The user the backend session belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// The options the transactions page was rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub account_id: AccountId,
}

impl RenderOptions {
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }
}

fn field<'a>(data: &'a FormData, name: &str) -> &'a str {
    data.get(name).map(String::as_str).unwrap_or_default()
}

/// The fields of the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterData {
    pub fn from_form(data: &FormData) -> Self {
        Self {
            name: field(data, "name").to_owned(),
            email: field(data, "email").to_owned(),
            password: field(data, "password").to_owned(),
        }
    }
}

/// The fields of the log in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

impl LoginData {
    pub fn from_form(data: &FormData) -> Self {
        Self {
            email: field(data, "email").to_owned(),
            password: field(data, "password").to_owned(),
        }
    }
}

/// A transaction to be created by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub name: String,
    pub sum: f64,
    pub account_id: AccountId,
}

impl NewTransaction {
    /// Read a transaction of `kind` from the submitted form.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidFormData] if the sum is not a number or no
    /// account was chosen.
    pub fn from_form(kind: TransactionKind, data: &FormData) -> Result<Self, Error> {
        let sum = field(data, "sum").trim();
        let sum = sum
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| Error::InvalidFormData(format!("\"{sum}\" is not a valid sum")))?;

        let account_id = field(data, "account_id");
        if account_id.is_empty() {
            return Err(Error::InvalidFormData("choose an account".to_owned()));
        }

        Ok(Self {
            kind,
            name: field(data, "name").to_owned(),
            sum,
            account_id: AccountId::new(account_id),
        })
    }
}
