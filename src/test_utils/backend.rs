use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde::de::IgnoredAny;

use crate::{
    Error,
    api::{
        Account, AccountApi, AccountId, Acknowledgement, ApiResponse, LoginData, NewTransaction,
        RegisterData, RenderOptions, Transaction, TransactionApi, TransactionId, User, UserApi,
    },
};

/// A request the fake backend received.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    /// Registration with this email.
    Register(String),
    /// Log in with this email.
    Login(String),
    Logout,
    Current,
    GetAccount(AccountId),
    ListAccounts,
    RemoveAccount(AccountId),
    ListTransactions(AccountId),
    CreateTransaction(NewTransaction),
    RemoveTransaction(TransactionId),
}

/// The kinds of requests, for failing one kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Operation {
    Register,
    Login,
    Logout,
    Current,
    GetAccount,
    ListAccounts,
    RemoveAccount,
    ListTransactions,
    CreateTransaction,
    RemoveTransaction,
}

impl BackendCall {
    fn operation(&self) -> Operation {
        match self {
            BackendCall::Register(_) => Operation::Register,
            BackendCall::Login(_) => Operation::Login,
            BackendCall::Logout => Operation::Logout,
            BackendCall::Current => Operation::Current,
            BackendCall::GetAccount(_) => Operation::GetAccount,
            BackendCall::ListAccounts => Operation::ListAccounts,
            BackendCall::RemoveAccount(_) => Operation::RemoveAccount,
            BackendCall::ListTransactions(_) => Operation::ListTransactions,
            BackendCall::CreateTransaction(_) => Operation::CreateTransaction,
            BackendCall::RemoveTransaction(_) => Operation::RemoveTransaction,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<BackendCall>,
    rejection: Option<String>,
    failures: BTreeMap<Operation, String>,
    offline: bool,
    user: Option<User>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

/// An in-memory backend that records every request.
///
/// Requests succeed unless the backend was told to reject them, either all
/// of them with [FakeBackend::reject] or one kind with [FakeBackend::fail].
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Answer every request with `success: false` and `message`.
    pub(crate) fn reject(&self, message: &str) {
        self.state().rejection = Some(message.to_owned());
    }

    /// Answer requests of `operation` with `success: false` and `message`.
    pub(crate) fn fail(&self, operation: Operation, message: &str) {
        self.state().failures.insert(operation, message.to_owned());
    }

    /// Stop rejecting requests.
    pub(crate) fn accept(&self) {
        let mut state = self.state();
        state.rejection = None;
        state.failures.clear();
        state.offline = false;
    }

    /// Fail every request as if the backend could not be reached.
    pub(crate) fn go_offline(&self) {
        self.state().offline = true;
    }

    /// Make `user` the logged in user of the backend session.
    pub(crate) fn log_in_as(&self, user: User) {
        self.state().user = Some(user);
    }

    pub(crate) fn set_accounts(&self, accounts: Vec<Account>) {
        self.state().accounts = accounts;
    }

    pub(crate) fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.state().transactions = transactions;
    }

    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.state().calls.clone()
    }

    /// The calls so far, forgetting them.
    pub(crate) fn take_calls(&self) -> Vec<BackendCall> {
        std::mem::take(&mut self.state().calls)
    }

    /// Record `call` and check whether it should fail.
    fn receive(&self, call: BackendCall) -> Result<Option<String>, Error> {
        let mut state = self.state();
        let operation = call.operation();
        state.calls.push(call);

        if state.offline {
            return Err(Error::Http("connection refused".to_owned()));
        }

        Ok(state
            .failures
            .get(&operation)
            .or(state.rejection.as_ref())
            .cloned())
    }

    fn answer<T>(
        &self,
        call: BackendCall,
        data: impl FnOnce(&mut FakeState) -> Result<T, String>,
    ) -> Result<ApiResponse<T>, Error> {
        if let Some(message) = self.receive(call)? {
            return Ok(ApiResponse::failure(&message));
        }

        match data(&mut self.state()) {
            Ok(data) => Ok(ApiResponse::ok(data)),
            Err(message) => Ok(ApiResponse::failure(&message)),
        }
    }

    fn acknowledge(
        &self,
        call: BackendCall,
        apply: impl FnOnce(&mut FakeState),
    ) -> Result<Acknowledgement, Error> {
        self.answer(call, |state| {
            apply(state);
            Ok(IgnoredAny)
        })
    }
}

#[async_trait]
impl UserApi for FakeBackend {
    async fn register(&self, data: &RegisterData) -> Result<ApiResponse<User>, Error> {
        let user = User {
            id: Some("1".to_owned()),
            name: data.name.clone(),
            email: data.email.clone(),
        };

        self.answer(BackendCall::Register(data.email.clone()), |state| {
            state.user = Some(user.clone());
            Ok(user)
        })
    }

    async fn login(&self, data: &LoginData) -> Result<ApiResponse<User>, Error> {
        let user = User {
            id: Some("1".to_owned()),
            name: String::new(),
            email: data.email.clone(),
        };

        self.answer(BackendCall::Login(data.email.clone()), |state| {
            state.user = Some(user.clone());
            Ok(user)
        })
    }

    async fn logout(&self) -> Result<Acknowledgement, Error> {
        self.acknowledge(BackendCall::Logout, |state| state.user = None)
    }

    async fn current(&self) -> Result<ApiResponse<User>, Error> {
        self.answer(BackendCall::Current, |state| {
            state
                .user
                .clone()
                .ok_or_else(|| "Необходима авторизация".to_owned())
        })
    }
}

#[async_trait]
impl AccountApi for FakeBackend {
    async fn get(&self, id: &AccountId) -> Result<ApiResponse<Account>, Error> {
        self.answer(BackendCall::GetAccount(id.clone()), |state| {
            state
                .accounts
                .iter()
                .find(|account| &account.id == id)
                .cloned()
                .ok_or_else(|| "Account not found".to_owned())
        })
    }

    async fn list(&self) -> Result<ApiResponse<Vec<Account>>, Error> {
        self.answer(BackendCall::ListAccounts, |state| Ok(state.accounts.clone()))
    }

    async fn remove(&self, id: &AccountId) -> Result<Acknowledgement, Error> {
        self.acknowledge(BackendCall::RemoveAccount(id.clone()), |state| {
            state.accounts.retain(|account| &account.id != id);
            state
                .transactions
                .retain(|transaction| transaction.account_id.as_ref() != Some(id));
        })
    }
}

#[async_trait]
impl TransactionApi for FakeBackend {
    async fn list(&self, options: &RenderOptions) -> Result<ApiResponse<Vec<Transaction>>, Error> {
        let account_id = options.account_id.clone();

        self.answer(BackendCall::ListTransactions(account_id.clone()), |state| {
            Ok(state
                .transactions
                .iter()
                .filter(|transaction| transaction.account_id.as_ref() == Some(&account_id))
                .cloned()
                .collect())
        })
    }

    async fn create(&self, transaction: &NewTransaction) -> Result<Acknowledgement, Error> {
        self.acknowledge(
            BackendCall::CreateTransaction(transaction.clone()),
            |state| {
                let id = state.transactions.len() + 100;
                state.transactions.push(Transaction {
                    id: TransactionId::new(&id.to_string()),
                    kind: transaction.kind,
                    name: transaction.name.clone(),
                    sum: transaction.sum,
                    created_at: "2019-03-10 03:20:41".to_owned(),
                    account_id: Some(transaction.account_id.clone()),
                });
            },
        )
    }

    async fn remove(&self, id: &TransactionId) -> Result<Acknowledgement, Error> {
        self.acknowledge(BackendCall::RemoveTransaction(id.clone()), |state| {
            state.transactions.retain(|transaction| &transaction.id != id);
        })
    }
}
