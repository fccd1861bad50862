use crate::{
    api::{Account, AccountId, Transaction, TransactionId, TransactionKind},
    forms::FormData,
};

pub(crate) fn form_data(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

pub(crate) fn account(id: &str, name: &str) -> Account {
    Account {
        id: AccountId::new(id),
        name: name.to_owned(),
        sum: None,
    }
}

fn transaction(
    kind: TransactionKind,
    id: &str,
    name: &str,
    sum: f64,
    account_id: &str,
) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        kind,
        name: name.to_owned(),
        sum,
        created_at: "2019-03-10 03:20:41".to_owned(),
        account_id: Some(AccountId::new(account_id)),
    }
}

pub(crate) fn income(id: &str, name: &str, sum: f64, account_id: &str) -> Transaction {
    transaction(TransactionKind::Income, id, name, sum, account_id)
}

pub(crate) fn expense(id: &str, name: &str, sum: f64, account_id: &str) -> Transaction {
    transaction(TransactionKind::Expense, id, name, sum, account_id)
}
