//! The income and expense forms.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Extension, Form, extract::Path, response::Response};
use maud::{Markup, html};

use crate::{
    Error,
    api::{Account, AccountId, ApiResponse, NewTransaction, TransactionApi, TransactionKind},
    app::{AppController, ModalId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner, text_input,
    },
    session::{SessionHandle, render_session},
};

use super::{FormData, FormView, SubmitHandler};

/// Creates an income or an expense in one of the user's accounts.
pub struct CreateTransactionForm {
    kind: TransactionKind,
    transactions: Arc<dyn TransactionApi>,
    app: Arc<dyn AppController>,
    accounts: Vec<Account>,
}

impl CreateTransactionForm {
    pub fn new(
        kind: TransactionKind,
        transactions: Arc<dyn TransactionApi>,
        app: Arc<dyn AppController>,
    ) -> Self {
        Self {
            kind,
            transactions,
            app,
            accounts: Vec::new(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The accounts offered in the account select.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Replace the accounts offered in the account select.
    pub fn update(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    pub fn clear(&mut self) {
        self.accounts.clear();
    }

    pub fn modal_id(&self) -> ModalId {
        match self.kind {
            TransactionKind::Income => ModalId::NewIncome,
            TransactionKind::Expense => ModalId::NewExpense,
        }
    }

    async fn create(&self, data: &FormData) -> Result<(), Error> {
        let transaction = NewTransaction::from_form(self.kind, data)?;

        self.transactions
            .create(&transaction)
            .await
            .and_then(ApiResponse::into_result)
            .map(|_| ())
    }
}

#[async_trait]
impl SubmitHandler for CreateTransactionForm {
    fn name(&self) -> &'static str {
        match self.kind {
            TransactionKind::Income => "new-income",
            TransactionKind::Expense => "new-expense",
        }
    }

    async fn on_submit(&self, form: &mut FormView, data: FormData) {
        form.remove_error();

        match self.create(&data).await {
            Ok(()) => {
                form.reset();
                if let Some(modal) = self.app.get_modal(self.modal_id()) {
                    modal.close();
                }
                self.app.update();
            }
            Err(error) => {
                tracing::warn!("could not create the {}: {error}", self.kind.as_str());
                form.show_error(self.name(), error.to_string());
            }
        }
    }
}

/// The form of `handler`, preselecting `selected` unless the user chose another account.
pub fn create_transaction_form_view(
    handler: &CreateTransactionForm,
    form: &FormView,
    selected: Option<&AccountId>,
) -> Markup {
    let chosen = match form.value("account_id") {
        "" => selected.map(AccountId::as_str).unwrap_or_default(),
        chosen => chosen,
    };
    let select_id = format!("{}-account", handler.name());
    let submit_label = match handler.kind() {
        TransactionKind::Income => "Add income",
        TransactionKind::Expense => "Add expense",
    };

    html! {
        form
            hx-post=(endpoints::format_endpoint(endpoints::NEW_TRANSACTION, handler.kind().as_str()))
            hx-target="body"
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class={ "transaction-form transaction-form_" (handler.kind().as_str()) " space-y-4" }
        {
            (text_input("Name", "name", "text", form.value("name")))
            (text_input("Sum", "sum", "text", form.value("sum")))

            div
            {
                label for=(select_id) class=(FORM_LABEL_STYLE) { "Account" }

                select name="account_id" id=(select_id) class=(FORM_TEXT_INPUT_STYLE) required
                {
                    @for account in handler.accounts() {
                        option value=(account.id) selected[account.id.as_str() == chosen]
                        {
                            (account.name)
                        }
                    }
                }
            }

            (form.error_view())

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                (submit_label)
            }
        }
    }
}

/// Submit the income or expense form of the session.
pub async fn create_transaction_endpoint(
    Extension(session): Extension<SessionHandle>,
    Path(kind): Path<TransactionKind>,
    Form(data): Form<FormData>,
) -> Response {
    let mut session = session.lock().await;

    match kind {
        TransactionKind::Income => session.income_form.submit(data).await,
        TransactionKind::Expense => session.expense_form.submit(data).await,
    }
    session.apply_refreshes().await;

    render_session(&session)
}
