//! The transactions page: the account title, its incomes and expenses, and the
//! controls that delete the account or a single transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query},
    response::Response,
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    api::{
        AccountApi, AccountId, ApiResponse, RenderOptions, Services, Transaction, TransactionApi,
        TransactionId,
    },
    app::{AppController, AppState, ModalId},
    confirm::{Answered, Confirm},
    dom::{
        CONTENT, ClickTarget, Document, Element, HIDDEN, SharedDocument, TRANSACTION_REMOVE,
        lock_document,
    },
    endpoints::{self, format_endpoint},
    format::format_date,
    html::{BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE},
    session::{SessionHandle, render_session},
};

pub const REMOVE_ACCOUNT_PROMPT: &str = "Do you really want to delete this account?";
pub const REMOVE_TRANSACTION_PROMPT: &str = "Do you really want to delete this transaction?";
/// Shown instead of the list when a logged in user's account has no transactions.
pub const NOT_FOUND_PLACEHOLDER: &str = "Transactions not found";

/// The page listing the transactions of one account.
pub struct TransactionsPage {
    element: Element,
    content: Element,
    document: SharedDocument,
    app: Arc<dyn AppController>,
    accounts: Arc<dyn AccountApi>,
    transactions: Arc<dyn TransactionApi>,
    last_options: Option<RenderOptions>,
}

impl TransactionsPage {
    /// Create the page inside `element`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingElement] if there is no element to render into.
    pub fn new(
        element: Option<Element>,
        document: SharedDocument,
        app: Arc<dyn AppController>,
        services: &Services,
    ) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement)?;

        Ok(Self {
            element,
            content: Element::new(&[CONTENT]),
            document,
            app,
            accounts: services.accounts.clone(),
            transactions: services.transactions.clone(),
            last_options: None,
        })
    }

    /// The options of the last render, if the page has not been cleared since.
    pub fn last_options(&self) -> Option<&RenderOptions> {
        self.last_options.as_ref()
    }

    #[cfg(test)]
    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Render the account in `options`.
    ///
    /// The account and its transactions are requested at the same time and
    /// each response only updates its own region, so a failed request leaves
    /// its region as it was.
    ///
    /// Returns `false` without doing anything if `options` is `None`.
    pub async fn render(&mut self, options: Option<RenderOptions>) -> bool {
        let Some(options) = options else {
            return false;
        };
        self.last_options = Some(options.clone());

        let (account, transactions) = tokio::join!(
            self.accounts.get(&options.account_id),
            self.transactions.list(&options)
        );

        match account.and_then(ApiResponse::into_data) {
            Ok(account) => self.render_title(&account.name),
            Err(error) => tracing::warn!("could not load account {}: {error}", options.account_id),
        }

        match transactions.and_then(ApiResponse::into_data) {
            Ok(transactions) => {
                self.content.set_inner_html("");
                self.render_transactions(&transactions);
            }
            Err(error) => tracing::warn!(
                "could not load the transactions of account {}: {error}",
                options.account_id
            ),
        }

        true
    }

    /// Render the last rendered account again.
    pub async fn update(&mut self) -> bool {
        let options = self.last_options.clone();

        self.render(options).await
    }

    pub fn clear(&mut self) {
        self.render_transactions(&[]);
        self.render_title("");
        self.last_options = None;
    }

    /// Delete the rendered account once the user confirms.
    ///
    /// Returns whether the account was deleted.
    pub async fn remove_account(&mut self, confirm: &dyn Confirm) -> bool {
        let Some(options) = &self.last_options else {
            return false;
        };
        if !confirm.confirm(REMOVE_ACCOUNT_PROMPT) {
            return false;
        }

        let account_id = options.account_id.clone();
        if let Err(error) = self
            .accounts
            .remove(&account_id)
            .await
            .and_then(ApiResponse::into_result)
        {
            tracing::warn!("could not delete account {account_id}: {error}");
            return false;
        }

        self.content.set_inner_html("");
        self.clear();
        self.app.update_widgets();
        self.app.update_forms();
        lock_document(&self.document)
            .remove_account
            .class_list
            .add(HIDDEN);

        true
    }

    /// Delete a transaction once the user confirms and refresh the whole app.
    ///
    /// Returns whether the transaction was deleted.
    pub async fn remove_transaction(&self, id: &TransactionId, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(REMOVE_TRANSACTION_PROMPT) {
            return false;
        }

        match self
            .transactions
            .remove(id)
            .await
            .and_then(ApiResponse::into_result)
        {
            Ok(_) => {
                self.app.update();
                true
            }
            Err(error) => {
                tracing::warn!("could not delete transaction {id}: {error}");
                false
            }
        }
    }

    /// Dispatch a click inside the page to the delete controls.
    pub async fn handle_click(&mut self, target: &ClickTarget, confirm: &dyn Confirm) -> bool {
        match target {
            ClickTarget::RemoveAccount => self.remove_account(confirm).await,
            ClickTarget::RemoveTransaction(id) => self.remove_transaction(id, confirm).await,
            _ => false,
        }
    }

    /// Show the transactions.
    ///
    /// Transactions are added after the current contents, an empty list
    /// replaces them.
    pub fn render_transactions(&mut self, data: &[Transaction]) {
        let logged_in = self.app.state() == AppState::UserLogged;
        self.toggle_remove_button(logged_in);

        if data.is_empty() {
            let placeholder = if logged_in { NOT_FOUND_PLACEHOLDER } else { "" };
            self.content.set_text_content(placeholder);
            return;
        }

        let fragments = data
            .iter()
            .map(|item| transaction_view(item).into_string())
            .collect::<String>();
        self.content.append_inner_html(&fragments);
    }

    pub fn render_title(&self, title: &str) {
        lock_document(&self.document)
            .content_title
            .set_text_content(title);
    }

    fn toggle_remove_button(&self, logged_in: bool) {
        let mut document = lock_document(&self.document);
        let classes = &mut document.remove_account.class_list;

        if logged_in {
            classes.remove(HIDDEN);
        } else {
            classes.add(HIDDEN);
        }
    }
}

/// The markup of a single income or expense.
pub fn transaction_view(item: &Transaction) -> Markup {
    html! {
        div class={ "transaction transaction_" (item.kind.as_str()) " row" }
        {
            div class="col-md-7 transaction__details"
            {
                div class="transaction__icon"
                {
                    span class="fa fa-money fa-2x" {}
                }
                div class="transaction__info"
                {
                    h4 class="transaction__title" { (item.name) }
                    div class="transaction__date" { (format_date(&item.created_at)) }
                }
            }

            div class="col-md-3"
            {
                div class="transaction__summ"
                {
                    (item.kind.sign()) " " (item.sum)
                    span class="currency" { "₽" }
                }
            }

            div class="col-md-2 transaction__controls"
            {
                button
                    class={ "btn red_btn " (TRANSACTION_REMOVE) " " (BUTTON_DELETE_STYLE) }
                    data-id=(item.id)
                    hx-delete=(format_endpoint(endpoints::TRANSACTION, &item.id))
                    hx-confirm=(REMOVE_TRANSACTION_PROMPT)
                    hx-vals=r#"{"confirmed": "true"}"#
                    hx-target="body"
                    hx-swap="innerHTML"
                    hx-target-error="#alert-container"
                {
                    i class="fa fa-trash" {}
                }
            }
        }
    }
}

/// The page markup. `document` holds the title and the remove-account control.
pub fn transactions_page_view(page: &TransactionsPage, document: &Document) -> Markup {
    let logged_in = page.app.state() == AppState::UserLogged;

    html! {
        section class=(page.element.class_list.to_attribute())
        {
            header class="content-header flex items-center gap-4 mb-4"
            {
                h1 class=(document.content_title.class_list.to_attribute())
                {
                    (document.content_title.contents())
                }

                button
                    class={ (document.remove_account.class_list.to_attribute()) " " (BUTTON_SECONDARY_STYLE) }
                    hx-delete=(endpoints::CURRENT_ACCOUNT)
                    hx-confirm=(REMOVE_ACCOUNT_PROMPT)
                    hx-vals=r#"{"confirmed": "true"}"#
                    hx-target="body"
                    hx-swap="innerHTML"
                    hx-target-error="#alert-container"
                {
                    "Remove account"
                }

                @if logged_in {
                    button
                        class={ "create-income-button " (BUTTON_SECONDARY_STYLE) }
                        hx-post=(format_endpoint(endpoints::OPEN_MODAL, ModalId::NewIncome))
                        hx-target="body"
                        hx-swap="innerHTML"
                    {
                        "New income"
                    }

                    button
                        class={ "create-expense-button " (BUTTON_SECONDARY_STYLE) }
                        hx-post=(format_endpoint(endpoints::OPEN_MODAL, ModalId::NewExpense))
                        hx-target="body"
                        hx-swap="innerHTML"
                    {
                        "New expense"
                    }
                }
            }

            section class=(page.content.class_list.to_attribute())
            {
                (page.content.contents())
            }
        }
    }
}

/// The user's answer to a confirmation prompt, sent along with a delete.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirmed: bool,
}

/// Render the transactions page of an account.
pub async fn account_view_endpoint(
    Extension(session): Extension<SessionHandle>,
    Path(account_id): Path<String>,
) -> Response {
    let account_id = AccountId::new(&account_id);
    let mut session = session.lock().await;

    session
        .page
        .render(Some(RenderOptions::new(account_id.clone())))
        .await;
    session.accounts_widget.select(Some(account_id));
    session.apply_refreshes().await;

    render_session(&session)
}

pub async fn update_page_endpoint(Extension(session): Extension<SessionHandle>) -> Response {
    let mut session = session.lock().await;
    session.page.update().await;
    session.apply_refreshes().await;

    render_session(&session)
}

/// Delete the account shown on the transactions page.
pub async fn delete_account_endpoint(
    Extension(session): Extension<SessionHandle>,
    Query(form): Query<ConfirmForm>,
) -> Response {
    let mut session = session.lock().await;

    let removed = session
        .page
        .handle_click(&ClickTarget::RemoveAccount, &Answered(form.confirmed))
        .await;
    if removed {
        session.accounts_widget.select(None);
    }
    session.apply_refreshes().await;

    render_session(&session)
}

pub async fn delete_transaction_endpoint(
    Extension(session): Extension<SessionHandle>,
    Path(transaction_id): Path<String>,
    Query(form): Query<ConfirmForm>,
) -> Response {
    let transaction_id = TransactionId::new(&transaction_id);
    let mut session = session.lock().await;

    session
        .page
        .handle_click(
            &ClickTarget::RemoveTransaction(transaction_id),
            &Answered(form.confirmed),
        )
        .await;
    session.apply_refreshes().await;

    render_session(&session)
}

#[cfg(test)]
mod transactions_page_tests {
    use std::sync::Arc;

    use crate::{
        Error,
        api::{AccountId, RenderOptions, Services, TransactionId},
        app::{App, AppController, AppState, Refresh},
        dom::{ClickTarget, Element, SharedDocument, lock_document, new_shared_document},
        test_utils::{
            BackendCall, FakeBackend, Operation, ScriptedConfirm, account, expense, income,
        },
    };

    use super::{
        NOT_FOUND_PLACEHOLDER, REMOVE_ACCOUNT_PROMPT, REMOVE_TRANSACTION_PROMPT, TransactionsPage,
    };

    struct Fixture {
        page: TransactionsPage,
        app: Arc<App>,
        document: SharedDocument,
        backend: Arc<FakeBackend>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(FakeBackend::default());
        backend.set_accounts(vec![account("1", "Cash"), account("2", "Card")]);
        backend.set_transactions(vec![
            expense("5", "Coffee", 3.5, "1"),
            income("6", "Salary", 1200.0, "1"),
            expense("7", "Bus", 0.9, "2"),
        ]);

        let document = new_shared_document();
        let app = Arc::new(App::new(document.clone()));
        let page = TransactionsPage::new(
            Some(Element::new(&["content-wrapper"])),
            document.clone(),
            app.clone(),
            &Services::from_backend(backend.clone()),
        )
        .unwrap();

        Fixture {
            page,
            app,
            document,
            backend,
        }
    }

    fn logged_in_fixture() -> Fixture {
        let fixture = fixture();
        fixture.app.set_state(AppState::UserLogged);
        fixture.app.take_refreshes();
        fixture
    }

    fn options(account_id: &str) -> Option<RenderOptions> {
        Some(RenderOptions::new(AccountId::new(account_id)))
    }

    fn title(document: &SharedDocument) -> String {
        lock_document(document).content_title.inner_html().to_owned()
    }

    #[test]
    fn construction_without_element_fails() {
        let backend = Arc::new(FakeBackend::default());
        let document = new_shared_document();
        let app = Arc::new(App::new(document.clone()));

        let result = TransactionsPage::new(
            None,
            document,
            app,
            &Services::from_backend(backend.clone()),
        );

        assert!(matches!(result, Err(Error::MissingElement)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn render_without_options_does_nothing() {
        let Fixture {
            mut page, backend, ..
        } = fixture();

        assert!(!page.render(None).await);

        assert_eq!(page.last_options(), None);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn render_without_options_keeps_previous_options() {
        let Fixture { mut page, .. } = fixture();
        page.render(options("1")).await;

        page.render(None).await;

        assert_eq!(page.last_options(), options("1").as_ref());
    }

    #[tokio::test]
    async fn render_shows_title_and_transactions() {
        let Fixture {
            mut page,
            document,
            backend,
            ..
        } = logged_in_fixture();

        assert!(page.render(options("1")).await);

        assert_eq!(page.last_options(), options("1").as_ref());
        assert_eq!(title(&document), "Cash");
        let content = page.content().inner_html();
        assert!(content.contains("Coffee"));
        assert!(content.contains("Salary"));
        assert!(!content.contains("Bus"));
        let mut calls = backend.calls();
        calls.sort_by_key(|call| format!("{call:?}"));
        assert_eq!(
            calls,
            vec![
                BackendCall::GetAccount(AccountId::new("1")),
                BackendCall::ListTransactions(AccountId::new("1")),
            ]
        );
    }

    #[tokio::test]
    async fn failed_account_read_leaves_title_untouched() {
        let Fixture {
            mut page,
            document,
            backend,
            ..
        } = logged_in_fixture();
        page.render(options("1")).await;
        backend.fail(Operation::GetAccount, "Account not found");

        page.render(options("2")).await;

        assert_eq!(title(&document), "Cash");
        assert!(page.content().inner_html().contains("Bus"));
        assert_eq!(page.last_options(), options("2").as_ref());
    }

    #[tokio::test]
    async fn failed_list_read_leaves_transactions_untouched() {
        let Fixture {
            mut page,
            document,
            backend,
            ..
        } = logged_in_fixture();
        page.render(options("1")).await;
        backend.fail(Operation::ListTransactions, "Unauthorized");

        page.render(options("2")).await;

        assert_eq!(title(&document), "Card");
        assert!(page.content().inner_html().contains("Coffee"));
        assert!(!page.content().inner_html().contains("Bus"));
    }

    #[tokio::test]
    async fn repeated_render_replaces_list() {
        let Fixture { mut page, .. } = logged_in_fixture();

        page.render(options("1")).await;
        page.render(options("1")).await;

        assert_eq!(page.content().inner_html().matches("Coffee").count(), 1);
    }

    #[tokio::test]
    async fn render_transactions_appends_to_content() {
        let Fixture { mut page, .. } = logged_in_fixture();

        page.render_transactions(&[expense("5", "Coffee", 3.5, "1")]);
        page.render_transactions(&[income("6", "Salary", 10.0, "1")]);

        let content = page.content().inner_html();
        assert!(content.find("Coffee") < content.find("Salary"));
    }

    #[tokio::test]
    async fn empty_list_shows_placeholder_when_logged_in() {
        let Fixture {
            mut page, document, ..
        } = logged_in_fixture();

        page.render_transactions(&[]);

        assert_eq!(page.content().inner_html(), NOT_FOUND_PLACEHOLDER);
        assert!(!lock_document(&document).remove_account.is_hidden());
    }

    #[tokio::test]
    async fn empty_list_shows_nothing_when_logged_out() {
        let Fixture {
            mut page, document, ..
        } = fixture();
        page.render_transactions(&[expense("5", "Coffee", 3.5, "1")]);

        page.render_transactions(&[]);

        assert_eq!(page.content().inner_html(), "");
        assert!(lock_document(&document).remove_account.is_hidden());
    }

    #[tokio::test]
    async fn update_without_render_makes_no_calls() {
        let Fixture {
            mut page, backend, ..
        } = fixture();

        assert!(!page.update().await);

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn update_repeats_last_render() {
        let Fixture {
            mut page, backend, ..
        } = logged_in_fixture();
        page.render(options("2")).await;
        backend.take_calls();

        assert!(page.update().await);

        assert!(
            backend
                .calls()
                .contains(&BackendCall::ListTransactions(AccountId::new("2")))
        );
    }

    #[tokio::test]
    async fn clear_forgets_options_and_blanks_title() {
        let Fixture {
            mut page, document, ..
        } = logged_in_fixture();
        page.render(options("1")).await;

        page.clear();

        assert_eq!(page.last_options(), None);
        assert_eq!(title(&document), "");
        assert_eq!(page.content().inner_html(), NOT_FOUND_PLACEHOLDER);
    }

    #[tokio::test]
    async fn remove_account_without_render_does_nothing() {
        let Fixture {
            mut page, backend, ..
        } = logged_in_fixture();
        let confirm = ScriptedConfirm::new(&[true]);

        assert!(!page.remove_account(&confirm).await);

        assert!(confirm.prompts().is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn declined_account_removal_changes_nothing() {
        let Fixture {
            mut page,
            app,
            document,
            backend,
        } = logged_in_fixture();
        page.render(options("1")).await;
        backend.take_calls();
        let content_before = page.content().clone();
        let confirm = ScriptedConfirm::new(&[false]);

        assert!(!page.remove_account(&confirm).await);

        assert_eq!(confirm.prompts(), vec![REMOVE_ACCOUNT_PROMPT.to_owned()]);
        assert!(backend.calls().is_empty());
        assert_eq!(page.content(), &content_before);
        assert_eq!(title(&document), "Cash");
        assert!(app.take_refreshes().is_empty());
    }

    #[tokio::test]
    async fn confirmed_account_removal_clears_page_and_refreshes_widgets() {
        let Fixture {
            mut page,
            app,
            document,
            backend,
        } = logged_in_fixture();
        page.render(options("1")).await;
        backend.take_calls();

        let removed = page
            .handle_click(&ClickTarget::RemoveAccount, &ScriptedConfirm::new(&[true]))
            .await;

        assert!(removed);
        assert_eq!(
            backend.calls(),
            vec![BackendCall::RemoveAccount(AccountId::new("1"))]
        );
        assert_eq!(page.last_options(), None);
        assert_eq!(title(&document), "");
        assert!(lock_document(&document).remove_account.is_hidden());
        assert_eq!(app.take_refreshes(), vec![Refresh::Widgets, Refresh::Forms]);
    }

    #[tokio::test]
    async fn rejected_account_removal_keeps_page() {
        let Fixture {
            mut page,
            app,
            document,
            backend,
        } = logged_in_fixture();
        page.render(options("1")).await;
        backend.fail(Operation::RemoveAccount, "Account has transactions");

        assert!(!page.remove_account(&ScriptedConfirm::new(&[true])).await);

        assert_eq!(page.last_options(), options("1").as_ref());
        assert_eq!(title(&document), "Cash");
        assert!(app.take_refreshes().is_empty());
    }

    #[tokio::test]
    async fn declined_transaction_removal_makes_no_call() {
        let Fixture {
            mut page,
            app,
            backend,
            ..
        } = logged_in_fixture();
        let confirm = ScriptedConfirm::new(&[false]);

        let removed = page
            .handle_click(
                &ClickTarget::RemoveTransaction(TransactionId::new("5")),
                &confirm,
            )
            .await;

        assert!(!removed);
        assert_eq!(confirm.prompts(), vec![REMOVE_TRANSACTION_PROMPT.to_owned()]);
        assert!(backend.calls().is_empty());
        assert!(app.take_refreshes().is_empty());
    }

    #[tokio::test]
    async fn confirmed_transaction_removal_updates_whole_app() {
        let Fixture {
            page, app, backend, ..
        } = logged_in_fixture();

        let removed = page
            .remove_transaction(&TransactionId::new("5"), &ScriptedConfirm::new(&[true]))
            .await;

        assert!(removed);
        assert_eq!(
            backend.calls(),
            vec![BackendCall::RemoveTransaction(TransactionId::new("5"))]
        );
        assert_eq!(app.take_refreshes(), vec![Refresh::All]);
    }

    #[tokio::test]
    async fn other_clicks_are_ignored() {
        let Fixture {
            mut page, backend, ..
        } = logged_in_fixture();

        assert!(
            !page
                .handle_click(&ClickTarget::SidebarToggle, &ScriptedConfirm::new(&[true]))
                .await
        );
        assert!(backend.calls().is_empty());
    }
}
