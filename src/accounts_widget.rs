//! The list of the user's accounts shown in the sidebar.

use std::sync::Arc;

use maud::{Markup, html};

use crate::{
    api::{Account, AccountApi, AccountId, ApiResponse},
    endpoints::{self, format_endpoint},
};

pub struct AccountsWidget {
    accounts_api: Arc<dyn AccountApi>,
    accounts: Vec<Account>,
    selected: Option<AccountId>,
}

impl AccountsWidget {
    pub fn new(accounts_api: Arc<dyn AccountApi>) -> Self {
        Self {
            accounts_api,
            accounts: Vec::new(),
            selected: None,
        }
    }

    /// Reload the accounts. A failed request keeps the current list.
    pub async fn update(&mut self) {
        match self
            .accounts_api
            .list()
            .await
            .and_then(ApiResponse::into_data)
        {
            Ok(accounts) => {
                if self
                    .selected
                    .as_ref()
                    .is_some_and(|selected| !accounts.iter().any(|account| &account.id == selected))
                {
                    self.selected = None;
                }
                self.accounts = accounts;
            }
            Err(error) => tracing::warn!("could not load the accounts: {error}"),
        }
    }

    pub fn clear(&mut self) {
        self.accounts.clear();
        self.selected = None;
    }

    /// Mark `id` as the account shown on the transactions page.
    pub fn select(&mut self, id: Option<AccountId>) {
        self.selected = id;
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn selected(&self) -> Option<&AccountId> {
        self.selected.as_ref()
    }
}

pub fn accounts_widget_view(widget: &AccountsWidget) -> Markup {
    html! {
        @if !widget.accounts().is_empty() {
            ul class="accounts-panel mt-4 space-y-1"
            {
                @for account in widget.accounts() {
                    @let is_selected = widget.selected() == Some(&account.id);

                    li
                        class={ "account" @if is_selected { " account_active font-bold" } }
                        data-id=(account.id)
                    {
                        a
                            href="#"
                            class="flex justify-between px-4 py-2 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
                            hx-get=(format_endpoint(endpoints::ACCOUNT_VIEW, &account.id))
                            hx-target="body"
                            hx-swap="innerHTML"
                            hx-target-error="#alert-container"
                        {
                            span class="account__name" { (account.name) }

                            @if let Some(sum) = account.sum {
                                span class="account__sum"
                                {
                                    (sum) " " span class="currency" { "₽" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
