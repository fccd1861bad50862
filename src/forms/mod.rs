//! Forms that submit to the backend and report its errors.
//!
//! [AsyncForm] owns what every form shares (the entered values, the error
//! message and the submitting flag) and delegates the submission itself to a
//! [SubmitHandler].

mod create_transaction;
mod login;
mod register;

use std::collections::BTreeMap;

use async_trait::async_trait;
use maud::{Markup, html};

pub use create_transaction::{
    CreateTransactionForm, create_transaction_endpoint, create_transaction_form_view,
};
pub use login::{LoginForm, log_in_endpoint, login_form_view};
pub use register::{RegisterForm, register_endpoint, register_form_view};

/// The submitted fields of a form, keyed by input name.
pub type FormData = BTreeMap<String, String>;

/// An error shown inside the form it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub form: &'static str,
    pub message: String,
}

/// The state of a form's inputs and messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub values: FormData,
    pub error: Option<FormError>,
    pub submitting: bool,
}

impl FormView {
    /// Clear the inputs and any error.
    pub fn reset(&mut self) {
        self.values.clear();
        self.error = None;
    }

    pub fn remove_error(&mut self) {
        self.error = None;
    }

    pub fn show_error(&mut self, form: &'static str, message: impl Into<String>) {
        self.error = Some(FormError {
            form,
            message: message.into(),
        });
    }

    /// The entered value of `name`, or an empty string.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    /// The error paragraph, if there is an error to show.
    pub fn error_view(&self) -> Markup {
        html! {
            @if let Some(error) = &self.error {
                p class="form-error text-red-500 text-base" data-form=(error.form)
                {
                    (error.message)
                }
            }
        }
    }
}

/// The behaviour that differs between forms: what a submission does.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// The name errors of this form are reported under.
    fn name(&self) -> &'static str;

    async fn on_submit(&self, form: &mut FormView, data: FormData);
}

/// A form whose submissions are handled by `H`.
pub struct AsyncForm<H> {
    view: FormView,
    handler: H,
}

impl<H: SubmitHandler> AsyncForm<H> {
    pub fn new(handler: H) -> Self {
        Self {
            view: FormView::default(),
            handler,
        }
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Submit `data` once. The entered values stay in the form unless the
    /// handler resets it.
    pub async fn submit(&mut self, data: FormData) {
        tracing::debug!("submitting the {} form", self.handler.name());

        self.view.values = data.clone();
        // Passwords are never rendered back into the form.
        self.view.values.remove("password");
        self.view.submitting = true;
        self.handler.on_submit(&mut self.view, data).await;
        self.view.submitting = false;
    }

    pub fn reset(&mut self) {
        self.view.reset();
    }
}
