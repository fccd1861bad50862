//! The registration form and the route it submits to.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Extension, Form, response::Response};
use maud::{Markup, html};

use crate::{
    api::{ApiResponse, RegisterData, UserApi},
    app::{AppController, AppState, ModalId},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, loading_spinner, text_input},
    session::{SessionHandle, render_session},
};

use super::{FormData, FormView, SubmitHandler};

/// Registers a new user and logs them in.
pub struct RegisterForm {
    users: Arc<dyn UserApi>,
    app: Arc<dyn AppController>,
}

impl RegisterForm {
    pub fn new(users: Arc<dyn UserApi>, app: Arc<dyn AppController>) -> Self {
        Self { users, app }
    }
}

#[async_trait]
impl SubmitHandler for RegisterForm {
    fn name(&self) -> &'static str {
        "register"
    }

    async fn on_submit(&self, form: &mut FormView, data: FormData) {
        form.remove_error();

        let result = self
            .users
            .register(&RegisterData::from_form(&data))
            .await
            .and_then(ApiResponse::into_result);

        match result {
            Ok(_) => {
                form.reset();
                self.app.set_state(AppState::UserLogged);
                if let Some(modal) = self.app.get_modal(ModalId::Register) {
                    modal.close();
                }
            }
            Err(error) => {
                tracing::warn!("could not register: {error}");
                form.show_error(self.name(), error.to_string());
            }
        }
    }
}

pub fn register_form_view(form: &FormView) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER)
            hx-target="body"
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="register-form space-y-4 md:space-y-6"
        {
            (text_input("Name", "name", "text", form.value("name")))
            (text_input("Email", "email", "email", form.value("email")))
            (text_input("Password", "password", "password", ""))

            (form.error_view())

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Create account"
            }
        }
    }
}

/// Submit the registration form of the session.
pub async fn register_endpoint(
    Extension(session): Extension<SessionHandle>,
    Form(data): Form<FormData>,
) -> Response {
    let mut session = session.lock().await;
    session.register_form.submit(data).await;
    session.apply_refreshes().await;

    render_session(&session)
}
