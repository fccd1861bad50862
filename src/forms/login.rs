//! The log in form.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Extension, Form, response::Response};
use maud::{Markup, html};

use crate::{
    api::{ApiResponse, LoginData, UserApi},
    app::{AppController, AppState, ModalId},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, loading_spinner, text_input},
    session::{SessionHandle, render_session},
};

use super::{FormData, FormView, SubmitHandler};

pub struct LoginForm {
    users: Arc<dyn UserApi>,
    app: Arc<dyn AppController>,
}

impl LoginForm {
    pub fn new(users: Arc<dyn UserApi>, app: Arc<dyn AppController>) -> Self {
        Self { users, app }
    }
}

#[async_trait]
impl SubmitHandler for LoginForm {
    fn name(&self) -> &'static str {
        "login"
    }

    async fn on_submit(&self, form: &mut FormView, data: FormData) {
        form.remove_error();

        let result = self
            .users
            .login(&LoginData::from_form(&data))
            .await
            .and_then(ApiResponse::into_result);

        match result {
            Ok(_) => {
                form.reset();
                self.app.set_state(AppState::UserLogged);
                if let Some(modal) = self.app.get_modal(ModalId::Login) {
                    modal.close();
                }
            }
            Err(error) => {
                tracing::warn!("could not log in: {error}");
                form.show_error(self.name(), error.to_string());
            }
        }
    }
}

pub fn login_form_view(form: &FormView) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN)
            hx-target="body"
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="login-form space-y-4 md:space-y-6"
        {
            (text_input("Email", "email", "email", form.value("email")))
            (text_input("Password", "password", "password", ""))

            (form.error_view())

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Log in"
            }
        }
    }
}

pub async fn log_in_endpoint(
    Extension(session): Extension<SessionHandle>,
    Form(data): Form<FormData>,
) -> Response {
    let mut session = session.lock().await;
    session.login_form.submit(data).await;
    session.apply_refreshes().await;

    render_session(&session)
}
