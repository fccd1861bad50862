//! The sidebar: the collapse toggle, the auth menu and the accounts widget.

use std::{collections::BTreeSet, sync::Arc};

use axum::{Extension, extract::Path, response::Response};
use maud::{Markup, html};

use crate::{
    Error,
    api::{ApiResponse, UserApi},
    app::{AppController, AppState, ModalId},
    dom::{
        ClickTarget, HIDDEN, MENU_ITEM_LOGIN, MENU_ITEM_LOGOUT, MENU_ITEM_REGISTER,
        SIDEBAR_COLLAPSE, SIDEBAR_OPEN, SIDEBAR_TOGGLE, SharedDocument, lock_document,
    },
    endpoints::{self, format_endpoint},
    session::{SessionHandle, render_session},
};

/// The click handlers [Sidebar::init] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Listener {
    ToggleButton,
    AuthLinks,
}

/// The sidebar navigation.
///
/// Clicks only have an effect once the matching listener was registered by
/// [Sidebar::init].
pub struct Sidebar {
    document: SharedDocument,
    app: Arc<dyn AppController>,
    users: Arc<dyn UserApi>,
    listeners: BTreeSet<Listener>,
}

impl Sidebar {
    pub fn new(
        document: SharedDocument,
        app: Arc<dyn AppController>,
        users: Arc<dyn UserApi>,
    ) -> Self {
        Self {
            document,
            app,
            users,
            listeners: BTreeSet::new(),
        }
    }

    /// Register the toggle button and the auth links. Calling it again registers nothing new.
    pub fn init(&mut self) {
        self.init_toggle_button();
        self.init_auth_links();
    }

    pub fn init_toggle_button(&mut self) {
        self.listen(Listener::ToggleButton);
    }

    pub fn init_auth_links(&mut self) {
        self.listen(Listener::AuthLinks);
    }

    fn listen(&mut self, listener: Listener) {
        if !self.listeners.insert(listener) {
            tracing::debug!("sidebar listener {listener:?} is already registered");
        }
    }

    fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    /// Dispatch a click to the registered listeners.
    ///
    /// Returns whether a listener handled the click.
    ///
    /// # Errors
    ///
    /// Returns an error if a modal is missing or logging out fails.
    pub async fn handle_click(&self, target: &ClickTarget) -> Result<bool, Error> {
        match target {
            ClickTarget::SidebarToggle if self.is_listening(Listener::ToggleButton) => {
                self.toggle();
            }
            ClickTarget::MenuLogin if self.is_listening(Listener::AuthLinks) => {
                self.open_modal(ModalId::Login)?;
            }
            ClickTarget::MenuRegister if self.is_listening(Listener::AuthLinks) => {
                self.open_modal(ModalId::Register)?;
            }
            ClickTarget::MenuLogout if self.is_listening(Listener::AuthLinks) => {
                self.log_out().await?;
            }
            _ => return Ok(false),
        }

        Ok(true)
    }

    /// Toggle both the collapsed and the open class on the body.
    pub fn toggle(&self) {
        let mut document = lock_document(&self.document);
        document.body.class_list.toggle(SIDEBAR_COLLAPSE);
        document.body.class_list.toggle(SIDEBAR_OPEN);
    }

    pub fn open_modal(&self, id: ModalId) -> Result<(), Error> {
        self.app
            .get_modal(id)
            .ok_or(Error::UnknownModal(id))?
            .open();

        Ok(())
    }

    /// Log out on the backend, then hide the account controls and reset the app.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it rejects the log out or cannot be
    /// reached. Nothing is changed in that case.
    pub async fn log_out(&self) -> Result<(), Error> {
        self.users
            .logout()
            .await
            .and_then(ApiResponse::into_result)
            .inspect_err(|error| tracing::error!("could not log out: {error}"))?;

        lock_document(&self.document)
            .remove_account
            .class_list
            .add(HIDDEN);
        self.app.set_state(AppState::Init);

        Ok(())
    }
}

/// The sidebar markup with `accounts` rendered below the menu.
pub fn sidebar_view(state: AppState, accounts: Markup) -> Markup {
    let logged_in = state == AppState::UserLogged;
    let menu_item_style = "menu-item block w-full px-4 py-2 text-left rounded \
        hover:bg-gray-100 dark:hover:bg-gray-700 cursor-pointer";

    html! {
        aside class="main-sidebar"
        {
            button
                type="button"
                class=(SIDEBAR_TOGGLE)
                aria-label="Toggle sidebar"
                hx-post=(endpoints::SIDEBAR_TOGGLE)
                hx-target="body"
                hx-swap="innerHTML"
            {
                "☰"
            }

            nav
            {
                ul class="sidebar-menu space-y-1"
                {
                    @if logged_in {
                        li
                        {
                            button
                                type="button"
                                class={ (MENU_ITEM_LOGOUT) " " (menu_item_style) }
                                hx-post=(endpoints::LOG_OUT)
                                hx-target="body"
                                hx-swap="innerHTML"
                                hx-target-error="#alert-container"
                            {
                                "Log out"
                            }
                        }
                    } @else {
                        li
                        {
                            button
                                type="button"
                                class={ (MENU_ITEM_LOGIN) " " (menu_item_style) }
                                hx-post=(format_endpoint(endpoints::OPEN_MODAL, ModalId::Login))
                                hx-target="body"
                                hx-swap="innerHTML"
                            {
                                "Log in"
                            }
                        }
                        li
                        {
                            button
                                type="button"
                                class={ (MENU_ITEM_REGISTER) " " (menu_item_style) }
                                hx-post=(format_endpoint(endpoints::OPEN_MODAL, ModalId::Register))
                                hx-target="body"
                                hx-swap="innerHTML"
                            {
                                "Register"
                            }
                        }
                    }
                }
            }

            (accounts)
        }
    }
}

pub async fn toggle_sidebar_endpoint(Extension(session): Extension<SessionHandle>) -> Response {
    let session = session.lock().await;

    if let Err(error) = session.sidebar.handle_click(&ClickTarget::SidebarToggle).await {
        return error.into_alert_response();
    }

    render_session(&session)
}

/// Open a modal. The log in and registration modals are opened by the sidebar menu.
pub async fn open_modal_endpoint(
    Extension(session): Extension<SessionHandle>,
    Path(modal): Path<ModalId>,
) -> Response {
    let session = session.lock().await;

    let result = match modal {
        ModalId::Login => session.sidebar.handle_click(&ClickTarget::MenuLogin).await,
        ModalId::Register => session.sidebar.handle_click(&ClickTarget::MenuRegister).await,
        other => session.sidebar.open_modal(other).map(|_| true),
    };

    if let Err(error) = result {
        return error.into_alert_response();
    }

    render_session(&session)
}

pub async fn close_modal_endpoint(
    Extension(session): Extension<SessionHandle>,
    Path(modal): Path<ModalId>,
) -> Response {
    let session = session.lock().await;

    match session.app.get_modal(modal) {
        Some(window) => window.close(),
        None => return Error::UnknownModal(modal).into_alert_response(),
    }

    render_session(&session)
}

pub async fn log_out_endpoint(Extension(session): Extension<SessionHandle>) -> Response {
    let mut session = session.lock().await;

    if let Err(error) = session.sidebar.handle_click(&ClickTarget::MenuLogout).await {
        return error.into_alert_response();
    }
    session.apply_refreshes().await;

    render_session(&session)
}
