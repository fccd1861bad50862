//! One browser's UI: the app controller, the components and their services.
//!
//! Every browser gets a [Session] the first time it requests a UI route. The
//! session ID is kept in a private cookie and the session itself stays on the
//! server, so the components keep their state between requests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    Extension,
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HX_TRIGGER;
use maud::{Markup, html};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    Error,
    accounts_widget::{AccountsWidget, accounts_widget_view},
    api::{AccountId, ApiResponse, Services, TransactionKind},
    app::{App, AppController, AppState, ModalId, Refresh},
    dom::{Element, SharedDocument, lock_document, new_shared_document},
    endpoints::{self, format_endpoint},
    forms::{
        AsyncForm, CreateTransactionForm, LoginForm, RegisterForm, create_transaction_form_view,
        login_form_view, register_form_view,
    },
    html::{BODY_CLASS_EVENT, alert_container, base},
    server_state::ServerState,
    sidebar::{Sidebar, sidebar_view},
    transactions_page::{TransactionsPage, transactions_page_view},
};

/// The name of the cookie holding the session ID.
pub const COOKIE_SESSION_ID: &str = "session_id";

/// A session shared between the requests of one browser.
///
/// Requests of one browser are handled one at a time, in the order they
/// acquire the lock.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// The UI of one browser.
pub struct Session {
    pub(crate) app: Arc<App>,
    document: SharedDocument,
    services: Services,
    pub(crate) sidebar: Sidebar,
    pub(crate) accounts_widget: AccountsWidget,
    pub(crate) login_form: AsyncForm<LoginForm>,
    pub(crate) register_form: AsyncForm<RegisterForm>,
    pub(crate) income_form: AsyncForm<CreateTransactionForm>,
    pub(crate) expense_form: AsyncForm<CreateTransactionForm>,
    pub(crate) page: TransactionsPage,
}

impl Session {
    /// Create the components of a new UI and wire them to `services`.
    ///
    /// # Errors
    /// Returns an error if a component cannot be created.
    pub fn new(services: Services) -> Result<Self, Error> {
        let document = new_shared_document();
        let app = Arc::new(App::new(document.clone()));

        let mut sidebar = Sidebar::new(document.clone(), app.clone(), services.users.clone());
        sidebar.init();

        let page = TransactionsPage::new(
            Some(Element::new(&["content-wrapper"])),
            document.clone(),
            app.clone(),
            &services,
        )?;

        let new_transaction_form = |kind| {
            AsyncForm::new(CreateTransactionForm::new(
                kind,
                services.transactions.clone(),
                app.clone(),
            ))
        };

        Ok(Self {
            accounts_widget: AccountsWidget::new(services.accounts.clone()),
            login_form: AsyncForm::new(LoginForm::new(services.users.clone(), app.clone())),
            register_form: AsyncForm::new(RegisterForm::new(services.users.clone(), app.clone())),
            income_form: new_transaction_form(TransactionKind::Income),
            expense_form: new_transaction_form(TransactionKind::Expense),
            sidebar,
            page,
            app,
            document,
            services,
        })
    }

    /// Ask the backend who is logged in and load their accounts.
    pub async fn start(&mut self) {
        let state = match self
            .services
            .users
            .current()
            .await
            .and_then(ApiResponse::into_data)
        {
            Ok(user) => {
                tracing::debug!("resuming the session of {}", user.email);
                AppState::UserLogged
            }
            Err(error) => {
                tracing::debug!("nobody is logged in: {error}");
                AppState::Init
            }
        };

        self.app.set_state(state);
        self.apply_refreshes().await;
    }

    /// Perform the refreshes the components requested while handling an event.
    pub async fn apply_refreshes(&mut self) {
        for refresh in self.app.take_refreshes() {
            tracing::debug!("applying refresh {refresh:?}");

            match refresh {
                Refresh::All => {
                    self.accounts_widget.update().await;
                    self.page.update().await;
                    self.update_forms().await;
                }
                Refresh::Widgets => self.accounts_widget.update().await,
                Refresh::Forms => self.update_forms().await,
                Refresh::Clear => {
                    self.accounts_widget.clear();
                    self.page.clear();
                    self.login_form.reset();
                    self.register_form.reset();
                    self.income_form.reset();
                    self.expense_form.reset();
                    self.income_form.handler_mut().clear();
                    self.expense_form.handler_mut().clear();
                }
            }
        }
    }

    /// Reload the accounts offered by the income and expense forms.
    async fn update_forms(&mut self) {
        match self
            .services
            .accounts
            .list()
            .await
            .and_then(ApiResponse::into_data)
        {
            Ok(accounts) => {
                self.income_form.handler_mut().update(accounts.clone());
                self.expense_form.handler_mut().update(accounts);
            }
            Err(error) => tracing::warn!("could not load the accounts for the forms: {error}"),
        }
    }

    /// The classes of the `body` element.
    pub fn body_classes(&self) -> String {
        lock_document(&self.document).body.class_list.to_attribute()
    }

    /// The contents of the `body` element.
    pub fn view(&self) -> Markup {
        let state = self.app.state();
        let selected = self.page.last_options().map(|options| &options.account_id);
        let document = lock_document(&self.document);

        html! {
            div class="wrapper flex"
            {
                (sidebar_view(state, accounts_widget_view(&self.accounts_widget)))

                main class="main flex-1"
                {
                    (transactions_page_view(&self.page, &document))
                }
            }

            @for id in self.app.open_modals() {
                (self.modal_view(id, selected))
            }

            (alert_container())
        }
    }

    fn modal_view(&self, id: ModalId, selected: Option<&AccountId>) -> Markup {
        let (title, content) = match id {
            ModalId::Login => ("Log in", login_form_view(self.login_form.view())),
            ModalId::Register => ("Register", register_form_view(self.register_form.view())),
            ModalId::NewIncome => (
                "New income",
                create_transaction_form_view(
                    self.income_form.handler(),
                    self.income_form.view(),
                    selected,
                ),
            ),
            ModalId::NewExpense => (
                "New expense",
                create_transaction_form_view(
                    self.expense_form.handler(),
                    self.expense_form.view(),
                    selected,
                ),
            ),
        };

        html! {
            div class={ "modal modal_" (id) } role="dialog" aria-modal="true" data-modal=(id)
            {
                div class="modal__content w-full max-w-md p-6 rounded bg-white dark:bg-gray-800"
                {
                    header class="flex justify-between items-center mb-4"
                    {
                        h2 class="text-xl font-bold" { (title) }

                        button
                            type="button"
                            class="modal__close"
                            aria-label="Close"
                            hx-post=(format_endpoint(endpoints::CLOSE_MODAL, id))
                            hx-target="body"
                            hx-swap="innerHTML"
                        {
                            "×"
                        }
                    }

                    (content)
                }
            }
        }
    }
}

/// Render the UI of `session` as the new contents of the page body.
///
/// The body classes are sent in the `HX-Trigger` header because the body
/// element itself is not replaced.
pub fn render_session(session: &Session) -> Response {
    let mut trigger = Map::new();
    trigger.insert(
        BODY_CLASS_EVENT.to_owned(),
        Value::String(session.body_classes()),
    );

    (
        [(HX_TRIGGER, Value::Object(trigger).to_string())],
        session.view(),
    )
        .into_response()
}

/// Display the whole page.
pub async fn get_index_page(Extension(session): Extension<SessionHandle>) -> Response {
    let mut session = session.lock().await;

    if session.app.state() == AppState::UserLogged {
        session.app.update();
    }
    session.apply_refreshes().await;

    base("Accounts", &session.body_classes(), &session.view()).into_response()
}

/// How long a session may go without a request before it is dropped.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct StoredSession {
    session: SessionHandle,
    last_access: Instant,
}

/// The live sessions by session ID.
///
/// A session that has not been used for longer than the idle timeout is
/// dropped. Expired sessions are removed whenever a new session is stored.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(SESSION_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    /// Create an empty store that drops sessions idle for longer than `idle_timeout`.
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    /// Get the session with `id` and mark it as used.
    ///
    /// Returns `None` if there is no such session or it has expired.
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let stored = sessions.get_mut(id)?;
        if now.duration_since(stored.last_access) > self.idle_timeout {
            sessions.remove(id);
            tracing::debug!("Dropped expired UI session {id}");
            return None;
        }

        stored.last_access = now;
        Some(stored.session.clone())
    }

    /// Store `session` under `id`, dropping any expired sessions.
    pub fn insert(&self, id: Uuid, session: SessionHandle) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, stored| now.duration_since(stored.last_access) <= self.idle_timeout);
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!("Dropped {dropped} expired UI sessions");
        }

        sessions.insert(
            id,
            StoredSession {
                session,
                last_access: now,
            },
        );
    }

    /// The number of stored sessions, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Middleware function that finds the session of the browser, or starts a new one.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<SessionHandle>` to receive the session.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn session_middleware(
    State(state): State<ServerState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let existing_session = jar
        .get(COOKIE_SESSION_ID)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .and_then(|id| state.sessions.get(&id));

    let (session, new_jar) = match existing_session {
        Some(session) => (session, None),
        None => match start_session(&state).await {
            Ok((id, session)) => {
                let cookie = Cookie::build((COOKIE_SESSION_ID, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Strict);

                (session, Some(jar.add(cookie)))
            }
            Err(error) => {
                tracing::error!("Could not start a UI session: {error}");
                return error.into_response();
            }
        },
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;

    let Some(jar) = new_jar else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

async fn start_session(state: &ServerState) -> Result<(Uuid, SessionHandle), Error> {
    let services = (state.service_factory)()?;
    let mut session = Session::new(services)?;
    session.start().await;

    let id = Uuid::new_v4();
    let session = Arc::new(tokio::sync::Mutex::new(session));
    state.sessions.insert(id, session.clone());
    tracing::info!("Started UI session {id}");

    Ok((id, session))
}
