//! The application controller: global state, the modal registry and the
//! cross-widget refresh requests.

use std::{
    collections::BTreeMap,
    fmt::Display,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};

use crate::dom::{SharedDocument, lock_document};

/// The coarse state of the application, gating the account controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppState {
    /// Nobody is known to be logged in.
    #[default]
    Init,
    UserLogged,
    UserUnlogged,
}

impl AppState {
    pub const ALL: [AppState; 3] = [AppState::Init, AppState::UserLogged, AppState::UserUnlogged];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Init => "init",
            AppState::UserLogged => "user-logged",
            AppState::UserUnlogged => "user-unlogged",
        }
    }

    /// The body class that marks this state, e.g. `app_user-logged`.
    pub fn body_class(&self) -> String {
        format!("app_{}", self.as_str())
    }
}

impl Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The names of the modals in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalId {
    Login,
    Register,
    NewIncome,
    NewExpense,
}

impl ModalId {
    pub const ALL: [ModalId; 4] = [
        ModalId::Login,
        ModalId::Register,
        ModalId::NewIncome,
        ModalId::NewExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModalId::Login => "login",
            ModalId::Register => "register",
            ModalId::NewIncome => "new-income",
            ModalId::NewExpense => "new-expense",
        }
    }
}

impl Display for ModalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An overlay dialog that can be shown and hidden.
pub trait Modal {
    fn open(&self);

    fn close(&self);

    fn is_open(&self) -> bool;
}

/// What the components may ask of the application.
pub trait AppController: Send + Sync {
    /// Look up a modal by name.
    fn get_modal(&self, id: ModalId) -> Option<&dyn Modal>;

    fn set_state(&self, state: AppState);

    fn state(&self) -> AppState;

    /// Refresh every widget, page and form.
    fn update(&self);

    /// Refresh the widgets, e.g. the accounts list.
    fn update_widgets(&self);

    /// Refresh the forms, e.g. the account choices of the transaction forms.
    fn update_forms(&self);
}

/// A refresh requested while handling an event, performed once the event is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    All,
    Widgets,
    Forms,
    /// Forget everything that belongs to the logged out user.
    Clear,
}

#[derive(Debug, Default)]
struct ModalWindow {
    open: AtomicBool,
}

impl Modal for ModalWindow {
    fn open(&self) {
        self.open.store(true, Ordering::Relaxed);
    }

    fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }
}

/// The application controller of one UI session.
///
/// Refreshes are queued rather than performed immediately because they need
/// mutable access to the components that asked for them. The session drains
/// the queue with [App::take_refreshes] after every event.
#[derive(Debug)]
pub struct App {
    state: Mutex<AppState>,
    modals: BTreeMap<ModalId, ModalWindow>,
    refreshes: Mutex<Vec<Refresh>>,
    document: SharedDocument,
}

impl App {
    pub fn new(document: SharedDocument) -> Self {
        let modals = ModalId::ALL
            .into_iter()
            .map(|id| (id, ModalWindow::default()))
            .collect();

        Self {
            state: Mutex::new(AppState::default()),
            modals,
            refreshes: Mutex::new(Vec::new()),
            document,
        }
    }

    /// The modals that are currently shown.
    pub fn open_modals(&self) -> Vec<ModalId> {
        self.modals
            .iter()
            .filter(|(_, modal)| modal.is_open())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Take the queued refreshes in the order they were requested, without duplicates.
    pub fn take_refreshes(&self) -> Vec<Refresh> {
        let queued = std::mem::take(
            &mut *self
                .refreshes
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let mut refreshes = Vec::with_capacity(queued.len());
        for refresh in queued {
            if !refreshes.contains(&refresh) {
                refreshes.push(refresh);
            }
        }

        refreshes
    }

    fn queue(&self, refresh: Refresh) {
        self.refreshes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(refresh);
    }
}

impl AppController for App {
    fn get_modal(&self, id: ModalId) -> Option<&dyn Modal> {
        self.modals.get(&id).map(|modal| modal as &dyn Modal)
    }

    fn set_state(&self, state: AppState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        tracing::debug!("app state changed to {state}");

        {
            let mut document = lock_document(&self.document);
            for other in AppState::ALL {
                document.body.class_list.remove(&other.body_class());
            }
            document.body.class_list.add(&state.body_class());
        }

        match state {
            AppState::UserLogged => self.queue(Refresh::All),
            AppState::Init => self.queue(Refresh::Clear),
            AppState::UserUnlogged => {}
        }
    }

    fn state(&self) -> AppState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self) {
        self.queue(Refresh::All);
    }

    fn update_widgets(&self) {
        self.queue(Refresh::Widgets);
    }

    fn update_forms(&self) {
        self.queue(Refresh::Forms);
    }
}
