//! The class-name vocabulary shared by the markup and the components, and the
//! view-models that stand in for the document regions the components update.
//!
//! The class names are the contract between the rendered HTML, the
//! stylesheet and `/static/app.js`, so they must not be renamed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use maud::{Markup, PreEscaped, html};

use crate::api::TransactionId;

/// The button that collapses/expands the sidebar.
pub const SIDEBAR_TOGGLE: &str = "sidebar-toggle";
/// The body class of the page layout that owns the sidebar.
pub const SIDEBAR_MINI: &str = "sidebar-mini";
/// Body class for a collapsed sidebar.
pub const SIDEBAR_COLLAPSE: &str = "sidebar-collapse";
/// Body class for an open sidebar (mobile layout).
pub const SIDEBAR_OPEN: &str = "sidebar-open";
/// Menu item that opens the log in modal.
pub const MENU_ITEM_LOGIN: &str = "menu-item_login";
/// Menu item that opens the registration modal.
pub const MENU_ITEM_REGISTER: &str = "menu-item_register";
/// Menu item that logs the user out.
pub const MENU_ITEM_LOGOUT: &str = "menu-item_logout";
/// The control that deletes the current account.
pub const REMOVE_ACCOUNT: &str = "remove-account";
/// The region holding the transaction list.
pub const CONTENT: &str = "content";
/// The heading holding the account name.
pub const CONTENT_TITLE: &str = "content-title";
/// The delete button of a single transaction, carries `data-id`.
pub const TRANSACTION_REMOVE: &str = "transaction__remove";
/// Utility class that hides an element.
pub const HIDDEN: &str = "hidden";

/// An ordered set of CSS classes, the equivalent of `Element.classList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Create a class list from `classes`, skipping duplicates.
    pub fn new(classes: &[&str]) -> Self {
        let mut list = Self::default();

        for class in classes {
            list.add(class);
        }

        list
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|existing| existing == class)
    }

    pub fn add(&mut self, class: &str) {
        if !self.contains(class) {
            self.0.push(class.to_owned());
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.0.retain(|existing| existing != class);
    }

    /// Remove `class` if present, otherwise add it.
    ///
    /// Returns whether the class is present afterwards.
    pub fn toggle(&mut self, class: &str) -> bool {
        if self.contains(class) {
            self.remove(class);
            false
        } else {
            self.add(class);
            true
        }
    }

    /// The classes as the value of an HTML `class` attribute.
    pub fn to_attribute(&self) -> String {
        self.0.join(" ")
    }
}

/// The model of a single document region: its classes and its inner HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub class_list: ClassList,
    inner_html: String,
}

impl Element {
    pub fn new(classes: &[&str]) -> Self {
        Self {
            class_list: ClassList::new(classes),
            inner_html: String::new(),
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Replace the contents with already escaped HTML.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    /// Append already escaped HTML after the existing contents.
    pub fn append_inner_html(&mut self, html: &str) {
        self.inner_html.push_str(html);
    }

    /// Replace the contents with `text`, escaping it.
    pub fn set_text_content(&mut self, text: &str) {
        self.inner_html = html!((text)).into_string();
    }

    #[cfg(test)]
    pub fn is_hidden(&self) -> bool {
        self.class_list.contains(HIDDEN)
    }

    /// The contents as markup, ready to be embedded into a view.
    pub fn contents(&self) -> Markup {
        PreEscaped(self.inner_html.clone())
    }
}

/// The document level regions that more than one component writes to.
///
/// The sidebar hides the remove-account control on log out and the
/// transactions page toggles it on render, so both hold a [SharedDocument].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: Element,
    pub content_title: Element,
    pub remove_account: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            body: Element::new(&[SIDEBAR_MINI]),
            content_title: Element::new(&[CONTENT_TITLE]),
            remove_account: Element::new(&[REMOVE_ACCOUNT, HIDDEN]),
        }
    }
}

pub type SharedDocument = Arc<Mutex<Document>>;

/// Create an empty document shared between the components of one session.
pub fn new_shared_document() -> SharedDocument {
    Arc::new(Mutex::new(Document::default()))
}

/// Lock the document.
///
/// Every write to the document is a single field update, so a poisoned lock
/// still holds a consistent document and is recovered.
pub fn lock_document(document: &SharedDocument) -> MutexGuard<'_, Document> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The control a UI route stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    SidebarToggle,
    MenuLogin,
    MenuRegister,
    MenuLogout,
    RemoveAccount,
    RemoveTransaction(TransactionId),
}
