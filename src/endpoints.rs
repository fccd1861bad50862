//! The URIs of the UI routes.
//!
//! For endpoints that take a parameter, e.g., '/ui/accounts/{account_id}', use [format_endpoint].

use std::fmt::Display;

/// The page with the sidebar, the accounts and the transactions page.
pub const ROOT: &str = "/";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route that collapses or expands the sidebar.
pub const SIDEBAR_TOGGLE: &str = "/ui/sidebar/toggle";
/// The route that opens a modal by name.
pub const OPEN_MODAL: &str = "/ui/modals/{modal}/open";
/// The route that closes a modal by name.
pub const CLOSE_MODAL: &str = "/ui/modals/{modal}/close";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/ui/log_out";
/// The route the registration form submits to.
pub const REGISTER: &str = "/ui/register";
/// The route the log in form submits to.
pub const LOG_IN: &str = "/ui/log_in";
/// The route the income and expense forms submit to.
pub const NEW_TRANSACTION: &str = "/ui/new_transaction/{kind}";
/// The route that renders the transactions page of an account.
pub const ACCOUNT_VIEW: &str = "/ui/accounts/{account_id}";
/// The route that re-renders the transactions page with its last options.
pub const PAGE_UPDATE: &str = "/ui/page/update";
/// The route that deletes the account shown on the transactions page.
pub const CURRENT_ACCOUNT: &str = "/ui/account";
/// The route to delete a single transaction.
pub const TRANSACTION: &str = "/ui/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `param`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/ui/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, param: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        param,
        &endpoint_path[param_end..]
    )
}
