//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    endpoints,
    forms::{create_transaction_endpoint, log_in_endpoint, register_endpoint},
    logging::logging_middleware,
    not_found::get_404_not_found,
    server_state::ServerState,
    session::{get_index_page, session_middleware},
    sidebar::{close_modal_endpoint, log_out_endpoint, open_modal_endpoint, toggle_sidebar_endpoint},
    transactions_page::{
        account_view_endpoint, delete_account_endpoint, delete_transaction_endpoint,
        update_page_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: ServerState) -> Router {
    let ui_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::SIDEBAR_TOGGLE, post(toggle_sidebar_endpoint))
        .route(endpoints::OPEN_MODAL, post(open_modal_endpoint))
        .route(endpoints::CLOSE_MODAL, post(close_modal_endpoint))
        .route(endpoints::LOG_OUT, post(log_out_endpoint))
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::NEW_TRANSACTION, post(create_transaction_endpoint))
        .route(endpoints::ACCOUNT_VIEW, get(account_view_endpoint))
        .route(endpoints::PAGE_UPDATE, post(update_page_endpoint))
        .route(endpoints::CURRENT_ACCOUNT, delete(delete_account_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    ui_routes
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
