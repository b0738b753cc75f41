pub mod page;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::state::AppState;

pub use rest::{
    analyze_handler, clear_history_handler, list_history_handler, select_entry_handler,
    state_handler, toggle_view_handler,
};

/// Builds the HTML page routes and the JSON API routes over one shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(page::index_page))
        .route("/analyze", post(page::analyze_form))
        .route("/toggle-history", post(page::toggle_history_form))
        .route("/history/clear", post(page::clear_history_form))
        .route("/history/{id}/select", post(page::select_entry_page));

    let api_routes = Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/state", get(state_handler))
        .route(
            "/api/history",
            get(list_history_handler).delete(clear_history_handler),
        )
        .route("/api/history/{id}/select", post(select_entry_handler))
        .route("/api/view/toggle", post(toggle_view_handler));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .with_state(app_state)
}
