//! CRUD HTTP API over TodoList and Todo entities.
//!
//! Handlers are thin pass-throughs to the repository traits in [`store`];
//! all persistence semantics live behind those traits.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

pub use store::{MemoryStore, StoreError, TodoListRepository, TodoRepository};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub todolists: Arc<dyn TodoListRepository>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            todolists: Arc::new(MemoryStore::new()),
        }
    }
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todolists",
            get(handlers::find_todolists)
                .post(handlers::create_todolist)
                .patch(handlers::update_all_todolists),
        )
        .route("/todolists/count", get(handlers::count_todolists))
        .route(
            "/todolists/:id",
            get(handlers::find_todolist_by_id)
                .patch(handlers::update_todolist_by_id)
                .put(handlers::replace_todolist_by_id)
                .delete(handlers::delete_todolist_by_id),
        )
        .route(
            "/todolists/:id/todos",
            get(handlers::find_todos)
                .post(handlers::create_todo)
                .patch(handlers::patch_todos)
                .delete(handlers::delete_todos),
        )
        .with_state(state)
}
