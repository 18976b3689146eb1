use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use todolist_domain::{
    NewTodo, NewTodoList, Todo, TodoList, TodoListId, TodoListPatch, TodoPatch,
};

use crate::error::ApiError;
use crate::store::{TodoFilter, TodoListFilter};
use crate::AppState;

/// Count responses for bulk and count endpoints.
#[derive(Debug, Serialize)]
pub struct Count {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
}

pub async fn health() -> (StatusCode, Json<HealthBody>) {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

pub async fn create_todolist(
    State(state): State<AppState>,
    Json(input): Json<NewTodoList>,
) -> Result<(StatusCode, Json<TodoList>), ApiError> {
    input.validate()?;
    let list = state.todolists.create(input)?;
    tracing::info!(id = %list.id, "todolist created");
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn count_todolists(
    State(state): State<AppState>,
    Query(filter): Query<TodoListFilter>,
) -> Result<Json<Count>, ApiError> {
    let count = state.todolists.count(&filter)?;
    Ok(Json(Count { count }))
}

pub async fn find_todolists(
    State(state): State<AppState>,
    Query(filter): Query<TodoListFilter>,
) -> Result<Json<Vec<TodoList>>, ApiError> {
    let lists = state.todolists.find(&filter)?;
    Ok(Json(lists))
}

pub async fn update_all_todolists(
    State(state): State<AppState>,
    Query(filter): Query<TodoListFilter>,
    Json(patch): Json<TodoListPatch>,
) -> Result<Json<Count>, ApiError> {
    patch.validate()?;
    let count = state.todolists.update_all(&patch, &filter)?;
    tracing::info!(count, "todolists patched");
    Ok(Json(Count { count }))
}

pub async fn find_todolist_by_id(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
) -> Result<Json<TodoList>, ApiError> {
    let list = state.todolists.find_by_id(&id)?;
    Ok(Json(list))
}

pub async fn update_todolist_by_id(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Json(patch): Json<TodoListPatch>,
) -> Result<StatusCode, ApiError> {
    patch.validate()?;
    state.todolists.update_by_id(&id, &patch)?;
    tracing::info!(%id, "todolist patched");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn replace_todolist_by_id(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Json(input): Json<NewTodoList>,
) -> Result<StatusCode, ApiError> {
    input.validate()?;
    state.todolists.replace_by_id(&id, input)?;
    tracing::info!(%id, "todolist replaced");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_todolist_by_id(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
) -> Result<StatusCode, ApiError> {
    state.todolists.delete_by_id(&id)?;
    tracing::info!(%id, "todolist deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_todos(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Query(filter): Query<TodoFilter>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.todolists.find_todos(&id, &filter)?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Json(input): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    input.validate()?;
    let todo = state.todolists.create_todo(&id, input)?;
    tracing::info!(list_id = %id, todo_id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn patch_todos(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Query(filter): Query<TodoFilter>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Count>, ApiError> {
    patch.validate()?;
    let count = state.todolists.patch_todos(&id, &patch, &filter)?;
    tracing::info!(list_id = %id, count, "todos patched");
    Ok(Json(Count { count }))
}

pub async fn delete_todos(
    State(state): State<AppState>,
    Path(id): Path<TodoListId>,
    Query(filter): Query<TodoFilter>,
) -> Result<Json<Count>, ApiError> {
    let count = state.todolists.delete_todos(&id, &filter)?;
    tracing::info!(list_id = %id, count, "todos deleted");
    Ok(Json(Count { count }))
}
