use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;
use todolist_domain::{
    NewTodo, NewTodoList, Todo, TodoId, TodoList, TodoListId, TodoListPatch, TodoPatch,
};

/// Storage-layer errors surfaced to handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

impl StoreError {
    pub fn list_not_found(id: &TodoListId) -> Self {
        Self::NotFound {
            entity: "TodoList",
            id: id.to_string(),
        }
    }

    pub fn todo_not_found(id: &TodoId) -> Self {
        Self::NotFound {
            entity: "Todo",
            id: id.to_string(),
        }
    }
}

/// Equality filter over todolists, decoded from query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoListFilter {
    pub title: Option<String>,
}

impl TodoListFilter {
    fn matches(&self, list: &TodoList) -> bool {
        self.title.as_ref().map_or(true, |t| *t == list.title)
    }
}

/// Equality filter over todos, decoded from query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoFilter {
    pub title: Option<String>,
    pub is_complete: Option<bool>,
}

impl TodoFilter {
    fn matches(&self, todo: &Todo) -> bool {
        self.title.as_ref().map_or(true, |t| *t == todo.title)
            && self.is_complete.map_or(true, |c| c == todo.is_complete)
    }
}

/// CRUD over todolists, plus the has-many accessor for their todos.
pub trait TodoListRepository: Send + Sync {
    fn create(&self, input: NewTodoList) -> Result<TodoList, StoreError>;
    fn count(&self, filter: &TodoListFilter) -> Result<u64, StoreError>;
    fn find(&self, filter: &TodoListFilter) -> Result<Vec<TodoList>, StoreError>;
    fn update_all(&self, patch: &TodoListPatch, filter: &TodoListFilter)
        -> Result<u64, StoreError>;
    fn find_by_id(&self, id: &TodoListId) -> Result<TodoList, StoreError>;
    fn update_by_id(&self, id: &TodoListId, patch: &TodoListPatch) -> Result<(), StoreError>;
    fn replace_by_id(&self, id: &TodoListId, input: NewTodoList) -> Result<(), StoreError>;
    fn delete_by_id(&self, id: &TodoListId) -> Result<(), StoreError>;
    fn find_by_title(&self, title: &str) -> Result<Option<TodoList>, StoreError>;

    fn find_todos(&self, id: &TodoListId, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError>;
    fn create_todo(&self, id: &TodoListId, input: NewTodo) -> Result<Todo, StoreError>;
    fn patch_todos(
        &self,
        id: &TodoListId,
        patch: &TodoPatch,
        filter: &TodoFilter,
    ) -> Result<u64, StoreError>;
    fn delete_todos(&self, id: &TodoListId, filter: &TodoFilter) -> Result<u64, StoreError>;
}

/// CRUD over todos, plus the belongs-to accessor for the owning list.
pub trait TodoRepository: Send + Sync {
    fn create(&self, input: NewTodo) -> Result<Todo, StoreError>;
    fn count(&self, filter: &TodoFilter) -> Result<u64, StoreError>;
    fn find(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError>;
    fn find_by_id(&self, id: &TodoId) -> Result<Todo, StoreError>;
    fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<(), StoreError>;
    fn delete_by_id(&self, id: &TodoId) -> Result<(), StoreError>;
    fn todolist(&self, todo_id: &TodoId) -> Result<TodoList, StoreError>;
}

/// In-memory datasource backing both repositories.
///
/// BTreeMaps keyed by ULID ids keep iteration in creation order. The lists
/// lock is always taken before the todos lock.
#[derive(Default)]
pub struct MemoryStore {
    lists: Mutex<BTreeMap<TodoListId, TodoList>>,
    todos: Mutex<BTreeMap<TodoId, Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoListRepository for MemoryStore {
    fn create(&self, input: NewTodoList) -> Result<TodoList, StoreError> {
        let list = input.into_todolist(TodoListId::new());
        self.lists
            .lock()
            .unwrap()
            .insert(list.id.clone(), list.clone());
        Ok(list)
    }

    fn count(&self, filter: &TodoListFilter) -> Result<u64, StoreError> {
        let lists = self.lists.lock().unwrap();
        Ok(lists.values().filter(|l| filter.matches(l)).count() as u64)
    }

    fn find(&self, filter: &TodoListFilter) -> Result<Vec<TodoList>, StoreError> {
        let lists = self.lists.lock().unwrap();
        Ok(lists
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    fn update_all(
        &self,
        patch: &TodoListPatch,
        filter: &TodoListFilter,
    ) -> Result<u64, StoreError> {
        let mut lists = self.lists.lock().unwrap();
        let mut updated = 0u64;
        for list in lists.values_mut() {
            if filter.matches(list) {
                list.apply(patch);
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn find_by_id(&self, id: &TodoListId) -> Result<TodoList, StoreError> {
        let lists = self.lists.lock().unwrap();
        lists
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::list_not_found(id))
    }

    fn update_by_id(&self, id: &TodoListId, patch: &TodoListPatch) -> Result<(), StoreError> {
        let mut lists = self.lists.lock().unwrap();
        let list = lists
            .get_mut(id)
            .ok_or_else(|| StoreError::list_not_found(id))?;
        list.apply(patch);
        Ok(())
    }

    fn replace_by_id(&self, id: &TodoListId, input: NewTodoList) -> Result<(), StoreError> {
        let mut lists = self.lists.lock().unwrap();
        if !lists.contains_key(id) {
            return Err(StoreError::list_not_found(id));
        }
        lists.insert(id.clone(), input.into_todolist(id.clone()));
        Ok(())
    }

    fn delete_by_id(&self, id: &TodoListId) -> Result<(), StoreError> {
        let mut lists = self.lists.lock().unwrap();
        if lists.remove(id).is_none() {
            return Err(StoreError::list_not_found(id));
        }
        // Orphan the children instead of cascading.
        let mut todos = self.todos.lock().unwrap();
        for todo in todos.values_mut() {
            if todo.todo_list_id.as_ref() == Some(id) {
                todo.todo_list_id = None;
            }
        }
        Ok(())
    }

    fn find_by_title(&self, title: &str) -> Result<Option<TodoList>, StoreError> {
        let lists = self.lists.lock().unwrap();
        Ok(lists.values().find(|l| l.title == title).cloned())
    }

    fn find_todos(&self, id: &TodoListId, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let lists = self.lists.lock().unwrap();
        if !lists.contains_key(id) {
            return Err(StoreError::list_not_found(id));
        }
        let todos = self.todos.lock().unwrap();
        Ok(todos
            .values()
            .filter(|t| t.todo_list_id.as_ref() == Some(id) && filter.matches(t))
            .cloned()
            .collect())
    }

    fn create_todo(&self, id: &TodoListId, input: NewTodo) -> Result<Todo, StoreError> {
        let lists = self.lists.lock().unwrap();
        if !lists.contains_key(id) {
            return Err(StoreError::list_not_found(id));
        }
        let mut todo = input.into_todo(TodoId::new());
        todo.todo_list_id = Some(id.clone());
        self.todos
            .lock()
            .unwrap()
            .insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    fn patch_todos(
        &self,
        id: &TodoListId,
        patch: &TodoPatch,
        filter: &TodoFilter,
    ) -> Result<u64, StoreError> {
        let lists = self.lists.lock().unwrap();
        if !lists.contains_key(id) {
            return Err(StoreError::list_not_found(id));
        }
        let mut todos = self.todos.lock().unwrap();
        let mut updated = 0u64;
        for todo in todos.values_mut() {
            if todo.todo_list_id.as_ref() == Some(id) && filter.matches(todo) {
                todo.apply(patch);
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn delete_todos(&self, id: &TodoListId, filter: &TodoFilter) -> Result<u64, StoreError> {
        let lists = self.lists.lock().unwrap();
        if !lists.contains_key(id) {
            return Err(StoreError::list_not_found(id));
        }
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|_, t| !(t.todo_list_id.as_ref() == Some(id) && filter.matches(t)));
        Ok((before - todos.len()) as u64)
    }
}

impl TodoRepository for MemoryStore {
    fn create(&self, input: NewTodo) -> Result<Todo, StoreError> {
        let lists = self.lists.lock().unwrap();
        if let Some(list_id) = &input.todo_list_id {
            if !lists.contains_key(list_id) {
                return Err(StoreError::list_not_found(list_id));
            }
        }
        let todo = input.into_todo(TodoId::new());
        self.todos
            .lock()
            .unwrap()
            .insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    fn count(&self, filter: &TodoFilter) -> Result<u64, StoreError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos.values().filter(|t| filter.matches(t)).count() as u64)
    }

    fn find(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: &TodoId) -> Result<Todo, StoreError> {
        let todos = self.todos.lock().unwrap();
        todos
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::todo_not_found(id))
    }

    fn update_by_id(&self, id: &TodoId, patch: &TodoPatch) -> Result<(), StoreError> {
        let lists = self.lists.lock().unwrap();
        if let Some(list_id) = &patch.todo_list_id {
            if !lists.contains_key(list_id) {
                return Err(StoreError::list_not_found(list_id));
            }
        }
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .get_mut(id)
            .ok_or_else(|| StoreError::todo_not_found(id))?;
        todo.apply(patch);
        Ok(())
    }

    fn delete_by_id(&self, id: &TodoId) -> Result<(), StoreError> {
        let mut todos = self.todos.lock().unwrap();
        if todos.remove(id).is_none() {
            return Err(StoreError::todo_not_found(id));
        }
        Ok(())
    }

    fn todolist(&self, todo_id: &TodoId) -> Result<TodoList, StoreError> {
        let lists = self.lists.lock().unwrap();
        let todos = self.todos.lock().unwrap();
        let todo = todos
            .get(todo_id)
            .ok_or_else(|| StoreError::todo_not_found(todo_id))?;
        let list_id = todo.todo_list_id.as_ref().ok_or(StoreError::NotFound {
            entity: "TodoList",
            id: todo_id.to_string(),
        })?;
        lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| StoreError::list_not_found(list_id))
    }
}
