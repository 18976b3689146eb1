use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoListId(String);

impl TodoListId {
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoListId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TodoListId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TodoListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Violations of entity-level invariants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Parent entity grouping todo items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: TodoListId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A single task, optionally owned by a todolist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo_list_id: Option<TodoListId>,
}

/// Body of `POST /todolists` and `PUT /todolists/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodoList {
    pub title: String,
    pub color: Option<String>,
}

impl NewTodoList {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(())
    }

    pub fn into_todolist(self, id: TodoListId) -> TodoList {
        TodoList {
            id,
            title: self.title,
            color: self.color,
        }
    }
}

/// Body of `POST /todolists/{id}/todos`. `todo_list_id` may be omitted;
/// relation-scoped creation forces it to the path id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub desc: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    pub todo_list_id: Option<TodoListId>,
}

impl NewTodo {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(())
    }

    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            desc: self.desc,
            is_complete: self.is_complete,
            todo_list_id: self.todo_list_id,
        }
    }
}

/// Partial update for a todolist. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoListPatch {
    pub title: Option<String>,
    pub color: Option<String>,
}

impl TodoListPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DomainError::EmptyTitle);
            }
        }
        Ok(())
    }

}

impl TodoList {
    pub fn apply(&mut self, patch: &TodoListPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
    }
}

/// Partial update for a todo. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub is_complete: Option<bool>,
    pub todo_list_id: Option<TodoListId>,
}

impl TodoPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(DomainError::EmptyTitle);
            }
        }
        Ok(())
    }
}

impl Todo {
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(desc) = &patch.desc {
            self.desc = Some(desc.clone());
        }
        if let Some(is_complete) = patch.is_complete {
            self.is_complete = is_complete;
        }
        if let Some(list_id) = &patch.todo_list_id {
            self.todo_list_id = Some(list_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todolist_id_new_generates_26_char_ulid() {
        let id = TodoListId::new();
        let id_str = id.as_str();

        assert_eq!(id_str.len(), 26);
        let valid_chars = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
        for c in id_str.chars() {
            assert!(valid_chars.contains(c), "Invalid character: {c}");
        }
    }

    #[test]
    fn ids_are_ordered_by_creation() {
        let first = TodoId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = TodoId::new();
        assert!(first < second);
    }

    #[test]
    fn new_todolist_rejects_blank_title() {
        let input = NewTodoList {
            title: "   ".to_string(),
            color: None,
        };
        assert_eq!(input.validate(), Err(DomainError::EmptyTitle));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut list = TodoList {
            id: TodoListId::new(),
            title: "groceries".to_string(),
            color: Some("red".to_string()),
        };

        list.apply(&TodoListPatch {
            title: Some("errands".to_string()),
            color: None,
        });

        assert_eq!(list.title, "errands");
        assert_eq!(list.color.as_deref(), Some("red"));
    }

    #[test]
    fn todo_patch_can_complete_and_reassign() {
        let list_id = TodoListId::new();
        let mut todo = Todo {
            id: TodoId::new(),
            title: "buy milk".to_string(),
            desc: None,
            is_complete: false,
            todo_list_id: None,
        };

        todo.apply(&TodoPatch {
            is_complete: Some(true),
            todo_list_id: Some(list_id.clone()),
            ..Default::default()
        });

        assert!(todo.is_complete);
        assert_eq!(todo.todo_list_id, Some(list_id));
    }

    #[test]
    fn todo_serializes_without_absent_optionals() {
        let todo = Todo {
            id: TodoId::from("01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string()),
            title: "buy milk".to_string(),
            desc: None,
            is_complete: false,
            todo_list_id: None,
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["title"], "buy milk");
        assert!(json.get("desc").is_none());
        assert!(json.get("todo_list_id").is_none());
    }
}
