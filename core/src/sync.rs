//! Collection synchronization: the local mirror of the remote todo list.
//!
//! # Design
//! `TodoSynchronizer` owns the only local copy of the collection and mutates
//! it exclusively from server responses; nothing is applied before the
//! server confirms it. A failed operation records a scoped error and leaves
//! the collection exactly as it was. Every request carries the current
//! session token, and operations refuse to run when no session exists.
//!
//! Reconciliation splices by id (replace the matching record, or append),
//! so the collection never holds two records with one id.

use log::{debug, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, SyncError, ValidationError};
use crate::http::Transport;
use crate::session::SessionManager;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Owns the local todo collection and keeps it consistent with the service.
pub struct TodoSynchronizer {
    api: ApiClient,
    transport: Box<dyn Transport>,
    todos: Vec<Todo>,
    last_error: Option<SyncError>,
}

impl TodoSynchronizer {
    pub fn new(api: ApiClient, transport: Box<dyn Transport>) -> Self {
        Self {
            api,
            transport,
            todos: Vec::new(),
            last_error: None,
        }
    }

    /// Replace the local collection with the server's list, in server order.
    pub fn refresh(&mut self, sessions: &SessionManager) -> Result<&[Todo], SyncError> {
        self.last_error = None;
        let token = self.require_token(sessions)?;
        match self.fetch_list(token) {
            Ok(todos) => {
                debug!("refreshed {} todos", todos.len());
                self.todos = todos;
                Ok(&self.todos)
            }
            Err(err) => Err(self.fail("Failed to load todos", err)),
        }
    }

    /// Create a todo from `title`, appending the server's record on success.
    ///
    /// The title is trimmed of surrounding whitespace; a title that is empty
    /// after trimming is rejected without a network call.
    pub fn create(&mut self, sessions: &SessionManager, title: &str) -> Result<&Todo, SyncError> {
        self.last_error = None;
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(self.refuse(ValidationError::EmptyTitle.into()));
        }
        let token = self.require_token(sessions)?;
        let input = CreateTodo {
            title: trimmed.to_string(),
        };
        match self.send_create(token, &input) {
            Ok(todo) => {
                debug!("created todo {}", todo.id);
                Ok(self.splice(todo))
            }
            Err(err) => Err(self.fail("Failed to create todo", err)),
        }
    }

    /// Ask the server to flip `id`'s completion flag, applying the confirmed
    /// record on success. The local flag is never flipped ahead of the
    /// response.
    pub fn toggle_completion(
        &mut self,
        sessions: &SessionManager,
        id: u64,
    ) -> Result<&Todo, SyncError> {
        self.last_error = None;
        let Some(current) = self.todos.iter().find(|t| t.id == id) else {
            return Err(self.refuse(ValidationError::UnknownTodo(id).into()));
        };
        let desired = !current.completed;
        let token = self.require_token(sessions)?;
        let input = UpdateTodo {
            title: None,
            completed: Some(desired),
        };
        match self.send_update(token, id, &input) {
            Ok(todo) => {
                debug!("toggled todo {id} to completed={}", todo.completed);
                Ok(self.splice(todo))
            }
            Err(err) => Err(self.fail("Failed to update todo", err)),
        }
    }

    /// Delete `id` on the server, dropping the local record on success.
    pub fn remove(&mut self, sessions: &SessionManager, id: u64) -> Result<(), SyncError> {
        self.last_error = None;
        let token = self.require_token(sessions)?;
        match self.send_delete(token, id) {
            Ok(()) => {
                self.todos.retain(|t| t.id != id);
                debug!("removed todo {id}");
                Ok(())
            }
            Err(err) => Err(self.fail("Failed to delete todo", err)),
        }
    }

    /// The local collection, in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn total(&self) -> usize {
        self.todos.len()
    }

    /// Number of records currently marked completed.
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// The failure recorded by the most recent operation, if any.
    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn require_token<'a>(&mut self, sessions: &'a SessionManager) -> Result<&'a str, SyncError> {
        match sessions.token() {
            Some(token) => Ok(token),
            None => Err(self.refuse(SyncError::NoSession)),
        }
    }

    fn fetch_list(&self, token: &str) -> Result<Vec<Todo>, ApiError> {
        let request = self.api.build_list_todos(token);
        let response = self.transport.execute(&request)?;
        self.api.parse_list_todos(response)
    }

    fn send_create(&self, token: &str, input: &CreateTodo) -> Result<Todo, ApiError> {
        let request = self.api.build_create_todo(token, input)?;
        let response = self.transport.execute(&request)?;
        self.api.parse_create_todo(response)
    }

    fn send_update(&self, token: &str, id: u64, input: &UpdateTodo) -> Result<Todo, ApiError> {
        let request = self.api.build_update_todo(token, id, input)?;
        let response = self.transport.execute(&request)?;
        self.api.parse_update_todo(response)
    }

    fn send_delete(&self, token: &str, id: u64) -> Result<(), ApiError> {
        let request = self.api.build_delete_todo(token, id);
        let response = self.transport.execute(&request)?;
        self.api.parse_delete_todo(response)
    }

    /// Insert `todo`, replacing any record with the same id.
    fn splice(&mut self, todo: Todo) -> &Todo {
        let index = match self.todos.iter().position(|t| t.id == todo.id) {
            Some(index) => {
                self.todos[index] = todo;
                index
            }
            None => {
                self.todos.push(todo);
                self.todos.len() - 1
            }
        };
        &self.todos[index]
    }

    fn refuse(&mut self, err: SyncError) -> SyncError {
        self.last_error = Some(err.clone());
        err
    }

    fn fail(&mut self, prefix: &str, err: ApiError) -> SyncError {
        warn!("{prefix}: {err}");
        let sync = SyncError::Failed(format!("{prefix}: {}", err.detail()));
        self.last_error = Some(sync.clone());
        sync
    }
}
