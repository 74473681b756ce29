//! Domain DTOs for the todo service.
//!
//! # Design
//! These types mirror the service's wire schema but are defined
//! independently of the mock-server crate; the integration tests catch any
//! drift between the two. Todo ids are server-assigned integers and are
//! never minted locally.

use serde::{Deserialize, Serialize};

/// A single todo record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Request payload for both `POST /register` and `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Success payload of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// An authenticated principal: the bearer token and the name the
/// presentation layer shows for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub display_name: String,
}

impl Session {
    /// True iff the token is present and non-empty.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
