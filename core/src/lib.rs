//! Client-side session and list-synchronization engine for the todo service.
//!
//! # Overview
//! Two stateful components make up the engine. `SessionManager` owns the
//! authenticated session: login, registration, logout, and persistence of
//! the token and display name across restarts. `TodoSynchronizer` mirrors
//! the remote todo list locally and applies mutations only from confirmed
//! server responses. The presentation layer reads state from both, invokes
//! their operations, and renders the scoped error messages they record;
//! no error propagates past a component as an exception.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   a one-method `Transport` trait executes the round trip, so every state
//!   transition is testable with scripted responses.
//! - `ApiClient` is stateless: each operation is a `build_*`/`parse_*` pair
//!   with the I/O boundary in between.
//! - A failed mutation leaves the collection in its last-known-good state.
//! - The session persists through a small key-value store abstraction with
//!   explicit save and clear calls; nothing reads it implicitly.

pub mod api;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod sync;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use error::{ApiError, AuthError, SyncError, ValidationError, GENERIC_FAILURE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use session::SessionManager;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use sync::TodoSynchronizer;
pub use transport::UreqTransport;
pub use types::{CreateTodo, Credentials, LoginResponse, Session, Todo, UpdateTodo};
