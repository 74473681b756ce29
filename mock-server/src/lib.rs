use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// In-memory state: registered users, live tokens, and an insertion-ordered
/// todo list with auto-increment ids.
#[derive(Default)]
pub struct AppState {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    todos: Vec<Todo>,
    next_id: u64,
}

pub type Db = Arc<RwLock<AppState>>;

type Rejection = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(AppState::default()));
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reject(status: StatusCode, message: &str) -> Rejection {
    (status, Json(json!({ "error": message })))
}

/// Resolve the bearer token in the authorization header to a username.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, Rejection> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Authorization required"))?;
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<StatusCode, Rejection> {
    if input.username.chars().count() < 2 {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Username must be at least 2 characters",
        ));
    }
    if input.password.chars().count() < 6 {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters",
        ));
    }
    let mut state = db.write().await;
    if state.users.contains_key(&input.username) {
        return Err(reject(StatusCode::CONFLICT, "Username already taken"));
    }
    state.users.insert(input.username, input.password);
    Ok(StatusCode::CREATED)
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<Value>, Rejection> {
    let mut state = db.write().await;
    if state.users.get(&input.username) != Some(&input.password) {
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
        ));
    }
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), input.username.clone());
    Ok(Json(json!({ "token": token, "username": input.username })))
}

async fn list_todos(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Todo>>, Rejection> {
    let state = db.read().await;
    authorize(&state, &headers)?;
    Ok(Json(state.todos.clone()))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), Rejection> {
    let mut state = db.write().await;
    authorize(&state, &headers)?;
    state.next_id += 1;
    let todo = Todo {
        id: state.next_id,
        title: input.title,
        completed: false,
    };
    state.todos.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, Rejection> {
    let mut state = db.write().await;
    authorize(&state, &headers)?;
    let todo = state
        .todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    let mut state = db.write().await;
    authorize(&state, &headers)?;
    let before = state.todos.len();
    state.todos.retain(|t| t.id != id);
    if state.todos.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, "Todo not found"));
    }
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}
