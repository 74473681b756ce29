//! Stateless HTTP request builder and response parser for the todo service.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! transport executes the round trip in between. Requests to the todo routes
//! carry the session token as a bearer credential; register and login do
//! not.
//!
//! Status handling accepts any 2xx as success: the service answers 201 for
//! creation and 200-with-body for deletion, while the rest of the routes use
//! plain 200.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Credentials, LoginResponse, Todo, UpdateTodo};

/// Stateless request builder / response parser for the todo service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(credentials)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/register", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(credentials)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/login", self.base_url),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_list_todos(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn build_create_todo(
        &self,
        token: &str,
        input: &CreateTodo,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut headers = json_headers();
        headers.push(bearer(token));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers,
            body: Some(body),
        })
    }

    pub fn build_update_todo(
        &self,
        token: &str,
        id: u64,
        input: &UpdateTodo,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut headers = json_headers();
        headers.push(bearer(token));
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{id}", self.base_url),
            headers,
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, token: &str, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_success(&response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The deletion body (a message object) is ignored; the status decides.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_success(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

/// Any 2xx is success; everything else carries its status and body.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8080/api")
    }

    fn ok_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_login_produces_correct_request() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "secret1".to_string(),
        };
        let req = client().build_login(&credentials).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/login");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["password"], "secret1");
    }

    #[test]
    fn build_register_targets_register_route() {
        let credentials = Credentials {
            username: "bob".to_string(),
            password: "hunter22".to_string(),
        };
        let req = client().build_register(&credentials).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/register");
    }

    #[test]
    fn build_list_todos_carries_bearer_token() {
        let req = client().build_list_todos("t1");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/todos");
        assert_eq!(
            req.headers,
            vec![("authorization".to_string(), "Bearer t1".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
        };
        let req = client().build_create_todo("t1", &input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/todos");
        assert!(req
            .headers
            .contains(&("authorization".to_string(), "Bearer t1".to_string())));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
    }

    #[test]
    fn build_update_todo_serializes_only_present_fields() {
        let input = UpdateTodo {
            title: None,
            completed: Some(true),
        };
        let req = client().build_update_todo("t1", 7, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8080/api/todos/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["completed"], true);
        assert!(body.get("title").is_none());
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo("t1", 3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8080/api/todos/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_login_success() {
        let login = client()
            .parse_login(ok_response(r#"{"token":"t1","username":"alice"}"#))
            .unwrap();
        assert_eq!(login.token, "t1");
        assert_eq!(login.username, "alice");
    }

    #[test]
    fn parse_login_rejected() {
        let response = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: r#"{"error":"Invalid username or password"}"#.to_string(),
        };
        let err = client().parse_login(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
        assert_eq!(
            err.server_message().as_deref(),
            Some("Invalid username or password")
        );
    }

    #[test]
    fn parse_list_todos_success() {
        let body = r#"[{"id":1,"title":"Test","completed":false}]"#;
        let todos = client().parse_list_todos(ok_response(body)).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_create_todo_accepts_201() {
        let response = HttpResponse {
            status: 201,
            headers: Vec::new(),
            body: r#"{"id":1,"title":"New","completed":false}"#.to_string(),
        };
        let todo = client().parse_create_todo(response).unwrap();
        assert_eq!(todo.title, "New");
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_delete_todo_ignores_message_body() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"message":"Todo deleted successfully"}"#.to_string(),
        };
        assert!(client().parse_delete_todo(response).is_ok());
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(ok_response("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8080/api/");
        let req = client.build_list_todos("t1");
        assert_eq!(req.path, "http://localhost:8080/api/todos");
    }
}
