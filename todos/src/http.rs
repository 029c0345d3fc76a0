//! HTTP transport for the remote todo service.

use crate::error::ServiceError;
use crate::service::TodoService;
use crate::types::{OwnerId, Todo, TodoDraft, TodoId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Todo service backed by a JSON REST API
///
/// | Operation | Request |
/// |-----------|---------|
/// | `fetch_all` | `GET {base}/todos?userId={owner}` |
/// | `create` | `POST {base}/todos` |
/// | `update` | `PATCH {base}/todos/{id}` |
/// | `delete` | `DELETE {base}/todos/{id}` |
#[derive(Clone, Debug)]
pub struct HttpTodoService {
    client: Client,
    base_url: String,
}

impl HttpTodoService {
    /// Create a service rooted at `base_url` (trailing slashes are ignored)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a service using a preconfigured client
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

/// Turn non-success statuses into [`ServiceError::Status`]
async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let bytes = check_status(response)
        .await?
        .bytes()
        .await
        .map_err(|e| ServiceError::Request(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
}

impl TodoService for HttpTodoService {
    fn fetch_all(
        &self,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<Vec<Todo>, ServiceError>> + Send {
        let request = self
            .client
            .get(self.todos_url())
            .query(&[("userId", owner_id.get())]);

        async move {
            tracing::debug!(owner_id = %owner_id, "GET todos");
            let response = request.send().await?;
            decode(response).await
        }
    }

    fn create(&self, draft: TodoDraft) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        let request = self.client.post(self.todos_url()).json(&draft);

        async move {
            tracing::debug!(title = %draft.title, "POST todo");
            let response = request.send().await?;
            decode(response).await
        }
    }

    fn update(&self, todo: Todo) -> impl Future<Output = Result<Todo, ServiceError>> + Send {
        let request = self.client.patch(self.todo_url(todo.id)).json(&todo);

        async move {
            tracing::debug!(id = %todo.id, "PATCH todo");
            let response = request.send().await?;
            decode(response).await
        }
    }

    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), ServiceError>> + Send {
        let request = self.client.delete(self.todo_url(id));

        async move {
            tracing::debug!(id = %id, "DELETE todo");
            let response = request.send().await?;
            check_status(response).await.map(|_| ())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Tests can unwrap
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: OwnerId = OwnerId::new(42);

    #[test]
    fn trailing_slash_is_trimmed() {
        let service = HttpTodoService::new("https://example.test/api/");
        assert_eq!(service.base_url(), "https://example.test/api");
        assert_eq!(service.todo_url(TodoId::new(5)), "https://example.test/api/todos/5");
    }

    #[tokio::test]
    async fn fetch_all_filters_by_owner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("userId", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "Milk", "completed": false, "userId": 42 },
                { "id": 2, "title": "Eggs", "completed": true, "userId": 42 }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        let todos = service.fetch_all(OWNER).await.unwrap();

        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].title, "Eggs");
        assert!(todos[1].completed);
    }

    #[tokio::test]
    async fn create_posts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({ "title": "Milk", "userId": 42, "completed": false })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(
                { "id": 17, "title": "Milk", "completed": false, "userId": 42 }
            )))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        let todo = service.create(TodoDraft::new("Milk", OWNER)).await.unwrap();

        assert_eq!(todo.id, TodoId::new(17));
    }

    #[tokio::test]
    async fn update_patches_full_record() {
        let server = MockServer::start().await;
        let record = json!({ "id": 3, "title": "Milk", "completed": true, "userId": 42 });
        Mock::given(method("PATCH"))
            .and(path("/todos/3"))
            .and(body_json(record.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(record))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        let todo = Todo {
            id: TodoId::new(3),
            title: "Milk".to_string(),
            completed: true,
            owner_id: OWNER,
        };

        assert_eq!(service.update(todo.clone()).await.unwrap(), todo);
    }

    #[tokio::test]
    async fn delete_accepts_any_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        service.delete(TodoId::new(8)).await.unwrap();
    }

    #[tokio::test]
    async fn error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/8"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        let error = service.delete(TodoId::new(8)).await.unwrap_err();

        assert_eq!(
            error,
            ServiceError::Status {
                status: 404,
                body: "Not found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let service = HttpTodoService::new(server.uri());
        let error = service.fetch_all(OWNER).await.unwrap_err();

        assert!(matches!(error, ServiceError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_request_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let service = HttpTodoService::new(uri);
        let error = service.fetch_all(OWNER).await.unwrap_err();

        assert!(matches!(error, ServiceError::Request(_)));
    }
}
