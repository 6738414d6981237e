//! Remote store adapter tests
//!
//! A scripted `RestBackend` records every request and replays queued responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;
use vitrine_client::{ClientError, RestBackend};
use vitrine_content::{
    BlogKind, ContentKind, ContentService, ContentStore, FaqKind, ListQuery, RawInput,
    RemoteStore, StatusFilter, StoreError,
};

#[derive(Debug, Clone, PartialEq)]
struct Request {
    method: &'static str,
    path: String,
    body: Option<Value>,
}

#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Value, ClientError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn respond(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    fn fail(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Err(ClientError::Api {
            status,
            body: body.to_string(),
        }));
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        self.requests.lock().unwrap().push(Request {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl RestBackend for ScriptedBackend {
    async fn select(&self, path: &str) -> Result<Value, ClientError> {
        self.answer("GET", path, None)
    }

    async fn insert(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.answer("POST", path, Some(body))
    }

    async fn update(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.answer("PATCH", path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.answer("DELETE", path, None)
    }
}

fn input(value: Value) -> RawInput {
    value.as_object().cloned().unwrap()
}

fn blog_row(id: i64, title: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "service_id": null,
        "title": title,
        "slug": slug,
        "excerpt": "Body",
        "content": "<p>Body</p>",
        "cover_image_url": null,
        "status": "draft",
        "published_at": null,
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-01T00:00:00+00:00"
    })
}

const MISSING_BLOGS: &str =
    r#"{"code":"PGRST205","message":"Could not find the table 'public.service_blogs' in the schema cache"}"#;

// ============== List Tests ==============

#[tokio::test]
async fn test_list_pushes_filters_down() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([blog_row(1, "Hello", "hello")]));
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let query = ListQuery::from_params(Some("all"), Some("3"), Some("Hello"), Some("5"));
    let entries = store.list(&query).await.unwrap();
    assert_eq!(entries.len(), 1);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].path,
        format!(
            "/service_blogs?select={}&limit=5&order={}&service_id=eq.3&slug=eq.hello",
            BlogKind::COLUMNS.replace(',', "%2C"),
            BlogKind::ORDER.replace(',', "%2C"),
        )
    );
}

#[tokio::test]
async fn test_list_normalizes_rows() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([
        { "id": 2, "service_id": "1", "question": " Q ", "answer": "A", "status": "LIVE", "display_order": "4" },
        { "question": "row without id" }
    ]));
    let store = RemoteStore::<FaqKind>::new(backend.clone());

    let entries = store
        .list(&ListQuery::default().with_status(StatusFilter::Live))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].question, "Q");
    assert_eq!(entries[0].display_order, 4);
    assert_eq!(entries[0].service_id, 1);
}

// ============== Write Tests ==============

#[tokio::test]
async fn test_insert_sends_row_without_id() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([blog_row(11, "Hello", "hello")]));
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let draft = BlogKind::parse_create(&input(json!({ "title": "Hello", "content": "<p>Body</p>" }))).unwrap();
    let created = store.insert(&draft).await.unwrap();
    assert_eq!(created.id, 11);

    let request = &backend.requests()[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/service_blogs");
    let body = request.body.as_ref().unwrap();
    assert!(body.get("id").is_none());
    assert_eq!(body["slug"], "hello");
    assert_eq!(body["status"], "draft");
    assert_eq!(body["excerpt"], "Body");
}

#[tokio::test]
async fn test_insert_without_representation_is_an_error() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([]));
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let draft = BlogKind::parse_create(&input(json!({ "title": "Hello", "content": "x" }))).unwrap();
    assert!(matches!(store.insert(&draft).await, Err(StoreError::Other(_))));
}

#[tokio::test]
async fn test_update_sends_only_changed_columns() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([blog_row(5, "Old Title", "old-title")]));
    backend.respond(json!([blog_row(5, "New Title", "new-title")]));
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let patch = BlogKind::parse_patch(&input(json!({ "title": "New Title" }))).unwrap();
    let updated = store.update(5, &patch).await.unwrap();
    assert_eq!(updated.slug, "new-title");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0].path.contains("id=eq.5"));
    assert_eq!(requests[1].method, "PATCH");
    assert_eq!(requests[1].path, "/service_blogs?id=eq.5");

    let body = requests[1].body.as_ref().unwrap().as_object().unwrap();
    let mut columns: Vec<&str> = body.keys().map(String::as_str).collect();
    columns.sort();
    assert_eq!(columns, vec!["slug", "title", "updated_at"]);
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([]));
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let patch = BlogKind::parse_patch(&input(json!({ "title": "x" }))).unwrap();
    assert!(matches!(store.update(5, &patch).await, Err(StoreError::NotFound)));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_delete_checks_existence_first() {
    let backend = ScriptedBackend::new();
    backend.respond(json!([{ "id": 3 }]));
    let store = RemoteStore::<FaqKind>::new(backend.clone());

    store.delete(3).await.unwrap();

    let requests = backend.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/service_faqs?id=eq.3&select=id&limit=1");
    assert_eq!(requests[1].method, "DELETE");
    assert_eq!(requests[1].path, "/service_faqs?id=eq.3");

    backend.respond(json!([]));
    assert!(matches!(store.delete(4).await, Err(StoreError::NotFound)));
    assert_eq!(backend.requests().len(), 3);
}

// ============== Classification Tests ==============

#[tokio::test]
async fn test_duplicate_key_is_classified() {
    let backend = ScriptedBackend::new();
    backend.fail(
        409,
        r#"{"code":"23505","message":"duplicate key value violates unique constraint \"service_blogs_slug_key\""}"#,
    );
    let store = RemoteStore::<BlogKind>::new(backend.clone());

    let draft = BlogKind::parse_create(&input(json!({ "title": "Dup", "content": "x" }))).unwrap();
    assert!(matches!(store.insert(&draft).await, Err(StoreError::DuplicateKey(_))));
}

#[tokio::test]
async fn test_service_falls_back_when_remote_table_is_missing() {
    let dir = TempDir::new().unwrap();
    let backend = ScriptedBackend::new();
    backend.fail(404, MISSING_BLOGS);
    backend.fail(404, MISSING_BLOGS);

    let blogs = ContentService::<BlogKind>::from_backend(backend.clone(), dir.path());
    let created = blogs
        .create(&input(json!({ "title": "Offline First", "content": "x" })))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert!(dir.path().join("service-blogs.json").exists());

    let listed = blogs
        .list(&ListQuery::default().with_status(StatusFilter::All))
        .await
        .unwrap();
    assert_eq!(listed, vec![created]);
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn test_service_surfaces_remote_conflict() {
    let dir = TempDir::new().unwrap();
    let backend = ScriptedBackend::new();
    backend.fail(409, r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#);

    let faqs = ContentService::<FaqKind>::from_backend(backend.clone(), dir.path());
    let err = faqs
        .create(&input(json!({ "service_id": 1, "question": "Q", "answer": "A" })))
        .await
        .unwrap_err();
    assert_eq!(err.status(), 409);
    assert!(!dir.path().join("service-faqs.json").exists());
}
