//! In-process stand-in for the backend REST API.
//!
//! Binds an axum router on an ephemeral localhost port, records every
//! request it sees (JSON bodies and multipart parts decoded) and answers
//! with responses scripted per `(method, path)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use alumni_client::{ClientConfig, ConnectApi};

#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub json: Option<Value>,
    pub fields: HashMap<String, String>,
    pub files: Vec<RecordedFile>,
}

type Script = HashMap<(Method, String), (StatusCode, Value)>;

#[derive(Clone, Default)]
struct MockState {
    script: Arc<Mutex<Script>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Script the reply for `method path` (path includes the `/api` prefix).
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .script
            .lock()
            .unwrap()
            .insert((method, path.to_string()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().unwrap()
    }

    pub fn api(&self) -> ConnectApi {
        ConnectApi::new(&ClientConfig::new(self.base_url.clone()))
    }
}

async fn handle(State(state): State<MockState>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().replace("%40", "@");
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: req.uri().query().map(str::to_string),
        content_type: content_type.clone(),
        ..Default::default()
    };

    let is_multipart = content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    if is_multipart {
        let mut multipart = Multipart::from_request(req, &state).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.unwrap().to_vec();
                    recorded.files.push(RecordedFile {
                        field: name,
                        file_name: Some(file_name),
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let text = field.text().await.unwrap();
                    recorded.fields.insert(name, text);
                }
            }
        }
    } else {
        let bytes = to_bytes(req.into_body(), usize::MAX).await.unwrap();
        if !bytes.is_empty() {
            recorded.json = serde_json::from_slice(&bytes).ok();
        }
    }

    state.requests.lock().unwrap().push(recorded);

    let reply = state.script.lock().unwrap().get(&(method, path)).cloned();
    match reply {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
