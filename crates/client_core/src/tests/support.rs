//! In-process stand-in for the analysis engine.

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
pub(crate) struct ReceivedUpload {
    pub field_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub(crate) struct EngineState {
    pub uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    pub result_requests: Arc<Mutex<Vec<String>>>,
    pub clause_requests: Arc<Mutex<Vec<String>>>,
    pub upload_reply: Arc<Mutex<(StatusCode, Value)>>,
    pub results: Arc<Mutex<HashMap<String, Value>>>,
    pub clauses: Arc<Mutex<HashMap<String, Value>>>,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            result_requests: Arc::new(Mutex::new(Vec::new())),
            clause_requests: Arc::new(Mutex::new(Vec::new())),
            upload_reply: Arc::new(Mutex::new((
                StatusCode::OK,
                json!({ "documentId": "doc-123" }),
            ))),
            results: Arc::new(Mutex::new(HashMap::new())),
            clauses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a sample analysis for `document_id` along with each of its
    /// clauses under `/clause/{clauseId}`.
    pub async fn with_sample_document(self, document_id: &str) -> Self {
        let result = sample_result_json(document_id);
        if let Some(clauses) = result["clauses"].as_array() {
            let mut by_id = self.clauses.lock().await;
            for clause in clauses {
                let mut clause = clause.clone();
                clause["documentId"] = json!(document_id);
                let clause_id = clause["clauseId"].as_str().unwrap_or_default().to_string();
                by_id.insert(clause_id, clause);
            }
        }
        self.results
            .lock()
            .await
            .insert(document_id.to_string(), result);
        self
    }

    pub async fn reply_to_upload(&self, status: StatusCode, body: Value) {
        *self.upload_reply.lock().await = (status, body);
    }
}

pub(crate) fn sample_result_json(document_id: &str) -> Value {
    json!({
        "summary": "Overall risk assessment: MEDIUM due to broad indemnification clauses.",
        "clauses": [
            {
                "clauseId": format!("clause-1-{document_id}"),
                "type": "Limitation of Liability",
                "riskLevel": "high",
                "text": "Neither party shall be liable for indirect, incidental, special, or consequential damages.",
                "explanation": "This is a mutual liability cap with a very broad exclusion."
            },
            {
                "clauseId": format!("clause-2-{document_id}"),
                "type": "Payment Terms",
                "riskLevel": "low",
                "text": "Payment shall be made within 30 days of invoice receipt.",
                "explanation": "Net-30 terms are industry standard."
            },
            {
                "clauseId": format!("clause-3-{document_id}"),
                "type": "Confidentiality",
                "riskLevel": "medium",
                "text": "Confidential information shall be kept confidential for 3 years.",
                "explanation": "3 years post-termination is reasonable."
            }
        ]
    })
}

async fn handle_upload(State(state): State<EngineState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.uploads.lock().await.push(ReceivedUpload {
            field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    let (status, body) = state.upload_reply.lock().await.clone();
    (status, Json(body)).into_response()
}

async fn handle_result(
    State(state): State<EngineState>,
    Path(document_id): Path<String>,
) -> Response {
    state
        .result_requests
        .lock()
        .await
        .push(document_id.clone());
    match state.results.lock().await.get(&document_id) {
        Some(result) => Json(result.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn handle_clause(State(state): State<EngineState>, Path(clause_id): Path<String>) -> Response {
    state.clause_requests.lock().await.push(clause_id.clone());
    match state.clauses.lock().await.get(&clause_id) {
        Some(clause) => Json(clause.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(crate) async fn spawn_engine(state: EngineState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/results/:document_id", get(handle_result))
        .route("/clause/:clause_id", get(handle_clause))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// A base url nothing listens on.
pub(crate) async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
