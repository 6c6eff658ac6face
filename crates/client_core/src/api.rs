//! HTTP client for the external analysis engine.

use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, SelectedFile},
    error::{AnalysisError, AnalysisResult},
    protocol::{AnalysisResultRecord, ClauseRecord, UploadResponse},
};
use tracing::{info, warn};
use url::Url;

const SERVER_MESSAGE_LIMIT: usize = 200;

pub struct AnalysisClient {
    http: Client,
    base_url: Url,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid api base url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url '{base_url}' cannot carry a path"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `POST /upload` with the file as the `file` multipart field.
    pub async fn upload(&self, file: &SelectedFile) -> AnalysisResult<DocumentId> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| {
                AnalysisError::validation(format!(
                    "invalid media type '{}': {e}",
                    file.media_type
                ))
            })?;
        let url = self.endpoint(&["upload"]);
        info!(file_name = %file.file_name, size_bytes = file.bytes.len(), "api: uploading document");

        let response = self
            .http
            .post(url.clone())
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, None).await?;
        let body: UploadResponse = read_json(response, "upload response").await?;
        let document_id = body.into_document_id()?;
        info!(document_id = %document_id, "api: document accepted");
        Ok(document_id)
    }

    /// `GET /results/{documentId}`.
    pub async fn fetch_result(
        &self,
        document_id: &DocumentId,
    ) -> AnalysisResult<DocumentAnalysisResult> {
        let url = self.endpoint(&["results", document_id.as_str()]);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, Some(format!("document {document_id}"))).await?;
        let record: AnalysisResultRecord = read_json(response, "analysis result").await?;
        let result = record.into_result(document_id)?;
        info!(
            document_id = %document_id,
            clauses = result.clauses.len(),
            "api: analysis result fetched"
        );
        Ok(result)
    }

    /// `GET /clause/{clauseId}`.
    pub async fn fetch_clause(&self, clause_id: &ClauseId) -> AnalysisResult<Clause> {
        let url = self.endpoint(&["clause", clause_id.as_str()]);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let response = check_status(response, Some(format!("clause {clause_id}"))).await?;
        let record: ClauseRecord = read_json(response, "clause").await?;
        let clause = record.into_clause(None)?;
        if &clause.clause_id != clause_id {
            return Err(AnalysisError::contract(format!(
                "requested clause {clause_id} but received {}",
                clause.clause_id
            )));
        }
        Ok(clause)
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> AnalysisError {
    warn!(%url, "api: request failed before a response arrived: {err}");
    AnalysisError::transport(format!("request to {url} failed: {err}"))
}

/// Maps non-2xx responses. `not_found` names the subject when a 404 means the
/// identifier does not resolve; without it a 404 is an ordinary server error.
async fn check_status(response: Response, not_found: Option<String>) -> AnalysisResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(subject) = not_found {
            return Err(AnalysisError::not_found(subject));
        }
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        body.trim().chars().take(SERVER_MESSAGE_LIMIT).collect()
    };
    warn!(status = status.as_u16(), "api: analysis service rejected request");
    Err(AnalysisError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response, subject: &str) -> AnalysisResult<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| AnalysisError::transport(format!("failed to read {subject} body: {e}")))?;
    serde_json::from_slice(&body)
        .map_err(|e| AnalysisError::contract(format!("malformed {subject}: {e}")))
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
