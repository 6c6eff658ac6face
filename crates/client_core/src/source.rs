//! Retrieval and submission seams. Each deployment wires exactly one
//! implementation of each trait; the controllers only see the traits.

use async_trait::async_trait;
use shared::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, SelectedFile},
    error::{AnalysisError, AnalysisResult},
    protocol::{AnalysisResultRecord, ClauseRecord},
};
use storage::ResultCache;
use tracing::{error, info};

use crate::api::AnalysisClient;

#[async_trait]
pub trait DocumentSubmitter: Send + Sync {
    async fn submit_document(&self, file: &SelectedFile) -> AnalysisResult<DocumentId>;
}

#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch_result(&self, document_id: &DocumentId)
        -> AnalysisResult<DocumentAnalysisResult>;
}

#[async_trait]
pub trait ClauseSource: Send + Sync {
    async fn fetch_clause(&self, clause_id: &ClauseId) -> AnalysisResult<Clause>;
}

#[async_trait]
impl DocumentSubmitter for AnalysisClient {
    async fn submit_document(&self, file: &SelectedFile) -> AnalysisResult<DocumentId> {
        self.upload(file).await
    }
}

#[async_trait]
impl ResultSource for AnalysisClient {
    async fn fetch_result(
        &self,
        document_id: &DocumentId,
    ) -> AnalysisResult<DocumentAnalysisResult> {
        AnalysisClient::fetch_result(self, document_id).await
    }
}

#[async_trait]
impl ClauseSource for AnalysisClient {
    async fn fetch_clause(&self, clause_id: &ClauseId) -> AnalysisResult<Clause> {
        AnalysisClient::fetch_clause(self, clause_id).await
    }
}

fn cache_unavailable(err: anyhow::Error) -> AnalysisError {
    error!("cache: local result cache failure: {err:#}");
    AnalysisError::transport(format!("local result cache unavailable: {err:#}"))
}

#[async_trait]
impl ResultSource for ResultCache {
    async fn fetch_result(
        &self,
        document_id: &DocumentId,
    ) -> AnalysisResult<DocumentAnalysisResult> {
        let Some(cached) = self
            .load_result(document_id)
            .await
            .map_err(cache_unavailable)?
        else {
            info!(document_id = %document_id, "cache: no stored result");
            return Err(AnalysisError::not_found(format!("document {document_id}")));
        };
        let record: AnalysisResultRecord = serde_json::from_str(&cached.payload)?;
        record.into_result(document_id)
    }
}

#[async_trait]
impl ClauseSource for ResultCache {
    async fn fetch_clause(&self, clause_id: &ClauseId) -> AnalysisResult<Clause> {
        let Some(cached) = self
            .load_clause(clause_id)
            .await
            .map_err(cache_unavailable)?
        else {
            info!(clause_id = %clause_id, "cache: no indexed clause");
            return Err(AnalysisError::not_found(format!("clause {clause_id}")));
        };
        let record: ClauseRecord = serde_json::from_str(&cached.payload)?;
        record.into_clause(Some(&cached.document_id))
    }
}
