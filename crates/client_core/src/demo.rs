//! Offline deployment: fabricates an analysis for the submitted document and
//! stores it in the local result cache, where the results and clause screens
//! pick it up by identifier.

use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, RiskLevel, SelectedFile},
    error::{AnalysisError, AnalysisResult},
};
use storage::ResultCache;
use tracing::info;

use crate::source::DocumentSubmitter;

pub struct DemoAnalyzer {
    cache: ResultCache,
    delay: Duration,
    last_issued_ms: AtomicI64,
}

impl DemoAnalyzer {
    pub fn new(cache: ResultCache, delay: Duration) -> Self {
        Self {
            cache,
            delay,
            last_issued_ms: AtomicI64::new(0),
        }
    }

    /// `doc-<unix millis>`, bumped past the previous id so two submissions in
    /// the same millisecond still get distinct ids.
    fn next_document_id(&self) -> DocumentId {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_issued_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now - 1);
        DocumentId(format!("doc-{}", now.max(previous + 1)))
    }
}

#[async_trait]
impl DocumentSubmitter for DemoAnalyzer {
    async fn submit_document(&self, file: &SelectedFile) -> AnalysisResult<DocumentId> {
        tokio::time::sleep(self.delay).await;

        let document_id = self.next_document_id();
        let result = sample_analysis(&document_id);
        self.cache.store_result(&result).await.map_err(|e| {
            AnalysisError::transport(format!("failed to store demo analysis: {e:#}"))
        })?;
        info!(
            document_id = %document_id,
            file_name = %file.file_name,
            "demo: analysis fabricated and cached"
        );
        Ok(document_id)
    }
}

pub fn sample_analysis(document_id: &DocumentId) -> DocumentAnalysisResult {
    let clause = |n: u32, clause_type: &str, risk_level, text: &str, explanation: &str| Clause {
        clause_id: ClauseId(format!("clause-{n}-{document_id}")),
        clause_type: clause_type.to_string(),
        risk_level,
        text: text.to_string(),
        explanation: explanation.to_string(),
        document_id: document_id.clone(),
    };

    DocumentAnalysisResult {
        document_id: document_id.clone(),
        summary: "This contract outlines the terms and conditions between two parties. The \
                  agreement includes key provisions regarding payment terms, liability \
                  limitations, and dispute resolution. Important dates: effective date upon \
                  signing, renewal on annual basis. Overall risk assessment: MEDIUM due to \
                  broad indemnification clauses."
            .to_string(),
        clauses: vec![
            clause(
                1,
                "Payment Terms",
                RiskLevel::Low,
                "Payment shall be made within 30 days of invoice receipt. A 2% early payment \
                 discount is available if payment is received within 10 days.",
                "This clause outlines standard payment expectations. Net-30 terms are \
                 industry standard and favorable. The early payment discount incentivizes \
                 faster payment without penalty.",
            ),
            clause(
                2,
                "Limitation of Liability",
                RiskLevel::High,
                "Neither party shall be liable for indirect, incidental, special, or \
                 consequential damages arising from this agreement, except in cases of gross \
                 negligence or willful misconduct.",
                "This is a mutual liability cap. While it protects both parties, the \
                 exclusion is very broad and may limit recovery in significant disputes.",
            ),
            clause(
                3,
                "Confidentiality",
                RiskLevel::Medium,
                "All confidential information shared under this agreement shall be kept \
                 strictly confidential for a period of 3 years after contract termination.",
                "Standard confidentiality clause. 3 years post-termination is reasonable. \
                 Ensure your organization has processes to enforce this.",
            ),
        ],
    }
}
