use super::*;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, RiskLevel},
    error::{AnalysisError, ErrorKind},
};
use tokio::sync::Notify;

use crate::{
    controller::{clause::ClauseController, errors::RecoveryAction, results::ResultsController},
    navigation::Route,
    risk::RiskCategory,
    source::{ClauseSource, ResultSource},
};

fn sample_result(document_id: &str) -> DocumentAnalysisResult {
    let document_id = DocumentId::from(document_id);
    let clause = |n: u32, risk_level| Clause {
        clause_id: ClauseId(format!("clause-{n}-{document_id}")),
        clause_type: format!("Type {n}"),
        risk_level,
        text: format!("Verbatim text {n}"),
        explanation: format!("Plain explanation {n}"),
        document_id: document_id.clone(),
    };
    DocumentAnalysisResult {
        document_id: document_id.clone(),
        summary: "Summary".to_string(),
        clauses: vec![clause(1, RiskLevel::High), clause(2, RiskLevel::Low)],
    }
}

struct FakeEngine {
    results: HashMap<DocumentId, AnalysisResult<DocumentAnalysisResult>>,
    result_calls: Mutex<Vec<DocumentId>>,
    clause_calls: Mutex<Vec<ClauseId>>,
    release: Option<Arc<Notify>>,
}

impl FakeEngine {
    fn with(results: Vec<(DocumentId, AnalysisResult<DocumentAnalysisResult>)>) -> Self {
        Self {
            results: results.into_iter().collect(),
            result_calls: Mutex::new(Vec::new()),
            clause_calls: Mutex::new(Vec::new()),
            release: None,
        }
    }

    fn gated(mut self, release: Arc<Notify>) -> Self {
        self.release = Some(release);
        self
    }

    async fn wait_for_release(&self) {
        if let Some(release) = &self.release {
            release.notified().await;
        }
    }
}

#[async_trait]
impl ResultSource for FakeEngine {
    async fn fetch_result(
        &self,
        document_id: &DocumentId,
    ) -> AnalysisResult<DocumentAnalysisResult> {
        self.result_calls.lock().await.push(document_id.clone());
        self.wait_for_release().await;
        self.results
            .get(document_id)
            .cloned()
            .unwrap_or_else(|| Err(AnalysisError::not_found(format!("document {document_id}"))))
    }
}

#[async_trait]
impl ClauseSource for FakeEngine {
    async fn fetch_clause(&self, clause_id: &ClauseId) -> AnalysisResult<Clause> {
        self.clause_calls.lock().await.push(clause_id.clone());
        self.wait_for_release().await;
        self.results
            .values()
            .filter_map(|result| result.as_ref().ok())
            .find_map(|result| result.clause(clause_id).cloned())
            .ok_or_else(|| AnalysisError::not_found(format!("clause {clause_id}")))
    }
}

#[tokio::test]
async fn results_load_and_render_in_order() {
    let engine = Arc::new(FakeEngine::with(vec![(
        DocumentId::from("doc-1"),
        Ok(sample_result("doc-1")),
    )]));
    let controller = ResultsController::new(engine.clone());

    assert_eq!(
        controller.load(DocumentId::from("doc-1")).await,
        LoadOutcome::Applied
    );
    let view = controller.view().await.expect("ready");
    assert_eq!(view.summary, "Summary");
    assert_eq!(view.clauses.len(), 2);
    assert_eq!(view.clauses[0].risk.category, RiskCategory::Critical);
    assert_eq!(
        view.clauses[0].link,
        Route::ClauseDetail(ClauseId::from("clause-1-doc-1"))
    );
    assert_eq!(
        engine.result_calls.lock().await.as_slice(),
        &[DocumentId::from("doc-1")]
    );
}

#[tokio::test]
async fn reloading_same_document_needs_explicit_retry() {
    let engine = Arc::new(FakeEngine::with(vec![(
        DocumentId::from("doc-1"),
        Ok(sample_result("doc-1")),
    )]));
    let controller = ResultsController::new(engine.clone());

    controller.load(DocumentId::from("doc-1")).await;
    let first = controller.result().await.expect("first");
    assert_eq!(
        controller.load(DocumentId::from("doc-1")).await,
        LoadOutcome::Unchanged
    );
    assert_eq!(engine.result_calls.lock().await.len(), 1);

    assert_eq!(controller.retry().await, LoadOutcome::Applied);
    let second = controller.result().await.expect("second");
    assert_eq!(first, second);
    assert_eq!(engine.result_calls.lock().await.len(), 2);
}

#[tokio::test]
async fn unknown_document_fails_with_go_back() {
    let controller = ResultsController::new(Arc::new(FakeEngine::with(Vec::new())));
    controller.load(DocumentId::from("doc-missing")).await;

    let error = controller.error().await.expect("failed");
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.recovery(), RecoveryAction::GoBack);
    assert!(controller.view().await.is_none());
}

#[tokio::test]
async fn contract_violation_is_reported_by_cause() {
    let engine = FakeEngine::with(vec![(
        DocumentId::from("doc-bad"),
        Err(AnalysisError::contract("riskLevel 'extreme' is not one of low, medium, high")),
    )]);
    let controller = ResultsController::new(Arc::new(engine));
    controller.load(DocumentId::from("doc-bad")).await;

    let error = controller.error().await.expect("failed");
    assert_eq!(error.kind(), ErrorKind::ContractViolation);
    assert_eq!(error.recovery(), RecoveryAction::Retry);
}

#[tokio::test]
async fn response_after_leaving_is_discarded() {
    let release = Arc::new(Notify::new());
    let engine = Arc::new(
        FakeEngine::with(vec![(DocumentId::from("doc-1"), Ok(sample_result("doc-1")))])
            .gated(release.clone()),
    );
    let controller = Arc::new(ResultsController::new(engine));

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.load(DocumentId::from("doc-1")).await }
    });
    while !controller.state().await.is_loading() {
        tokio::task::yield_now().await;
    }

    controller.leave().await;
    release.notify_one();

    assert_eq!(pending.await.expect("join"), LoadOutcome::Discarded);
    assert_eq!(controller.state().await, RetrievalState::Idle);
    assert!(controller.result().await.is_none());
}

#[tokio::test]
async fn retry_is_ignored_while_loading() {
    let release = Arc::new(Notify::new());
    let engine = Arc::new(
        FakeEngine::with(vec![(DocumentId::from("doc-1"), Ok(sample_result("doc-1")))])
            .gated(release.clone()),
    );
    let controller = Arc::new(ResultsController::new(engine.clone()));

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.load(DocumentId::from("doc-1")).await }
    });
    while !controller.state().await.is_loading() {
        tokio::task::yield_now().await;
    }

    assert_eq!(controller.retry().await, LoadOutcome::Unchanged);
    release.notify_one();
    assert_eq!(pending.await.expect("join"), LoadOutcome::Applied);
    assert_eq!(engine.result_calls.lock().await.len(), 1);
}

#[tokio::test]
async fn clause_detail_exposes_owning_document() {
    let engine = Arc::new(FakeEngine::with(vec![(
        DocumentId::from("doc-7"),
        Ok(sample_result("doc-7")),
    )]));
    let controller = ClauseController::new(engine.clone());

    controller.load(ClauseId::from("clause-1-doc-7")).await;
    assert_eq!(
        controller.document_id().await,
        Some(DocumentId::from("doc-7"))
    );

    let view = controller.view().await.expect("ready");
    assert_eq!(view.title, "Type 1");
    assert_eq!(view.risk.label, "High Risk");
    assert_eq!(view.text, "Verbatim text 1");
    assert_eq!(view.explanation, "Plain explanation 1");
    assert_eq!(view.back, Route::Results(DocumentId::from("doc-7")));
    assert!(engine.result_calls.lock().await.is_empty());
}

#[tokio::test]
async fn missing_clause_offers_go_back() {
    let controller = ClauseController::new(Arc::new(FakeEngine::with(Vec::new())));
    controller.load(ClauseId::from("clause-x")).await;

    let error = controller.error().await.expect("failed");
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.message(), "Clause not found");
    assert_eq!(error.recovery(), RecoveryAction::GoBack);
    assert!(controller.document_id().await.is_none());
}
