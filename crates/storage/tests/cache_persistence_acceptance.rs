use shared::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, RiskLevel},
    protocol::AnalysisResultRecord,
};
use storage::ResultCache;

#[tokio::test]
async fn result_survives_reopening_the_cache_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let database_url = format!(
        "sqlite://{}",
        temp_root
            .path()
            .join("cache.db")
            .to_string_lossy()
            .replace('\\', "/")
    );
    let document_id = DocumentId::from("doc-persist");
    let result = DocumentAnalysisResult {
        document_id: document_id.clone(),
        summary: "Persisted summary".to_string(),
        clauses: vec![Clause {
            clause_id: ClauseId::from("clause-1-doc-persist"),
            clause_type: "Payment Terms".to_string(),
            risk_level: RiskLevel::Low,
            text: "Payment shall be made within 30 days.".to_string(),
            explanation: "Net-30 is standard.".to_string(),
            document_id: document_id.clone(),
        }],
    };

    {
        let cache = ResultCache::new(&database_url).await.expect("open");
        cache.store_result(&result).await.expect("store");
        cache.pool().close().await;
    }

    let reopened = ResultCache::new(&database_url).await.expect("reopen");
    let cached = reopened
        .load_result(&document_id)
        .await
        .expect("load")
        .expect("present");
    let record: AnalysisResultRecord = serde_json::from_str(&cached.payload).expect("decode");
    let restored = record.into_result(&document_id).expect("valid");
    assert_eq!(restored, result);
}
