use std::sync::Arc;

use shared::domain::{Clause, ClauseId, DocumentId};

use crate::{
    controller::{
        errors::{UiError, UiErrorContext},
        retrieval::{LoadOutcome, Retrieval, RetrievalState},
    },
    generation::RequestTicket,
    source::ClauseSource,
    view::ClauseView,
};

pub type ClauseState = RetrievalState<ClauseId, Clause>;

/// Clause detail screen: resolves a single `clauseId` without touching the
/// parent result.
pub struct ClauseController {
    source: Arc<dyn ClauseSource>,
    retrieval: Retrieval<ClauseId, Clause>,
}

impl ClauseController {
    pub fn new(source: Arc<dyn ClauseSource>) -> Self {
        Self {
            source,
            retrieval: Retrieval::new(UiErrorContext::LoadClause),
        }
    }

    pub async fn load(&self, clause_id: ClauseId) -> LoadOutcome {
        self.fetch(clause_id, false).await
    }

    pub async fn retry(&self) -> LoadOutcome {
        match self.retrieval.retry_key().await {
            Some(clause_id) => self.fetch(clause_id, true).await,
            None => LoadOutcome::Unchanged,
        }
    }

    async fn fetch(&self, clause_id: ClauseId, force: bool) -> LoadOutcome {
        match self.retrieval.begin(clause_id, force).await {
            Some(ticket) => self.complete(ticket).await,
            None => LoadOutcome::Unchanged,
        }
    }

    /// Enters `Loading` for `clause_id` without waiting on the source.
    pub(crate) async fn begin(&self, clause_id: ClauseId) -> Option<RequestTicket<ClauseId>> {
        self.retrieval.begin(clause_id, false).await
    }

    pub(crate) async fn complete(&self, ticket: RequestTicket<ClauseId>) -> LoadOutcome {
        let outcome = self.source.fetch_clause(ticket.key()).await;
        self.retrieval.finish(ticket, outcome).await
    }

    pub async fn leave(&self) {
        self.retrieval.leave().await;
    }

    pub async fn state(&self) -> ClauseState {
        self.retrieval.state().await
    }

    pub async fn clause(&self) -> Option<Clause> {
        self.state().await.value().cloned()
    }

    /// Owning document of the loaded clause, for the link back to results.
    pub async fn document_id(&self) -> Option<DocumentId> {
        self.state()
            .await
            .value()
            .map(|clause| clause.document_id.clone())
    }

    pub async fn error(&self) -> Option<UiError> {
        self.state().await.error().cloned()
    }

    pub async fn view(&self) -> Option<ClauseView> {
        self.state().await.value().map(ClauseView::from)
    }
}
