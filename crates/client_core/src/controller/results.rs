use std::sync::Arc;

use shared::domain::{DocumentAnalysisResult, DocumentId};

use crate::{
    controller::{
        errors::{UiError, UiErrorContext},
        retrieval::{LoadOutcome, Retrieval, RetrievalState},
    },
    generation::RequestTicket,
    source::ResultSource,
    view::ResultsView,
};

pub type ResultsState = RetrievalState<DocumentId, DocumentAnalysisResult>;

/// Results screen: resolves a `documentId` into its analysis result.
pub struct ResultsController {
    source: Arc<dyn ResultSource>,
    retrieval: Retrieval<DocumentId, DocumentAnalysisResult>,
}

impl ResultsController {
    pub fn new(source: Arc<dyn ResultSource>) -> Self {
        Self {
            source,
            retrieval: Retrieval::new(UiErrorContext::LoadResults),
        }
    }

    pub async fn load(&self, document_id: DocumentId) -> LoadOutcome {
        self.fetch(document_id, false).await
    }

    pub async fn retry(&self) -> LoadOutcome {
        match self.retrieval.retry_key().await {
            Some(document_id) => self.fetch(document_id, true).await,
            None => LoadOutcome::Unchanged,
        }
    }

    async fn fetch(&self, document_id: DocumentId, force: bool) -> LoadOutcome {
        match self.retrieval.begin(document_id, force).await {
            Some(ticket) => self.complete(ticket).await,
            None => LoadOutcome::Unchanged,
        }
    }

    /// Enters `Loading` for `document_id` without waiting on the source.
    pub(crate) async fn begin(
        &self,
        document_id: DocumentId,
    ) -> Option<RequestTicket<DocumentId>> {
        self.retrieval.begin(document_id, false).await
    }

    pub(crate) async fn complete(&self, ticket: RequestTicket<DocumentId>) -> LoadOutcome {
        let outcome = self.source.fetch_result(ticket.key()).await;
        self.retrieval.finish(ticket, outcome).await
    }

    pub async fn leave(&self) {
        self.retrieval.leave().await;
    }

    pub async fn state(&self) -> ResultsState {
        self.retrieval.state().await
    }

    pub async fn result(&self) -> Option<DocumentAnalysisResult> {
        self.state().await.value().cloned()
    }

    pub async fn error(&self) -> Option<UiError> {
        self.state().await.error().cloned()
    }

    pub async fn view(&self) -> Option<ResultsView> {
        self.state().await.value().map(ResultsView::from)
    }
}
