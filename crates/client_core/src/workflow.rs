//! Sequences the screens. Each transition hands over an identifier only; the
//! receiving screen gets a fresh controller that resolves it on entry.
//!
//! A transition installs the new screen in `Loading` and returns at once. The
//! fetch runs on its own task and is reported through [`PendingLoad`], so the
//! host can render the loading state and navigate away while it is pending.

use std::sync::Arc;

use shared::domain::{ClauseId, DocumentId};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    controller::{
        clause::ClauseController,
        results::ResultsController,
        retrieval::LoadOutcome,
        upload::{SubmitOutcome, UploadController},
    },
    generation::RequestTicket,
    navigation::{NavigationError, NavigationEvent, Navigator, Route},
    services::AnalysisServices,
};

pub enum Screen {
    Selection(Arc<UploadController>),
    Results(Arc<ResultsController>),
    ClauseDetail(Arc<ClauseController>),
}

impl Screen {
    async fn leave(&self) {
        match self {
            Screen::Selection(_) => {}
            Screen::Results(controller) => controller.leave().await,
            Screen::ClauseDetail(controller) => controller.leave().await,
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("the clause has not loaded, so its document is unknown")]
    ClauseNotLoaded,
}

enum Fetch {
    Results(Arc<ResultsController>, RequestTicket<DocumentId>),
    Clause(Arc<ClauseController>, RequestTicket<ClauseId>),
}

/// The fetch of a screen that has already been entered. It runs whether or
/// not this handle is awaited; dropping the handle only loses the outcome.
#[derive(Debug)]
#[must_use = "await `settled` to learn how the screen's load ended"]
pub struct PendingLoad {
    handle: JoinHandle<LoadOutcome>,
}

impl PendingLoad {
    fn spawn(fetch: Fetch) -> Self {
        let handle = tokio::spawn(async move {
            match fetch {
                Fetch::Results(controller, ticket) => controller.complete(ticket).await,
                Fetch::Clause(controller, ticket) => controller.complete(ticket).await,
            }
        });
        Self { handle }
    }

    /// `Discarded` when the screen was left before the response arrived.
    pub async fn settled(self) -> LoadOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("workflow: screen load task ended abnormally: {err}");
                LoadOutcome::Discarded
            }
        }
    }
}

#[derive(Debug)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    /// Load of the results screen entered after a successful submission.
    pub load: Option<PendingLoad>,
}

pub struct Workflow {
    services: AnalysisServices,
    navigator: Navigator,
    screen: Screen,
}

impl Workflow {
    pub fn new(services: AnalysisServices) -> Self {
        let screen = Screen::Selection(Arc::new(UploadController::new(Arc::clone(
            &services.submitter,
        ))));
        Self {
            services,
            navigator: Navigator::new(),
            screen,
        }
    }

    /// Enters `route` directly, with no history behind it.
    pub async fn open(services: AnalysisServices, route: Route) -> (Self, Option<PendingLoad>) {
        let (screen, fetch) = prepare(&services, &route).await;
        let workflow = Self {
            services,
            navigator: Navigator::at(route),
            screen,
        };
        (workflow, fetch.map(PendingLoad::spawn))
    }

    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn upload(&self) -> Option<Arc<UploadController>> {
        match &self.screen {
            Screen::Selection(controller) => Some(Arc::clone(controller)),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<Arc<ResultsController>> {
        match &self.screen {
            Screen::Results(controller) => Some(Arc::clone(controller)),
            _ => None,
        }
    }

    pub fn clause(&self) -> Option<Arc<ClauseController>> {
        match &self.screen {
            Screen::ClauseDetail(controller) => Some(Arc::clone(controller)),
            _ => None,
        }
    }

    /// Submits the selected file and, once the submission has resolved with a
    /// document id, moves to that document's results.
    pub async fn submit(&mut self) -> Result<Submission, WorkflowError> {
        let Some(upload) = self.upload() else {
            return Err(NavigationError::NotAvailable {
                event: "submit",
                from: self.route().clone(),
            }
            .into());
        };
        let outcome = upload.submit().await;
        let load = match &outcome {
            SubmitOutcome::Submitted(document_id) => {
                self.transition(NavigationEvent::Submitted(document_id.clone()))
                    .await?
            }
            _ => None,
        };
        Ok(Submission { outcome, load })
    }

    pub async fn select_clause(
        &mut self,
        clause_id: ClauseId,
    ) -> Result<Option<PendingLoad>, WorkflowError> {
        self.transition(NavigationEvent::ClauseSelected(clause_id))
            .await
    }

    /// Back from clause detail to the results of the clause's own document.
    pub async fn back_to_results(&mut self) -> Result<Option<PendingLoad>, WorkflowError> {
        let Some(clause) = self.clause() else {
            return Err(NavigationError::NotAvailable {
                event: "back_to_results",
                from: self.route().clone(),
            }
            .into());
        };
        let document_id = clause
            .document_id()
            .await
            .ok_or(WorkflowError::ClauseNotLoaded)?;
        self.transition(NavigationEvent::BackToResults(document_id))
            .await
    }

    /// The "Go Back" recovery action.
    pub async fn go_back(&mut self) -> Result<Option<PendingLoad>, WorkflowError> {
        self.transition(NavigationEvent::GoBack).await
    }

    pub async fn navigate(&mut self, route: Route) -> Result<Option<PendingLoad>, WorkflowError> {
        self.transition(NavigationEvent::Open(route)).await
    }

    async fn transition(
        &mut self,
        event: NavigationEvent,
    ) -> Result<Option<PendingLoad>, WorkflowError> {
        let mut navigator = self.navigator.clone();
        let to = navigator.apply(event)?.clone();
        let (screen, fetch) = prepare(&self.services, &to).await;

        // Route and screen change together, with no await in between.
        info!(from = %self.route(), to = %to, "workflow: navigating");
        self.navigator = navigator;
        let previous = std::mem::replace(&mut self.screen, screen);

        let load = fetch.map(PendingLoad::spawn);
        previous.leave().await;
        Ok(load)
    }
}

/// Builds the controller for `route`, already loading its identifier.
async fn prepare(services: &AnalysisServices, route: &Route) -> (Screen, Option<Fetch>) {
    match route {
        Route::Selection => (
            Screen::Selection(Arc::new(UploadController::new(Arc::clone(
                &services.submitter,
            )))),
            None,
        ),
        Route::Results(document_id) => {
            let controller = Arc::new(ResultsController::new(Arc::clone(&services.results)));
            let fetch = controller
                .begin(document_id.clone())
                .await
                .map(|ticket| Fetch::Results(Arc::clone(&controller), ticket));
            (Screen::Results(controller), fetch)
        }
        Route::ClauseDetail(clause_id) => {
            let controller = Arc::new(ClauseController::new(Arc::clone(&services.clauses)));
            let fetch = controller
                .begin(clause_id.clone())
                .await
                .map(|ticket| Fetch::Clause(Arc::clone(&controller), ticket));
            (Screen::ClauseDetail(controller), fetch)
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
