//! Client-side workflow for contract analysis: document submission, result
//! retrieval, and clause detail screens, wired to either the remote analysis
//! engine or the local demo cache.

pub mod api;
pub mod config;
pub mod controller;
pub mod demo;
pub mod generation;
pub mod navigation;
pub mod risk;
pub mod services;
pub mod source;
pub mod telemetry;
pub mod view;
pub mod workflow;

pub use api::AnalysisClient;
pub use config::{load_settings, Deployment, Settings};
pub use controller::{
    clause::{ClauseController, ClauseState},
    errors::{RecoveryAction, UiError, UiErrorContext},
    results::{ResultsController, ResultsState},
    retrieval::{LoadOutcome, RetrievalState},
    upload::{SubmitOutcome, UploadController, UploadState},
};
pub use navigation::{NavigationError, NavigationEvent, Navigator, Route};
pub use risk::{classify, classify_raw, RiskCategory, RiskPresentation};
pub use services::AnalysisServices;
pub use source::{ClauseSource, DocumentSubmitter, ResultSource};
pub use view::{ClauseRow, ClauseView, ResultsView};
pub use workflow::{PendingLoad, Screen, Submission, Workflow, WorkflowError};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
