//! Screen routing over opaque identifiers. Routes never carry records, so any
//! screen can be entered from a saved link without prior state.

use std::fmt;

use shared::domain::{ClauseId, DocumentId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Selection,
    Results(DocumentId),
    ClauseDetail(ClauseId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("unrecognized route '{0}'")]
    UnknownRoute(String),
    #[error("invalid identifier in route '{0}'")]
    InvalidIdentifier(String),
    #[error("{event} is not available from {from}")]
    NotAvailable { event: &'static str, from: Route },
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, NavigationError> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Ok(Route::Selection),
            ["results", id] => Ok(Route::Results(DocumentId(validate_segment(path, id)?))),
            ["clause", id] => Ok(Route::ClauseDetail(ClauseId(validate_segment(path, id)?))),
            _ => Err(NavigationError::UnknownRoute(path.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Selection => "/".to_string(),
            Route::Results(document_id) => format!("/results/{document_id}"),
            Route::ClauseDetail(clause_id) => format!("/clause/{clause_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<String, NavigationError> {
    if segment.trim().is_empty() {
        return Err(NavigationError::InvalidIdentifier(path.to_string()));
    }
    Ok(segment.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// A submission resolved with this document.
    Submitted(DocumentId),
    ClauseSelected(ClauseId),
    /// Back from a clause to its owning document's results.
    BackToResults(DocumentId),
    /// Recovery action: return to the previous screen.
    GoBack,
    /// Direct entry, e.g. from a saved link.
    Open(Route),
}

impl NavigationEvent {
    fn name(&self) -> &'static str {
        match self {
            NavigationEvent::Submitted(_) => "submitted",
            NavigationEvent::ClauseSelected(_) => "clause_selected",
            NavigationEvent::BackToResults(_) => "back_to_results",
            NavigationEvent::GoBack => "go_back",
            NavigationEvent::Open(_) => "open",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::at(Route::Selection)
    }

    pub fn at(route: Route) -> Self {
        Self {
            current: route,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn apply(&mut self, event: NavigationEvent) -> Result<&Route, NavigationError> {
        if event == NavigationEvent::GoBack {
            self.current = self.history.pop().unwrap_or(Route::Selection);
            return Ok(&self.current);
        }

        let next = match (&self.current, event) {
            (Route::Selection, NavigationEvent::Submitted(document_id)) => {
                Route::Results(document_id)
            }
            (Route::Results(_), NavigationEvent::ClauseSelected(clause_id)) => {
                Route::ClauseDetail(clause_id)
            }
            (Route::ClauseDetail(_), NavigationEvent::BackToResults(document_id)) => {
                Route::Results(document_id)
            }
            (_, NavigationEvent::Open(route)) => route,
            (from, event) => {
                return Err(NavigationError::NotAvailable {
                    event: event.name(),
                    from: from.clone(),
                })
            }
        };

        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        Ok(&self.current)
    }
}
