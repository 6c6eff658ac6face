//! Shared `loading → ready | failed` state machine behind the results and
//! clause detail screens.

use std::fmt::Display;

use shared::error::AnalysisResult;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    controller::errors::{UiError, UiErrorContext},
    generation::{RequestGenerations, RequestTicket},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalState<K, V> {
    Idle,
    Loading { key: K },
    Ready { key: K, value: V },
    Failed { key: K, error: UiError },
}

impl<K, V> RetrievalState<K, V> {
    pub fn key(&self) -> Option<&K> {
        match self {
            RetrievalState::Idle => None,
            RetrievalState::Loading { key }
            | RetrievalState::Ready { key, .. }
            | RetrievalState::Failed { key, .. } => Some(key),
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            RetrievalState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&UiError> {
        match self {
            RetrievalState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RetrievalState::Loading { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied to the screen state.
    Applied,
    /// Nothing was requested; the state already covers this identifier.
    Unchanged,
    /// The response arrived after the screen moved on and was dropped.
    Discarded,
}

struct Inner<K, V> {
    state: RetrievalState<K, V>,
    generations: RequestGenerations<K>,
}

pub(crate) struct Retrieval<K, V> {
    context: UiErrorContext,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> Retrieval<K, V>
where
    K: Clone + PartialEq + Display + Send,
    V: Clone + Send,
{
    pub(crate) fn new(context: UiErrorContext) -> Self {
        Self {
            context,
            inner: Mutex::new(Inner {
                state: RetrievalState::Idle,
                generations: RequestGenerations::default(),
            }),
        }
    }

    /// Marks the state as loading `key` and issues a ticket for the request,
    /// unless the state already holds `key` and `force` is off.
    pub(crate) async fn begin(&self, key: K, force: bool) -> Option<RequestTicket<K>> {
        let mut guard = self.inner.lock().await;
        let same_key = guard.state.key() == Some(&key);
        if same_key && (guard.state.is_loading() || !force) {
            return None;
        }
        guard.state = RetrievalState::Loading { key: key.clone() };
        debug!(context = ?self.context, key = %key, "retrieval: request issued");
        Some(guard.generations.begin(key))
    }

    /// Applies `outcome` if `ticket` is still current.
    pub(crate) async fn finish(
        &self,
        ticket: RequestTicket<K>,
        outcome: AnalysisResult<V>,
    ) -> LoadOutcome {
        let mut guard = self.inner.lock().await;
        let key = ticket.key().clone();
        if !guard.generations.complete(&ticket) {
            info!(
                context = ?self.context,
                key = %key,
                generation = ticket.generation(),
                "retrieval: discarding stale response"
            );
            return LoadOutcome::Discarded;
        }
        guard.state = match outcome {
            Ok(value) => RetrievalState::Ready { key, value },
            Err(err) => {
                warn!(context = ?self.context, key = %key, "retrieval: failed: {err}");
                RetrievalState::Failed {
                    error: UiError::from_error(self.context, &err),
                    key,
                }
            }
        };
        LoadOutcome::Applied
    }

    /// Key to reload on an explicit retry; none while a request is pending.
    pub(crate) async fn retry_key(&self) -> Option<K> {
        let guard = self.inner.lock().await;
        match &guard.state {
            RetrievalState::Ready { key, .. } | RetrievalState::Failed { key, .. } => {
                Some(key.clone())
            }
            RetrievalState::Idle | RetrievalState::Loading { .. } => None,
        }
    }

    /// Drops any pending response; the screen is no longer shown.
    pub(crate) async fn leave(&self) {
        let mut guard = self.inner.lock().await;
        guard.generations.invalidate();
        if guard.state.is_loading() {
            guard.state = RetrievalState::Idle;
        }
    }

    pub(crate) async fn state(&self) -> RetrievalState<K, V> {
        self.inner.lock().await.state.clone()
    }
}

#[cfg(test)]
#[path = "../tests/retrieval_tests.rs"]
mod tests;
