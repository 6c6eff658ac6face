use std::{path::Path, sync::Arc};

use shared::{
    domain::{DocumentId, SelectedFile},
    error::AnalysisError,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    controller::errors::{UiError, UiErrorContext},
    source::DocumentSubmitter,
};

pub const NOT_A_PDF_MESSAGE: &str = "Please upload a PDF file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// No file selected.
    Idle,
    /// A valid PDF is selected and can be submitted.
    Ready,
    Submitting,
    Submitted(DocumentId),
    /// The last submission failed; the file is still selected.
    Failed(UiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(DocumentId),
    Failed(UiError),
    /// No file selected, or a submission is already in flight.
    Ignored,
}

struct UploadInner {
    file: Option<Arc<SelectedFile>>,
    state: UploadState,
    selection_error: Option<UiError>,
}

/// Selection screen: owns one file selection and its submission.
pub struct UploadController {
    submitter: Arc<dyn DocumentSubmitter>,
    inner: Mutex<UploadInner>,
}

impl UploadController {
    pub fn new(submitter: Arc<dyn DocumentSubmitter>) -> Self {
        Self {
            submitter,
            inner: Mutex::new(UploadInner {
                file: None,
                state: UploadState::Idle,
                selection_error: None,
            }),
        }
    }

    /// Accepts `file` if its declared media type is PDF. A rejected file
    /// leaves any earlier valid selection in place.
    pub async fn select(&self, file: SelectedFile) -> Result<(), UiError> {
        let mut guard = self.inner.lock().await;
        if guard.state == UploadState::Submitting {
            return Err(selection_error(AnalysisError::validation(
                "A submission is already in progress",
            )));
        }
        if !file.is_pdf() {
            warn!(
                file_name = %file.file_name,
                media_type = %file.media_type,
                "upload: rejected non-pdf selection"
            );
            let error = selection_error(AnalysisError::validation(NOT_A_PDF_MESSAGE));
            guard.selection_error = Some(error.clone());
            return Err(error);
        }

        info!(file_name = %file.file_name, size_bytes = file.bytes.len(), "upload: file selected");
        guard.file = Some(Arc::new(file));
        guard.state = UploadState::Ready;
        guard.selection_error = None;
        Ok(())
    }

    /// Reads `path` and declares its media type from the file extension.
    pub async fn select_path(&self, path: &Path) -> Result<(), UiError> {
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Type check first so a rejected file is never read.
        if media_type != shared::domain::PDF_MEDIA_TYPE {
            return self
                .select(SelectedFile::new(file_name, media_type, Vec::new()))
                .await;
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let error = selection_error(AnalysisError::validation(format!(
                    "Could not read {file_name}: {err}"
                )));
                self.inner.lock().await.selection_error = Some(error.clone());
                return Err(error);
            }
        };
        self.select(SelectedFile::new(file_name, media_type, bytes))
            .await
    }

    /// Sends the selected file. A no-op without a selection or while another
    /// submission is in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let file = {
            let mut guard = self.inner.lock().await;
            let file = match (&guard.state, guard.file.as_ref()) {
                (UploadState::Ready | UploadState::Failed(_), Some(file)) => Arc::clone(file),
                _ => return SubmitOutcome::Ignored,
            };
            guard.state = UploadState::Submitting;
            guard.selection_error = None;
            file
        };

        info!(file_name = %file.file_name, "upload: submission started");
        let outcome = self.submitter.submit_document(&file).await;

        let mut guard = self.inner.lock().await;
        match outcome {
            Ok(document_id) => {
                info!(document_id = %document_id, "upload: submission accepted");
                guard.state = UploadState::Submitted(document_id.clone());
                SubmitOutcome::Submitted(document_id)
            }
            Err(err) => {
                warn!(file_name = %file.file_name, "upload: submission failed: {err}");
                let error = UiError::from_error(UiErrorContext::Submit, &err);
                guard.state = UploadState::Failed(error.clone());
                SubmitOutcome::Failed(error)
            }
        }
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.lock().await;
        if guard.state == UploadState::Submitting {
            return;
        }
        guard.file = None;
        guard.state = UploadState::Idle;
        guard.selection_error = None;
    }

    pub async fn state(&self) -> UploadState {
        self.inner.lock().await.state.clone()
    }

    pub async fn selected_file_name(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .file
            .as_ref()
            .map(|file| file.file_name.clone())
    }

    /// The message the selection screen should show, if any.
    pub async fn error(&self) -> Option<UiError> {
        let guard = self.inner.lock().await;
        if let Some(error) = &guard.selection_error {
            return Some(error.clone());
        }
        match &guard.state {
            UploadState::Failed(error) => Some(error.clone()),
            _ => None,
        }
    }

    pub async fn can_submit(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.file.is_some() && matches!(guard.state, UploadState::Ready | UploadState::Failed(_))
    }
}

fn selection_error(error: AnalysisError) -> UiError {
    UiError::from_error(UiErrorContext::SelectFile, &error)
}

#[cfg(test)]
#[path = "../tests/upload_tests.rs"]
mod tests;
