//! Controller-boundary error modeling: every `AnalysisError` becomes a
//! `UiError` with user-facing wording and a recovery action.

use shared::error::{AnalysisError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    SelectFile,
    Submit,
    LoadResults,
    LoadClause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Pick a different file.
    Reselect,
    /// Submit the retained file again.
    Resubmit,
    /// Fetch the same identifier again.
    Retry,
    /// Return to the previous screen.
    GoBack,
}

impl RecoveryAction {
    pub fn label(self) -> &'static str {
        match self {
            RecoveryAction::Reselect => "Choose Another File",
            RecoveryAction::Resubmit => "Analyze Contract",
            RecoveryAction::Retry => "Try Again",
            RecoveryAction::GoBack => "Go Back",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    kind: ErrorKind,
    context: UiErrorContext,
    message: String,
    detail: String,
}

impl UiError {
    pub fn from_error(context: UiErrorContext, error: &AnalysisError) -> Self {
        let message = match (error, context) {
            (AnalysisError::Validation(message), _) => message.clone(),
            (AnalysisError::Transport(_), _) => {
                "Analysis service unreachable; check your connection and try again.".to_string()
            }
            (AnalysisError::Server { status, .. }, UiErrorContext::Submit) => {
                format!("Processing failed (server returned {status}).")
            }
            (AnalysisError::Server { status, .. }, _) => {
                format!("Failed to load analysis (server returned {status}).")
            }
            (AnalysisError::ContractViolation(_), _) => {
                "The analysis service returned an unexpected response.".to_string()
            }
            (AnalysisError::NotFound(_), UiErrorContext::LoadClause) => {
                "Clause not found".to_string()
            }
            (AnalysisError::NotFound(_), _) => "Analysis results not found".to_string(),
        };

        Self {
            kind: error.kind(),
            context,
            message,
            detail: error.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic text of the underlying error.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn recovery(&self) -> RecoveryAction {
        match (self.context, self.kind) {
            (UiErrorContext::SelectFile, _) => RecoveryAction::Reselect,
            (UiErrorContext::Submit, ErrorKind::Validation) => RecoveryAction::Reselect,
            (UiErrorContext::Submit, _) => RecoveryAction::Resubmit,
            (UiErrorContext::LoadResults, ErrorKind::NotFound) => RecoveryAction::GoBack,
            (UiErrorContext::LoadResults, _) => RecoveryAction::Retry,
            (UiErrorContext::LoadClause, _) => RecoveryAction::GoBack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_document_offers_go_back() {
        let err = UiError::from_error(
            UiErrorContext::LoadResults,
            &AnalysisError::not_found("document doc-x"),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.recovery(), RecoveryAction::GoBack);
        assert_eq!(err.recovery().label(), "Go Back");
    }

    #[test]
    fn contract_violation_keeps_cause_behind_generic_wording() {
        let err = UiError::from_error(
            UiErrorContext::LoadResults,
            &AnalysisError::contract("riskLevel 'severe' is not one of low, medium, high"),
        );
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
        assert!(!err.message().contains("severe"));
        assert!(err.detail().contains("severe"));
        assert_eq!(err.recovery(), RecoveryAction::Retry);
    }

    #[test]
    fn failed_submission_offers_resubmit() {
        let err = UiError::from_error(
            UiErrorContext::Submit,
            &AnalysisError::Server {
                status: 502,
                message: "bad gateway".into(),
            },
        );
        assert!(err.message().contains("502"));
        assert_eq!(err.recovery(), RecoveryAction::Resubmit);
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = UiError::from_error(
            UiErrorContext::SelectFile,
            &AnalysisError::validation("Please upload a PDF file"),
        );
        assert_eq!(err.message(), "Please upload a PDF file");
        assert_eq!(err.recovery(), RecoveryAction::Reselect);
    }
}
