//! Render-ready screen models. They carry text and link targets only; layout
//! and styling belong to the host.

use shared::domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId};

use crate::{
    navigation::Route,
    risk::{classify, RiskPresentation},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseRow {
    pub clause_id: ClauseId,
    pub clause_type: String,
    pub risk: RiskPresentation,
    pub link: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub document_id: DocumentId,
    pub summary: String,
    pub clauses: Vec<ClauseRow>,
}

impl From<&DocumentAnalysisResult> for ResultsView {
    fn from(result: &DocumentAnalysisResult) -> Self {
        Self {
            document_id: result.document_id.clone(),
            summary: result.summary.clone(),
            clauses: result
                .clauses
                .iter()
                .map(|clause| ClauseRow {
                    clause_id: clause.clause_id.clone(),
                    clause_type: clause.clause_type.clone(),
                    risk: classify(clause.risk_level),
                    link: Route::ClauseDetail(clause.clause_id.clone()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseView {
    pub clause_id: ClauseId,
    pub title: String,
    pub risk: RiskPresentation,
    pub text: String,
    pub explanation: String,
    pub back: Route,
}

impl ClauseView {
    pub const TEXT_HEADING: &'static str = "Extracted Clause Text";
    pub const EXPLANATION_HEADING: &'static str = "Explanation (Plain English)";
    pub const BACK_LABEL: &'static str = "Back to Results";
}

impl From<&Clause> for ClauseView {
    fn from(clause: &Clause) -> Self {
        Self {
            clause_id: clause.clause_id.clone(),
            title: clause.clause_type.clone(),
            risk: classify(clause.risk_level),
            text: clause.text.clone(),
            explanation: clause.explanation.clone(),
            back: Route::Results(clause.document_id.clone()),
        }
    }
}
