//! JSON shapes exchanged with the analysis engine and the local result cache.
//!
//! Records are decoded loosely (risk levels as strings, optional back
//! references) and then validated into the domain types, so that a payload
//! breaking the engine's contract surfaces as
//! [`AnalysisError::ContractViolation`] instead of a generic decode failure.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Clause, ClauseId, DocumentAnalysisResult, DocumentId, RiskLevel},
    error::{AnalysisError, AnalysisResult},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl UploadResponse {
    pub fn into_document_id(self) -> AnalysisResult<DocumentId> {
        match self.document_id {
            Some(raw) if !raw.trim().is_empty() => Ok(DocumentId(raw)),
            Some(_) => Err(AnalysisError::contract(
                "upload response carried an empty documentId",
            )),
            None => Err(AnalysisError::contract(
                "upload response is missing documentId",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseRecord {
    pub clause_id: String,
    #[serde(rename = "type")]
    pub clause_type: String,
    pub risk_level: String,
    pub text: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl ClauseRecord {
    /// Validates the record. When `owner` is given, the clause must belong to
    /// it; a record without a back reference inherits the owner's id.
    pub fn into_clause(self, owner: Option<&DocumentId>) -> AnalysisResult<Clause> {
        if self.clause_id.trim().is_empty() {
            return Err(AnalysisError::contract("clause is missing clauseId"));
        }
        let risk_level: RiskLevel = self.risk_level.parse()?;
        let document_id = match (self.document_id, owner) {
            (Some(raw), _) if raw.trim().is_empty() => {
                return Err(AnalysisError::contract(format!(
                    "clause {} carries an empty documentId",
                    self.clause_id
                )));
            }
            (Some(raw), Some(owner)) if raw != owner.0 => {
                return Err(AnalysisError::contract(format!(
                    "clause {} belongs to document {raw}, expected {owner}",
                    self.clause_id
                )));
            }
            (Some(raw), _) => DocumentId(raw),
            (None, Some(owner)) => owner.clone(),
            (None, None) => {
                return Err(AnalysisError::contract(format!(
                    "clause {} is missing documentId",
                    self.clause_id
                )));
            }
        };

        Ok(Clause {
            clause_id: ClauseId(self.clause_id),
            clause_type: self.clause_type,
            risk_level,
            text: self.text,
            explanation: self.explanation,
            document_id,
        })
    }
}

impl From<&Clause> for ClauseRecord {
    fn from(clause: &Clause) -> Self {
        Self {
            clause_id: clause.clause_id.0.clone(),
            clause_type: clause.clause_type.clone(),
            risk_level: clause.risk_level.as_str().to_string(),
            text: clause.text.clone(),
            explanation: clause.explanation.clone(),
            document_id: Some(clause.document_id.0.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResultRecord {
    pub summary: String,
    pub clauses: Vec<ClauseRecord>,
}

impl AnalysisResultRecord {
    pub fn into_result(self, document_id: &DocumentId) -> AnalysisResult<DocumentAnalysisResult> {
        let mut seen = HashSet::with_capacity(self.clauses.len());
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for record in self.clauses {
            let clause = record.into_clause(Some(document_id))?;
            if !seen.insert(clause.clause_id.clone()) {
                return Err(AnalysisError::contract(format!(
                    "clauseId {} appears more than once in document {document_id}",
                    clause.clause_id
                )));
            }
            clauses.push(clause);
        }

        Ok(DocumentAnalysisResult {
            document_id: document_id.clone(),
            summary: self.summary,
            clauses,
        })
    }
}

impl From<&DocumentAnalysisResult> for AnalysisResultRecord {
    fn from(result: &DocumentAnalysisResult) -> Self {
        Self {
            summary: result.summary.clone(),
            clauses: result.clauses.iter().map(ClauseRecord::from).collect(),
        }
    }
}
