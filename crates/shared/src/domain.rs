use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(DocumentId);
id_newtype!(ClauseId);

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Closed severity scale assigned to a clause by the analysis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AnalysisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(AnalysisError::ContractViolation(format!(
                "riskLevel '{other}' is not one of low, medium, high"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub clause_id: ClauseId,
    pub clause_type: String,
    pub risk_level: RiskLevel,
    pub text: String,
    pub explanation: String,
    pub document_id: DocumentId,
}

/// Summary plus clauses in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAnalysisResult {
    pub document_id: DocumentId,
    pub summary: String,
    pub clauses: Vec<Clause>,
}

impl DocumentAnalysisResult {
    pub fn clause(&self, clause_id: &ClauseId) -> Option<&Clause> {
        self.clauses
            .iter()
            .find(|clause| &clause.clause_id == clause_id)
    }
}

/// A file picked by the user, with the media type the picker declared for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type
            .split(';')
            .next()
            .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
            .unwrap_or(false)
    }
}
