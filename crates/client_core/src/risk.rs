use shared::{domain::RiskLevel, error::AnalysisResult};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskCategory {
    Favorable,
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPresentation {
    pub level: RiskLevel,
    pub category: RiskCategory,
    pub label: &'static str,
}

pub fn classify(level: RiskLevel) -> RiskPresentation {
    let (category, label) = match level {
        RiskLevel::Low => (RiskCategory::Favorable, "Low Risk"),
        RiskLevel::Medium => (RiskCategory::Caution, "Medium Risk"),
        RiskLevel::High => (RiskCategory::Critical, "High Risk"),
    };
    RiskPresentation {
        level,
        category,
        label,
    }
}

/// For values that have not been through record validation. An unknown level
/// is reported, never styled with a fallback.
pub fn classify_raw(raw: &str) -> AnalysisResult<RiskPresentation> {
    raw.parse::<RiskLevel>().map(classify).inspect_err(|err| {
        warn!(risk_level = raw, "risk: unclassifiable risk level: {err}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    #[test]
    fn maps_each_level_to_its_category() {
        assert_eq!(classify(RiskLevel::Low).category, RiskCategory::Favorable);
        assert_eq!(classify(RiskLevel::Medium).category, RiskCategory::Caution);
        assert_eq!(classify(RiskLevel::High).category, RiskCategory::Critical);
        assert_eq!(classify(RiskLevel::High).label, "High Risk");
    }

    #[test]
    fn raw_values_outside_the_scale_are_flagged() {
        for raw in ["critical", "", "HIGH", "unknown"] {
            let err = classify_raw(raw).expect_err("must flag");
            assert_eq!(err.kind(), ErrorKind::ContractViolation, "value {raw:?}");
        }
        assert_eq!(
            classify_raw("medium").expect("known").label,
            "Medium Risk"
        );
    }
}
