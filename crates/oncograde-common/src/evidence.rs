//! Evidence records handed to the engine by the aggregation layer.
//!
//! Records are immutable once constructed. Several records may describe the
//! same underlying fact from different knowledge bases; all of them are kept
//! and scored. Deduplication is the aggregator's decision, not ours.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Guideline tag
// ---------------------------------------------------------------------------

/// Closed set of guideline tags recognized by the scoring chain.
///
/// Unrecognized tags are folded into `Community` (lowest priority) rather
/// than rejected, so a misbehaving upstream source degrades gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidelineTag {
    Fda,
    ProfessionalGuideline,
    ClinicalStudy,
    ExpertConsensus,
    CaseReport,
    Preclinical,
    Community,
}

impl GuidelineTag {
    /// Serialize to the canonical tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            GuidelineTag::Fda                   => "fda",
            GuidelineTag::ProfessionalGuideline => "professional_guideline",
            GuidelineTag::ClinicalStudy         => "clinical_study",
            GuidelineTag::ExpertConsensus       => "expert_consensus",
            GuidelineTag::CaseReport            => "case_report",
            GuidelineTag::Preclinical           => "preclinical",
            GuidelineTag::Community             => "community",
        }
    }

    /// Parse from an upstream tag string. Unknown tags down-grade to
    /// `Community` with a warning.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "fda" | "regulatory" | "fda_approved"      => GuidelineTag::Fda,
            "professional_guideline" | "guideline"     => GuidelineTag::ProfessionalGuideline,
            "clinical_study" | "clinical_trial"        => GuidelineTag::ClinicalStudy,
            "expert_consensus" | "consensus"           => GuidelineTag::ExpertConsensus,
            "case_report" | "case_study"               => GuidelineTag::CaseReport,
            "preclinical" | "computational"            => GuidelineTag::Preclinical,
            "community"                                => GuidelineTag::Community,
            other => {
                warn!(tag = other, "unrecognized guideline tag, treating as community evidence");
                GuidelineTag::Community
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evidence level
// ---------------------------------------------------------------------------

/// Strength category assigned by the scoring chain, strongest first.
///
/// The derived `Ord` follows declaration order, so `Regulatory` compares as
/// the smallest value. Use [`EvidenceLevel::at_least`] for "X-or-better"
/// checks instead of comparing raw variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    Regulatory,
    ProfessionalGuideline,
    MetaAnalysis,
    WellPoweredStudy,
    ExpertConsensus,
    MultipleSmallStudies,
    CaseReport,
    Preclinical,
}

impl EvidenceLevel {
    /// The weakest category; used when no evidence matched a context.
    pub fn weakest() -> Self {
        EvidenceLevel::Preclinical
    }

    /// Is this level at least as strong as `other`?
    pub fn at_least(&self, other: EvidenceLevel) -> bool {
        *self <= other
    }
}

// ---------------------------------------------------------------------------
// Actionability context
// ---------------------------------------------------------------------------

/// Clinical actionability context a tier assignment is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionabilityContext {
    Therapeutic,
    Diagnostic,
    Prognostic,
}

impl ActionabilityContext {
    pub const ALL: [ActionabilityContext; 3] = [
        ActionabilityContext::Therapeutic,
        ActionabilityContext::Diagnostic,
        ActionabilityContext::Prognostic,
    ];

    /// Keywords an `evidence_category` must contain for the record to count
    /// toward this context.
    pub fn category_keywords(&self) -> &'static [&'static str] {
        match self {
            ActionabilityContext::Therapeutic => {
                &["therapy", "therapeutic", "treatment", "drug", "response", "resistance"]
            }
            ActionabilityContext::Diagnostic => {
                &["diagnostic", "diagnosis", "classification", "subtype"]
            }
            ActionabilityContext::Prognostic => {
                &["prognosis", "prognostic", "outcome", "survival", "recurrence"]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evidence record
// ---------------------------------------------------------------------------

/// One scored, sourced fact about a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Short identifier from the originating knowledge base (e.g. "CIV-1042").
    pub code: String,
    /// Signed guideline-defined score; negative values refute.
    pub numeric_score: f64,
    pub guideline_tag: GuidelineTag,
    /// Knowledge-base name, lowercase (e.g. "oncokb", "civic").
    pub source: String,
    pub description: String,
    /// Per-record confidence in [0, 1]. Absent → per-source default.
    pub confidence: Option<f64>,
    /// Free-form classification used for context filtering
    /// (therapeutic / diagnostic / prognostic / functional / population).
    pub evidence_category: String,
    /// Criterion-specific fields: therapy name, disease, sample counts.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl EvidenceRecord {
    /// Confidence for scoring, falling back to the per-source default.
    pub fn effective_confidence(&self, defaults: &SourceDefaults) -> f64 {
        self.confidence
            .unwrap_or_else(|| defaults.confidence_for(&self.source))
            .clamp(0.0, 1.0)
    }

    /// Metadata lookup.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Does the free-form category match the requested context?
    pub fn matches_context(&self, context: ActionabilityContext) -> bool {
        let category = self.evidence_category.to_lowercase();
        context.category_keywords().iter().any(|kw| category.contains(kw))
    }

    /// Marked as specific to the queried cancer type?
    pub fn is_cancer_type_specific(&self, cancer_type: Option<&str>) -> bool {
        match (self.meta("disease"), cancer_type) {
            (Some(disease), Some(ct)) => disease.eq_ignore_ascii_case(ct),
            _ => self
                .meta("cancer_type_specific")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Off-label therapeutic use flag.
    pub fn is_off_label(&self) -> bool {
        self.meta("off_label")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or_else(|| self.description.to_lowercase().contains("off-label"))
    }
}

// ---------------------------------------------------------------------------
// Per-source confidence defaults
// ---------------------------------------------------------------------------

/// Default confidence per knowledge base, applied when a record carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDefaults {
    #[serde(default = "default_source_confidences")]
    pub confidences: BTreeMap<String, f64>,
    #[serde(default = "default_unknown_confidence")]
    pub unknown_source: f64,
}

fn default_unknown_confidence() -> f64 {
    0.5
}

fn default_source_confidences() -> BTreeMap<String, f64> {
    [
        ("oncokb", 0.90),
        ("civic", 0.85),
        ("clinvar", 0.85),
        ("cosmic", 0.80),
        ("cancerhotspots", 0.80),
        ("gnomad", 0.90),
        ("jax_ckb", 0.80),
        ("pmkb", 0.75),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl Default for SourceDefaults {
    fn default() -> Self {
        Self {
            confidences: default_source_confidences(),
            unknown_source: default_unknown_confidence(),
        }
    }
}

impl SourceDefaults {
    pub fn confidence_for(&self, source: &str) -> f64 {
        match self.confidences.get(&source.to_lowercase()) {
            Some(c) => *c,
            None => {
                warn!(source, "unknown evidence source, using default confidence");
                self.unknown_source
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str) -> EvidenceRecord {
        EvidenceRecord {
            code: "EV-1".to_string(),
            numeric_score: 5.0,
            guideline_tag: GuidelineTag::ClinicalStudy,
            source: "civic".to_string(),
            description: "Response to targeted therapy".to_string(),
            confidence: None,
            evidence_category: category.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_unknown_tag_becomes_community() {
        assert_eq!(GuidelineTag::parse("somebody_made_this_up"), GuidelineTag::Community);
        assert_eq!(GuidelineTag::parse("FDA"), GuidelineTag::Fda);
    }

    #[test]
    fn test_level_ordering() {
        assert!(EvidenceLevel::Regulatory.at_least(EvidenceLevel::ExpertConsensus));
        assert!(EvidenceLevel::ExpertConsensus.at_least(EvidenceLevel::ExpertConsensus));
        assert!(!EvidenceLevel::CaseReport.at_least(EvidenceLevel::ExpertConsensus));
    }

    #[test]
    fn test_context_matching() {
        assert!(record("predicts drug response").matches_context(ActionabilityContext::Therapeutic));
        assert!(record("diagnostic subtype marker").matches_context(ActionabilityContext::Diagnostic));
        assert!(!record("functional study").matches_context(ActionabilityContext::Prognostic));
    }

    #[test]
    fn test_source_default_confidence() {
        let defaults = SourceDefaults::default();
        let r = record("therapy");
        assert!((r.effective_confidence(&defaults) - 0.85).abs() < 1e-9);

        let mut unknown = record("therapy");
        unknown.source = "random_blog".to_string();
        assert!((unknown.effective_confidence(&defaults) - 0.5).abs() < 1e-9);
    }
}
