//! Scoring strategies, selected per evidence record.
//!
//! The chain is a fixed ordered list evaluated top-to-bottom; the first
//! strategy whose `matches` returns true handles the record. The final
//! strategy is a catch-all, so selection is total: community-tagged and
//! otherwise unrecognized evidence lands on the preclinical strategy.

use oncograde_common::engine_config::{ContextModifiers, ScoringConfig};
use oncograde_common::evidence::{
    ActionabilityContext, EvidenceLevel, EvidenceRecord, GuidelineTag,
};

/// One scoring strategy in the chain.
pub trait ScoringStrategy: Send + Sync {
    /// Can this strategy handle the record?
    fn matches(&self, evidence: &EvidenceRecord) -> bool;

    /// Base weight before context/confidence modifiers.
    fn base_weight(&self, evidence: &EvidenceRecord, config: &ScoringConfig) -> f64;

    /// Evidence level this strategy assigns to the record.
    fn strength(&self, evidence: &EvidenceRecord) -> EvidenceLevel;

    /// Context relevance multiplier.
    fn context_modifier(&self, context: ActionabilityContext, config: &ScoringConfig) -> f64 {
        pick(context, &config.default_modifiers)
    }
}

fn pick(context: ActionabilityContext, modifiers: &ContextModifiers) -> f64 {
    match context {
        ActionabilityContext::Therapeutic => modifiers.therapeutic,
        ActionabilityContext::Diagnostic => modifiers.diagnostic,
        ActionabilityContext::Prognostic => modifiers.prognostic,
    }
}

// ── Chain members ────────────────────────────────────────────────────────────

/// FDA / regulatory approval.
struct RegulatoryStrategy;

impl ScoringStrategy for RegulatoryStrategy {
    fn matches(&self, evidence: &EvidenceRecord) -> bool {
        evidence.guideline_tag == GuidelineTag::Fda
    }

    fn base_weight(&self, _evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        config.weights.fda
    }

    fn strength(&self, _evidence: &EvidenceRecord) -> EvidenceLevel {
        EvidenceLevel::Regulatory
    }
}

/// Professional practice guideline (NCCN-style).
struct GuidelineStrategy;

impl ScoringStrategy for GuidelineStrategy {
    fn matches(&self, evidence: &EvidenceRecord) -> bool {
        evidence.guideline_tag == GuidelineTag::ProfessionalGuideline
    }

    fn base_weight(&self, _evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        config.weights.guideline
    }

    fn strength(&self, _evidence: &EvidenceRecord) -> EvidenceLevel {
        EvidenceLevel::ProfessionalGuideline
    }
}

/// Clinical study, graded by keyword into meta-analysis, well-powered trial,
/// or multiple small studies.
struct ClinicalStudyStrategy;

const META_ANALYSIS_KEYWORDS: [&str; 3] = ["meta-analysis", "meta analysis", "pooled analysis"];
const WELL_POWERED_KEYWORDS: [&str; 4] =
    ["randomized", "randomised", "phase iii", "phase 3"];

impl ClinicalStudyStrategy {
    fn study_text(evidence: &EvidenceRecord) -> String {
        let mut text = evidence.description.to_lowercase();
        if let Some(study_type) = evidence.meta("study_type") {
            text.push(' ');
            text.push_str(&study_type.to_lowercase());
        }
        text
    }

    fn grade(evidence: &EvidenceRecord) -> EvidenceLevel {
        let text = Self::study_text(evidence);
        if META_ANALYSIS_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            EvidenceLevel::MetaAnalysis
        } else if WELL_POWERED_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            EvidenceLevel::WellPoweredStudy
        } else {
            EvidenceLevel::MultipleSmallStudies
        }
    }
}

impl ScoringStrategy for ClinicalStudyStrategy {
    fn matches(&self, evidence: &EvidenceRecord) -> bool {
        evidence.guideline_tag == GuidelineTag::ClinicalStudy
    }

    fn base_weight(&self, evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        match Self::grade(evidence) {
            EvidenceLevel::MetaAnalysis => config.weights.meta_analysis,
            EvidenceLevel::WellPoweredStudy => config.weights.well_powered_study,
            _ => config.weights.multiple_small_studies,
        }
    }

    fn strength(&self, evidence: &EvidenceRecord) -> EvidenceLevel {
        Self::grade(evidence)
    }

    fn context_modifier(&self, context: ActionabilityContext, config: &ScoringConfig) -> f64 {
        pick(context, &config.clinical_study_modifiers)
    }
}

/// Expert panel consensus.
struct ExpertConsensusStrategy;

impl ScoringStrategy for ExpertConsensusStrategy {
    fn matches(&self, evidence: &EvidenceRecord) -> bool {
        evidence.guideline_tag == GuidelineTag::ExpertConsensus
    }

    fn base_weight(&self, _evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        config.weights.expert_consensus
    }

    fn strength(&self, _evidence: &EvidenceRecord) -> EvidenceLevel {
        EvidenceLevel::ExpertConsensus
    }
}

/// Case report or small single study.
struct CaseReportStrategy;

impl ScoringStrategy for CaseReportStrategy {
    fn matches(&self, evidence: &EvidenceRecord) -> bool {
        evidence.guideline_tag == GuidelineTag::CaseReport
    }

    fn base_weight(&self, _evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        config.weights.case_report
    }

    fn strength(&self, _evidence: &EvidenceRecord) -> EvidenceLevel {
        EvidenceLevel::CaseReport
    }
}

/// Preclinical / computational evidence and everything else that reaches the
/// bottom of the chain (community-tagged records included).
struct PreclinicalStrategy;

impl ScoringStrategy for PreclinicalStrategy {
    fn matches(&self, _evidence: &EvidenceRecord) -> bool {
        true
    }

    fn base_weight(&self, _evidence: &EvidenceRecord, config: &ScoringConfig) -> f64 {
        config.weights.preclinical
    }

    fn strength(&self, _evidence: &EvidenceRecord) -> EvidenceLevel {
        EvidenceLevel::Preclinical
    }
}

// ── Chain ────────────────────────────────────────────────────────────────────

/// Fixed-priority first-match chain over the strategies above.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ScoringStrategy>>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(RegulatoryStrategy),
                Box::new(GuidelineStrategy),
                Box::new(ClinicalStudyStrategy),
                Box::new(ExpertConsensusStrategy),
                Box::new(CaseReportStrategy),
                Box::new(PreclinicalStrategy),
            ],
        }
    }

    /// Select the strategy for a record. Total: the tail strategy matches
    /// everything.
    pub fn select(&self, evidence: &EvidenceRecord) -> &dyn ScoringStrategy {
        self.strategies
            .iter()
            .find(|s| s.matches(evidence))
            .map(|s| s.as_ref())
            .expect("strategy chain ends in a catch-all")
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(tag: GuidelineTag, description: &str) -> EvidenceRecord {
        EvidenceRecord {
            code: "EV".to_string(),
            numeric_score: 4.0,
            guideline_tag: tag,
            source: "civic".to_string(),
            description: description.to_string(),
            confidence: Some(1.0),
            evidence_category: "therapy".to_string(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_first_match_priority() {
        let chain = StrategyChain::new();
        let fda = record(GuidelineTag::Fda, "approved companion therapy");
        assert_eq!(chain.select(&fda).strength(&fda), EvidenceLevel::Regulatory);
    }

    #[test]
    fn test_clinical_study_keyword_grading() {
        let chain = StrategyChain::new();
        let config = ScoringConfig::default();

        let meta = record(GuidelineTag::ClinicalStudy, "Meta-analysis of 12 trials");
        assert_eq!(chain.select(&meta).strength(&meta), EvidenceLevel::MetaAnalysis);
        assert_eq!(chain.select(&meta).base_weight(&meta, &config), 0.9);

        let trial = record(GuidelineTag::ClinicalStudy, "Randomized phase III trial");
        assert_eq!(chain.select(&trial).strength(&trial), EvidenceLevel::WellPoweredStudy);

        let small = record(GuidelineTag::ClinicalStudy, "two retrospective cohorts");
        assert_eq!(chain.select(&small).strength(&small), EvidenceLevel::MultipleSmallStudies);
        assert_eq!(chain.select(&small).base_weight(&small, &config), 0.6);
    }

    #[test]
    fn test_community_falls_to_preclinical() {
        let chain = StrategyChain::new();
        let community = record(GuidelineTag::Community, "forum-curated entry");
        assert_eq!(chain.select(&community).strength(&community), EvidenceLevel::Preclinical);
        assert_eq!(
            chain.select(&community).base_weight(&community, &ScoringConfig::default()),
            0.3
        );
    }

    #[test]
    fn test_clinical_context_modifier() {
        let chain = StrategyChain::new();
        let config = ScoringConfig::default();
        let study = record(GuidelineTag::ClinicalStudy, "cohort study");
        let strategy = chain.select(&study);
        assert_eq!(strategy.context_modifier(ActionabilityContext::Therapeutic, &config), 1.0);
        assert_eq!(strategy.context_modifier(ActionabilityContext::Diagnostic, &config), 0.8);
    }
}
