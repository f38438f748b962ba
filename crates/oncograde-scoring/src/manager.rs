//! Context-specific evidence scoring.
//!
//! Filters the evidence list down to the records whose category matches the
//! requested actionability context, weights each through the strategy chain,
//! and normalises against the theoretical maximum (regulatory-level weight
//! for every matched item).

use serde::{Deserialize, Serialize};
use tracing::debug;

use oncograde_common::engine_config::ScoringConfig;
use oncograde_common::evidence::{ActionabilityContext, EvidenceLevel, EvidenceRecord};

use crate::strategy::StrategyChain;

/// Normalised score for one actionability context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextScore {
    pub context: ActionabilityContext,
    /// Weighted evidence score in [0, 1].
    pub score: f64,
    /// Strongest evidence level among matched records.
    pub strongest: EvidenceLevel,
    /// Number of records that matched the context.
    pub matched: usize,
    /// Mean effective confidence of matched records.
    pub confidence: f64,
    pub regulatory_approved: bool,
    pub guideline_included: bool,
    pub cancer_type_specific: bool,
    /// Refuting evidence outweighs supporting evidence.
    pub benign_dominant: bool,
}

impl ContextScore {
    /// Score for a context with no matching evidence. Not an error: the
    /// strongest level defaults to the weakest category.
    pub fn empty(context: ActionabilityContext) -> Self {
        Self {
            context,
            score: 0.0,
            strongest: EvidenceLevel::weakest(),
            matched: 0,
            confidence: 0.0,
            regulatory_approved: false,
            guideline_included: false,
            cancer_type_specific: false,
            benign_dominant: false,
        }
    }
}

/// Evidence scoring strategy manager.
pub struct EvidenceScorer {
    config: ScoringConfig,
    chain: StrategyChain,
}

impl EvidenceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config, chain: StrategyChain::new() }
    }

    /// Score the evidence list for one context.
    pub fn score(
        &self,
        evidence: &[EvidenceRecord],
        context: ActionabilityContext,
        cancer_type: Option<&str>,
    ) -> ContextScore {
        let matched: Vec<&EvidenceRecord> =
            evidence.iter().filter(|e| e.matches_context(context)).collect();

        if matched.is_empty() {
            return ContextScore::empty(context);
        }

        let mut weighted_sum = 0.0;
        let mut confidence_sum = 0.0;
        let mut strongest = EvidenceLevel::weakest();
        let mut supporting_magnitude = 0.0;
        let mut refuting_magnitude = 0.0;
        let mut regulatory_approved = false;
        let mut guideline_included = false;
        let mut cancer_type_specific = false;

        for record in &matched {
            let strategy = self.chain.select(record);
            let level = strategy.strength(record);
            let confidence = record.effective_confidence(&self.config.source_defaults);

            let mut weight = strategy.base_weight(record, &self.config)
                * strategy.context_modifier(context, &self.config)
                * confidence
                * self.config.source_multiplier(&record.source);

            if record.is_cancer_type_specific(cancer_type) {
                weight += self.config.cancer_type_bonus;
                cancer_type_specific = true;
            }
            if context == ActionabilityContext::Therapeutic && record.is_off_label() {
                weight -= self.config.off_label_penalty;
            }
            let weight = weight.max(0.0);

            debug!(
                code = %record.code,
                level = ?level,
                weight,
                "scored evidence record"
            );

            weighted_sum += weight;
            confidence_sum += confidence;
            if level.at_least(strongest) {
                strongest = level;
            }
            if record.numeric_score >= 0.0 {
                supporting_magnitude += record.numeric_score;
            } else {
                refuting_magnitude += record.numeric_score.abs();
            }
            regulatory_approved |= level == EvidenceLevel::Regulatory;
            guideline_included |= level == EvidenceLevel::ProfessionalGuideline;
        }

        // Theoretical maximum: every matched item at the regulatory weight.
        let max_possible = self.config.weights.fda * matched.len() as f64;
        let score = (weighted_sum / max_possible).clamp(0.0, 1.0);

        ContextScore {
            context,
            score,
            strongest,
            matched: matched.len(),
            confidence: (confidence_sum / matched.len() as f64).clamp(0.0, 1.0),
            regulatory_approved,
            guideline_included,
            cancer_type_specific,
            benign_dominant: refuting_magnitude > supporting_magnitude,
        }
    }

    /// Score all three contexts at once.
    pub fn score_all_contexts(
        &self,
        evidence: &[EvidenceRecord],
        cancer_type: Option<&str>,
    ) -> Vec<ContextScore> {
        ActionabilityContext::ALL
            .iter()
            .map(|&context| self.score(evidence, context, cancer_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograde_test_utils::evidence;
    use oncograde_common::evidence::GuidelineTag;

    fn scorer() -> EvidenceScorer {
        EvidenceScorer::new(ScoringConfig::default())
    }

    #[test]
    fn test_no_matching_evidence_is_zero_not_error() {
        let records = vec![evidence("EV-1", GuidelineTag::Fda, "functional").build()];
        let result = scorer().score(&records, ActionabilityContext::Prognostic, None);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.matched, 0);
        assert_eq!(result.strongest, EvidenceLevel::Preclinical);
    }

    #[test]
    fn test_single_regulatory_item_scores_full() {
        let records = vec![
            evidence("EV-1", GuidelineTag::Fda, "approved therapy")
                .confidence(1.0)
                .build(),
        ];
        let result = scorer().score(&records, ActionabilityContext::Therapeutic, None);
        assert!((result.score - 1.0).abs() < 1e-9);
        assert_eq!(result.strongest, EvidenceLevel::Regulatory);
        assert!(result.regulatory_approved);
    }

    #[test]
    fn test_score_bounded_with_mixed_evidence() {
        let records = vec![
            evidence("EV-1", GuidelineTag::Fda, "drug response").confidence(1.0).build(),
            evidence("EV-2", GuidelineTag::Preclinical, "drug assay").confidence(0.4).build(),
            evidence("EV-3", GuidelineTag::CaseReport, "treatment report").confidence(0.6).build(),
        ];
        let result = scorer().score(&records, ActionabilityContext::Therapeutic, None);
        assert!(result.score > 0.0 && result.score <= 1.0);
        assert_eq!(result.matched, 3);
        assert_eq!(result.strongest, EvidenceLevel::Regulatory);
    }

    #[test]
    fn test_cancer_type_bonus_applies() {
        let base = vec![
            evidence("EV-1", GuidelineTag::ExpertConsensus, "therapy")
                .confidence(1.0)
                .build(),
        ];
        let boosted = vec![
            evidence("EV-1", GuidelineTag::ExpertConsensus, "therapy")
                .confidence(1.0)
                .meta("disease", "melanoma")
                .build(),
        ];
        let s = scorer();
        let plain = s.score(&base, ActionabilityContext::Therapeutic, Some("melanoma"));
        let specific = s.score(&boosted, ActionabilityContext::Therapeutic, Some("melanoma"));
        assert!(specific.score > plain.score);
        assert!(specific.cancer_type_specific);
    }

    #[test]
    fn test_off_label_penalty_only_in_therapeutic() {
        let records = vec![
            evidence("EV-1", GuidelineTag::ExpertConsensus, "therapy response and outcome")
                .confidence(1.0)
                .meta("off_label", "true")
                .build(),
        ];
        let s = scorer();
        let therapeutic = s.score(&records, ActionabilityContext::Therapeutic, None);
        let prognostic = s.score(&records, ActionabilityContext::Prognostic, None);
        assert!(therapeutic.score < prognostic.score);
    }

    #[test]
    fn test_source_multiplier_downweights() {
        let mut config = ScoringConfig::default();
        config.source_multipliers.insert("civic".to_string(), 0.5);
        let down = EvidenceScorer::new(config);

        let records = vec![
            evidence("EV-1", GuidelineTag::ProfessionalGuideline, "treatment")
                .confidence(1.0)
                .build(),
        ];
        let plain = scorer().score(&records, ActionabilityContext::Therapeutic, None);
        let halved = down.score(&records, ActionabilityContext::Therapeutic, None);
        assert!((halved.score - plain.score / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_benign_dominance() {
        let records = vec![
            evidence("EV-1", GuidelineTag::ClinicalStudy, "drug resistance")
                .numeric_score(-6.0)
                .build(),
            evidence("EV-2", GuidelineTag::CaseReport, "drug response")
                .numeric_score(2.0)
                .build(),
        ];
        let result = scorer().score(&records, ActionabilityContext::Therapeutic, None);
        assert!(result.benign_dominant);
    }

    #[test]
    fn test_determinism() {
        let records = vec![
            evidence("EV-1", GuidelineTag::ClinicalStudy, "randomized trial of therapy")
                .confidence(0.8)
                .build(),
            evidence("EV-2", GuidelineTag::CaseReport, "treatment case").confidence(0.6).build(),
        ];
        let s = scorer();
        let a = s.score(&records, ActionabilityContext::Therapeutic, None);
        let b = s.score(&records, ActionabilityContext::Therapeutic, None);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.strongest, b.strongest);
    }
}
