//! oncograde-tiering — Multi-context clinical actionability tiering.
//!
//! Maps each context's evidence score onto one of seven ordered tier levels
//! and picks the most clinically significant as the primary tier.

use tracing::debug;

use oncograde_common::classification::{ContextTierAssignment, Tier};
use oncograde_common::engine_config::TierThresholds;
use oncograde_common::evidence::EvidenceLevel;
use oncograde_scoring::ContextScore;

/// Multi-context tiering engine.
pub struct TieringEngine {
    thresholds: TierThresholds,
}

impl TieringEngine {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// Assign a tier for one context. A context with zero matching evidence
    /// produces no assignment.
    pub fn assign(&self, score: &ContextScore) -> Option<ContextTierAssignment> {
        if score.matched == 0 {
            return None;
        }

        let tier = self.map_tier(score);
        debug!(context = ?score.context, ?tier, score = score.score, "assigned tier");

        Some(ContextTierAssignment {
            context: score.context,
            tier,
            strongest_evidence: score.strongest,
            score: score.score,
            confidence: score.confidence,
            regulatory_approved: score.regulatory_approved,
            guideline_included: score.guideline_included,
            cancer_type_specific: score.cancer_type_specific,
        })
    }

    /// Assign tiers for a batch of context scores, skipping empty contexts.
    pub fn assign_all(&self, scores: &[ContextScore]) -> Vec<ContextTierAssignment> {
        scores.iter().filter_map(|s| self.assign(s)).collect()
    }

    // Boundary scores map into the tier whose lower bound they equal.
    fn map_tier(&self, score: &ContextScore) -> Tier {
        if score.benign_dominant {
            return Tier::IV;
        }
        if score.score >= self.thresholds.tier_ia
            && score.strongest == EvidenceLevel::Regulatory
        {
            return Tier::IA;
        }
        if score.score >= self.thresholds.tier_ib
            && score.strongest.at_least(EvidenceLevel::ExpertConsensus)
        {
            return Tier::IB;
        }
        if score.score >= self.thresholds.tier_iic {
            return Tier::IIC;
        }
        if score.score >= self.thresholds.tier_iid {
            return Tier::IID;
        }
        if score.score > 0.0 {
            return Tier::IIE;
        }
        Tier::III
    }
}

/// Most clinically significant tier across the produced assignments; Tier IV
/// when no context produced one.
pub fn primary_tier(assignments: &[ContextTierAssignment]) -> Tier {
    assignments.iter().map(|a| a.tier).min().unwrap_or(Tier::IV)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograde_common::evidence::ActionabilityContext;

    fn score_with(score: f64, strongest: EvidenceLevel) -> ContextScore {
        ContextScore {
            context: ActionabilityContext::Therapeutic,
            score,
            strongest,
            matched: 2,
            confidence: 0.8,
            regulatory_approved: strongest == EvidenceLevel::Regulatory,
            guideline_included: false,
            cancer_type_specific: false,
            benign_dominant: false,
        }
    }

    fn engine() -> TieringEngine {
        TieringEngine::new(TierThresholds::default())
    }

    #[test]
    fn test_empty_context_produces_no_assignment() {
        let empty = ContextScore::empty(ActionabilityContext::Diagnostic);
        assert!(engine().assign(&empty).is_none());
    }

    #[test]
    fn test_tier_ia_requires_regulatory_strength() {
        let regulatory = score_with(0.95, EvidenceLevel::Regulatory);
        assert_eq!(engine().assign(&regulatory).unwrap().tier, Tier::IA);

        // Same score without regulatory backing drops to IB.
        let guideline = score_with(0.95, EvidenceLevel::ProfessionalGuideline);
        assert_eq!(engine().assign(&guideline).unwrap().tier, Tier::IB);
    }

    #[test]
    fn test_tier_ib_requires_consensus_or_better() {
        let consensus = score_with(0.85, EvidenceLevel::ExpertConsensus);
        assert_eq!(engine().assign(&consensus).unwrap().tier, Tier::IB);

        let case_report = score_with(0.85, EvidenceLevel::CaseReport);
        assert_eq!(engine().assign(&case_report).unwrap().tier, Tier::IIC);
    }

    #[test]
    fn test_threshold_exactness() {
        // A score exactly at a boundary maps into the tier it opens.
        assert_eq!(
            engine().assign(&score_with(0.9, EvidenceLevel::Regulatory)).unwrap().tier,
            Tier::IA
        );
        assert_eq!(
            engine().assign(&score_with(0.8, EvidenceLevel::ExpertConsensus)).unwrap().tier,
            Tier::IB
        );
        assert_eq!(
            engine().assign(&score_with(0.6, EvidenceLevel::CaseReport)).unwrap().tier,
            Tier::IIC
        );
        assert_eq!(
            engine().assign(&score_with(0.4, EvidenceLevel::CaseReport)).unwrap().tier,
            Tier::IID
        );
        assert_eq!(
            engine().assign(&score_with(0.39999, EvidenceLevel::CaseReport)).unwrap().tier,
            Tier::IIE
        );
    }

    #[test]
    fn test_zero_score_without_benign_signal_is_tier_iii() {
        let mut score = score_with(0.0, EvidenceLevel::Preclinical);
        score.matched = 1;
        assert_eq!(engine().assign(&score).unwrap().tier, Tier::III);
    }

    #[test]
    fn test_dominant_benign_evidence_is_tier_iv() {
        let mut score = score_with(0.7, EvidenceLevel::ExpertConsensus);
        score.benign_dominant = true;
        assert_eq!(engine().assign(&score).unwrap().tier, Tier::IV);
    }

    #[test]
    fn test_primary_tier_picks_most_significant() {
        let e = engine();
        let assignments = e.assign_all(&[
            score_with(0.65, EvidenceLevel::CaseReport),
            score_with(0.95, EvidenceLevel::Regulatory),
            ContextScore::empty(ActionabilityContext::Prognostic),
        ]);
        assert_eq!(assignments.len(), 2);
        assert_eq!(primary_tier(&assignments), Tier::IA);
    }

    #[test]
    fn test_primary_tier_defaults_to_iv() {
        assert_eq!(primary_tier(&[]), Tier::IV);
    }
}
