//! The seventeen criterion evaluators.
//!
//! Every evaluator is a total, pure function: missing context fields make a
//! criterion evaluate to "not met", never fail. Hotspot recurrence is
//! claimed by at most one criterion per call: the strongest band whose
//! threshold the observations clear.

use oncograde_common::classification::{CriterionEvidence, CriterionId};
use oncograde_common::confidence::aggregate_confidence;
use oncograde_common::variant::{Consequence, PredictionCall};

use crate::evaluator::CriterionInput;

// Per-criterion base confidences. Citation-backed criteria replace these
// with a noisy-OR aggregate over the contributing sources.
const VERY_STRONG_CONFIDENCE: f64 = 0.95;
const STRONG_CONFIDENCE: f64 = 0.85;
const MODERATE_CONFIDENCE: f64 = 0.7;
const SUPPORTING_CONFIDENCE: f64 = 0.55;

// ── Oncogenic: very strong ───────────────────────────────────────────────────

/// OVS1 — null variant in a gene whose oncogenic mechanism is loss of
/// function.
pub fn ovs1(input: &CriterionInput<'_>) -> CriterionEvidence {
    let null_consequence = input.ctx.consequences.iter().find(|c| c.is_null());
    match null_consequence {
        Some(c) if input.role.acts_through_lof() => {
            CriterionEvidence::met(CriterionId::OVS1, VERY_STRONG_CONFIDENCE)
                .with_note(format!("{c:?} in loss-of-function-driven gene"))
        }
        _ => CriterionEvidence::not_met(CriterionId::OVS1),
    }
}

// ── Oncogenic: strong ────────────────────────────────────────────────────────

/// OS1 — same amino-acid change as an established oncogenic variant.
///
/// A literal amino-acid match always qualifies. When the cross-knowledge-base
/// policy is enabled, an "oncogenic" assertion from any integrated knowledge
/// base qualifies as well.
pub fn os1(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.same_aa_change_as_oncogenic {
        return CriterionEvidence::met(CriterionId::OS1, STRONG_CONFIDENCE)
            .with_note("amino-acid change matches established oncogenic variant");
    }

    if input.config.accept_kb_assertions {
        let assertions: Vec<_> = input
            .evidence
            .iter()
            .filter(|e| {
                e.meta("oncogenicity")
                    .map(|v| {
                        v.eq_ignore_ascii_case("oncogenic")
                            || v.eq_ignore_ascii_case("likely_oncogenic")
                    })
                    .unwrap_or(false)
            })
            .collect();
        if !assertions.is_empty() {
            let confidences: Vec<f64> = assertions
                .iter()
                .map(|e| e.effective_confidence(input.source_defaults))
                .collect();
            let citations = assertions.iter().map(|e| e.source.clone()).collect();
            return CriterionEvidence::met(
                CriterionId::OS1,
                aggregate_confidence(&confidences),
            )
            .with_citations(citations)
            .with_note("oncogenic assertion from integrated knowledge base");
        }
    }

    CriterionEvidence::not_met(CriterionId::OS1)
}

/// OS2 — protein-length-changing variant in a known oncogene or tumor
/// suppressor.
pub fn os2(input: &CriterionInput<'_>) -> CriterionEvidence {
    let length_changing = input.ctx.consequences.iter().any(|c| c.is_length_changing());
    if length_changing && input.role.is_cancer_gene() {
        CriterionEvidence::met(CriterionId::OS2, STRONG_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::OS2)
    }
}

/// OS3 — well-established recurrent hotspot.
pub fn os3(input: &CriterionInput<'_>) -> CriterionEvidence {
    if hotspot_band(input) == HotspotBand::Strong {
        let citations = hotspot_citations(input);
        CriterionEvidence::met(CriterionId::OS3, 0.9)
            .with_citations(citations)
            .with_note(format!("{} samples observed", input.ctx.max_hotspot_samples()))
    } else {
        CriterionEvidence::not_met(CriterionId::OS3)
    }
}

// ── Oncogenic: moderate ──────────────────────────────────────────────────────

/// OM1 — missense variant in a gene with a recognized missense mechanism.
pub fn om1(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.has_consequence(Consequence::Missense) && input.role.missense_mechanism {
        CriterionEvidence::met(CriterionId::OM1, MODERATE_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::OM1)
    }
}

/// OM2 — truncating variant in a tumor suppressor whose loss-of-function
/// mechanism is explicitly not established.
pub fn om2(input: &CriterionInput<'_>) -> CriterionEvidence {
    let truncating = input.ctx.consequences.iter().any(|c| c.is_truncating());
    if truncating
        && input.role.tumor_suppressor
        && input.role.lof_mechanism == Some(false)
    {
        CriterionEvidence::met(CriterionId::OM2, MODERATE_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::OM2)
    }
}

/// OM3 — hotspot with lower-confidence recurrence.
pub fn om3(input: &CriterionInput<'_>) -> CriterionEvidence {
    if hotspot_band(input) == HotspotBand::Moderate {
        CriterionEvidence::met(CriterionId::OM3, MODERATE_CONFIDENCE)
            .with_citations(hotspot_citations(input))
            .with_note(format!("{} samples observed", input.ctx.max_hotspot_samples()))
    } else {
        CriterionEvidence::not_met(CriterionId::OM3)
    }
}

/// OM4 — missense variant in a highly constrained gene.
pub fn om4(input: &CriterionInput<'_>) -> CriterionEvidence {
    match input.ctx.constraint_score {
        Some(score)
            if input.ctx.has_consequence(Consequence::Missense)
                && score >= input.config.constraint_score_threshold =>
        {
            CriterionEvidence::met(CriterionId::OM4, MODERATE_CONFIDENCE)
                .with_note(format!("constraint score {score:.2}"))
        }
        _ => CriterionEvidence::not_met(CriterionId::OM4),
    }
}

// ── Oncogenic: supporting ────────────────────────────────────────────────────

/// OP1 — concordant damaging predictions from independent tools.
pub fn op1(input: &CriterionInput<'_>) -> CriterionEvidence {
    let damaging: Vec<_> = input
        .ctx
        .predictions
        .iter()
        .filter(|p| p.call == PredictionCall::Damaging)
        .collect();
    let tolerated = input
        .ctx
        .predictions
        .iter()
        .filter(|p| p.call == PredictionCall::Tolerated)
        .count();

    if damaging.len() >= input.config.min_concordant_predictors && damaging.len() > tolerated {
        let citations = damaging.iter().map(|p| p.tool.clone()).collect();
        CriterionEvidence::met(CriterionId::OP1, SUPPORTING_CONFIDENCE).with_citations(citations)
    } else {
        CriterionEvidence::not_met(CriterionId::OP1)
    }
}

/// OP2 — somatic occurrence consistent with a known mutational signature.
pub fn op2(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.signature_consistent {
        CriterionEvidence::met(CriterionId::OP2, SUPPORTING_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::OP2)
    }
}

/// OP3 — hotspot with minimal evidence.
pub fn op3(input: &CriterionInput<'_>) -> CriterionEvidence {
    if hotspot_band(input) == HotspotBand::Supporting {
        CriterionEvidence::met(CriterionId::OP3, SUPPORTING_CONFIDENCE)
            .with_citations(hotspot_citations(input))
    } else {
        CriterionEvidence::not_met(CriterionId::OP3)
    }
}

/// OP4 — absent from population databases.
///
/// Requires at least one population record: an empty list means the
/// databases were never consulted, which is missing data, not absence.
pub fn op4(input: &CriterionInput<'_>) -> CriterionEvidence {
    match input.ctx.max_allele_frequency() {
        Some(max_af) if max_af < input.config.population_absence_max_af => {
            let citations = input
                .ctx
                .population_frequencies
                .iter()
                .map(|p| p.database.clone())
                .collect();
            CriterionEvidence::met(CriterionId::OP4, SUPPORTING_CONFIDENCE)
                .with_citations(citations)
        }
        _ => CriterionEvidence::not_met(CriterionId::OP4),
    }
}

// ── Benign ───────────────────────────────────────────────────────────────────

/// SBVS1 — common polymorphism: allele frequency above the very-strong
/// threshold.
pub fn sbvs1(input: &CriterionInput<'_>) -> CriterionEvidence {
    match input.ctx.max_allele_frequency() {
        Some(max_af) if max_af > input.config.benign_very_strong_af => {
            CriterionEvidence::met(CriterionId::SBVS1, VERY_STRONG_CONFIDENCE)
                .with_citations(frequency_citations(input, input.config.benign_very_strong_af))
                .with_note(format!("allele frequency {max_af:.4}"))
        }
        _ => CriterionEvidence::not_met(CriterionId::SBVS1),
    }
}

/// SBS1 — allele frequency in the strong-benign band.
pub fn sbs1(input: &CriterionInput<'_>) -> CriterionEvidence {
    match input.ctx.max_allele_frequency() {
        Some(max_af)
            if max_af >= input.config.benign_strong_min_af
                && max_af <= input.config.benign_very_strong_af =>
        {
            CriterionEvidence::met(CriterionId::SBS1, STRONG_CONFIDENCE)
                .with_citations(frequency_citations(input, input.config.benign_strong_min_af))
                .with_note(format!("allele frequency {max_af:.4}"))
        }
        _ => CriterionEvidence::not_met(CriterionId::SBS1),
    }
}

/// SBS2 — synonymous variant with no predicted splice effect.
pub fn sbs2(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.has_consequence(Consequence::Synonymous)
        && input.ctx.splice_effect_predicted == Some(false)
    {
        CriterionEvidence::met(CriterionId::SBS2, STRONG_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::SBS2)
    }
}

/// SBP1 — missense variant in a gene tolerant of benign missense variation.
pub fn sbp1(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.has_consequence(Consequence::Missense)
        && input.role.benign_missense_tolerant
    {
        CriterionEvidence::met(CriterionId::SBP1, SUPPORTING_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::SBP1)
    }
}

/// SBP2 — observed in cis with an established pathogenic variant.
pub fn sbp2(input: &CriterionInput<'_>) -> CriterionEvidence {
    if input.ctx.in_cis_with_pathogenic {
        CriterionEvidence::met(CriterionId::SBP2, SUPPORTING_CONFIDENCE)
    } else {
        CriterionEvidence::not_met(CriterionId::SBP2)
    }
}

// ── Hotspot banding ──────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum HotspotBand {
    Strong,
    Moderate,
    Supporting,
    None,
}

/// Assign the hotspot observations to exactly one recurrence band so the
/// same recurrence never counts under two criteria.
fn hotspot_band(input: &CriterionInput<'_>) -> HotspotBand {
    let samples = input.ctx.max_hotspot_samples();
    let q = input.ctx.min_hotspot_q_value();
    let config = input.config;

    if samples >= config.hotspot_strong_samples
        || q.map(|q| q <= config.hotspot_strong_q_value).unwrap_or(false)
    {
        HotspotBand::Strong
    } else if samples >= config.hotspot_moderate_min_samples
        || q.map(|q| q <= config.hotspot_moderate_q_value).unwrap_or(false)
    {
        HotspotBand::Moderate
    } else if samples >= config.hotspot_supporting_min_samples {
        HotspotBand::Supporting
    } else {
        HotspotBand::None
    }
}

fn hotspot_citations(input: &CriterionInput<'_>) -> Vec<String> {
    input.ctx.hotspots.iter().map(|h| h.source.clone()).collect()
}

fn frequency_citations(input: &CriterionInput<'_>, min_af: f64) -> Vec<String> {
    input
        .ctx
        .population_frequencies
        .iter()
        .filter(|p| p.allele_frequency >= min_af)
        .map(|p| p.database.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograde_common::engine_config::ClassifierConfig;
    use oncograde_common::evidence::{EvidenceRecord, GuidelineTag, SourceDefaults};
    use oncograde_common::variant::{Consequence, VariantContext};
    use oncograde_test_utils::{evidence, variant};

    fn input<'a>(
        ctx: &'a VariantContext,
        records: &'a [EvidenceRecord],
        config: &'a ClassifierConfig,
        defaults: &'a SourceDefaults,
    ) -> CriterionInput<'a> {
        CriterionInput { ctx, role: ctx.gene_role, evidence: records, config, source_defaults: defaults }
    }

    #[test]
    fn test_ovs1_tumor_suppressor_default() {
        let ctx = variant("TP53").tumor_suppressor().consequence(Consequence::StopGained).build();
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();
        let result = ovs1(&input(&ctx, &[], &config, &defaults));
        assert!(result.met);
    }

    #[test]
    fn test_ovs1_not_met_without_lof_gene() {
        let ctx = variant("KRAS").oncogene().consequence(Consequence::StopGained).build();
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();
        assert!(!ovs1(&input(&ctx, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_ovs1_vs_om2_mutually_exclusive() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let disproven = variant("GENEX")
            .tumor_suppressor()
            .lof_not_established()
            .consequence(Consequence::Frameshift)
            .build();
        let i = input(&disproven, &[], &config, &defaults);
        assert!(!ovs1(&i).met);
        assert!(om2(&i).met);

        let proven = variant("TP53")
            .tumor_suppressor()
            .lof_mechanism()
            .consequence(Consequence::Frameshift)
            .build();
        let i = input(&proven, &[], &config, &defaults);
        assert!(ovs1(&i).met);
        assert!(!om2(&i).met);
    }

    #[test]
    fn test_os1_literal_match() {
        let ctx = variant("BRAF").same_aa_change_as_oncogenic().build();
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();
        assert!(os1(&input(&ctx, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_os1_kb_assertion_respects_policy() {
        let ctx = variant("BRAF").build();
        let records = vec![
            evidence("OKB-1", GuidelineTag::ExpertConsensus, "functional")
                .source("oncokb")
                .meta("oncogenicity", "Oncogenic")
                .build(),
        ];
        let defaults = SourceDefaults::default();

        let permissive = ClassifierConfig::default();
        let result = os1(&input(&ctx, &records, &permissive, &defaults));
        assert!(result.met);
        assert_eq!(result.citations, vec!["oncokb".to_string()]);

        let strict = ClassifierConfig { accept_kb_assertions: false, ..Default::default() };
        assert!(!os1(&input(&ctx, &records, &strict, &defaults)).met);
    }

    #[test]
    fn test_os1_multiple_assertions_aggregate() {
        let ctx = variant("BRAF").build();
        let records = vec![
            evidence("OKB-1", GuidelineTag::ExpertConsensus, "functional")
                .source("oncokb")
                .confidence(0.7)
                .meta("oncogenicity", "oncogenic")
                .build(),
            evidence("CIV-2", GuidelineTag::ExpertConsensus, "functional")
                .source("civic")
                .confidence(0.7)
                .meta("oncogenicity", "likely_oncogenic")
                .build(),
        ];
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();
        let result = os1(&input(&ctx, &records, &config, &defaults));
        // noisy-OR: 1 - 0.3 * 0.3
        assert!((result.confidence - 0.91).abs() < 1e-9);
    }

    #[test]
    fn test_os2_length_change_requires_cancer_gene() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let in_oncogene =
            variant("ERBB2").oncogene().consequence(Consequence::InframeInsertion).build();
        assert!(os2(&input(&in_oncogene, &[], &config, &defaults)).met);

        let elsewhere = variant("GENEY").consequence(Consequence::InframeInsertion).build();
        assert!(!os2(&input(&elsewhere, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_hotspot_band_thresholds() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let strong = variant("KRAS").hotspot("cancerhotspots", 50).build();
        let i = input(&strong, &[], &config, &defaults);
        assert!(os3(&i).met);
        assert!(!om3(&i).met);
        assert!(!op3(&i).met);

        let moderate = variant("KRAS").hotspot("cancerhotspots", 49).build();
        let i = input(&moderate, &[], &config, &defaults);
        assert!(!os3(&i).met);
        assert!(om3(&i).met);
        assert!(!op3(&i).met);

        let supporting = variant("KRAS").hotspot("cancerhotspots", 3).build();
        let i = input(&supporting, &[], &config, &defaults);
        assert!(!os3(&i).met && !om3(&i).met);
        assert!(op3(&i).met);

        let below = variant("KRAS").hotspot("cancerhotspots", 2).build();
        let i = input(&below, &[], &config, &defaults);
        assert!(!os3(&i).met && !om3(&i).met && !op3(&i).met);
    }

    #[test]
    fn test_hotspot_q_value_banding() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let significant = variant("KRAS").hotspot_with_q("cancerhotspots", 5, 0.005).build();
        assert!(os3(&input(&significant, &[], &config, &defaults)).met);

        let relaxed = variant("KRAS").hotspot_with_q("cancerhotspots", 5, 0.03).build();
        let i = input(&relaxed, &[], &config, &defaults);
        assert!(!os3(&i).met);
        assert!(om3(&i).met);
    }

    #[test]
    fn test_om4_constraint_threshold() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let constrained =
            variant("GENEZ").consequence(Consequence::Missense).constraint_score(3.5).build();
        assert!(om4(&input(&constrained, &[], &config, &defaults)).met);

        let unconstrained =
            variant("GENEZ").consequence(Consequence::Missense).constraint_score(1.0).build();
        assert!(!om4(&input(&unconstrained, &[], &config, &defaults)).met);

        let unscored = variant("GENEZ").consequence(Consequence::Missense).build();
        assert!(!om4(&input(&unscored, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_op1_concordance() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let concordant = variant("GENEA")
            .prediction("sift", PredictionCall::Damaging)
            .prediction("polyphen", PredictionCall::Damaging)
            .build();
        let result = op1(&input(&concordant, &[], &config, &defaults));
        assert!(result.met);
        assert_eq!(result.citations.len(), 2);

        let discordant = variant("GENEA")
            .prediction("sift", PredictionCall::Damaging)
            .prediction("polyphen", PredictionCall::Damaging)
            .prediction("revel", PredictionCall::Tolerated)
            .prediction("cadd", PredictionCall::Tolerated)
            .build();
        assert!(!op1(&input(&discordant, &[], &config, &defaults)).met);

        let single = variant("GENEA").prediction("sift", PredictionCall::Damaging).build();
        assert!(!op1(&input(&single, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_op4_requires_population_records() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let unchecked = variant("GENEB").build();
        assert!(!op4(&input(&unchecked, &[], &config, &defaults)).met);

        let absent = variant("GENEB").population_af("gnomad", 0.0).build();
        assert!(op4(&input(&absent, &[], &config, &defaults)).met);

        let present = variant("GENEB").population_af("gnomad", 0.001).build();
        assert!(!op4(&input(&present, &[], &config, &defaults)).met);
    }

    #[test]
    fn test_benign_frequency_bands() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let common = variant("GENEC").population_af("gnomad", 0.06).build();
        let i = input(&common, &[], &config, &defaults);
        assert!(sbvs1(&i).met);
        assert!(!sbs1(&i).met);

        // Exactly 5% sits in the strong band: very-strong requires strictly above.
        let boundary = variant("GENEC").population_af("gnomad", 0.05).build();
        let i = input(&boundary, &[], &config, &defaults);
        assert!(!sbvs1(&i).met);
        assert!(sbs1(&i).met);

        let uncommon = variant("GENEC").population_af("gnomad", 0.02).build();
        let i = input(&uncommon, &[], &config, &defaults);
        assert!(!sbvs1(&i).met);
        assert!(sbs1(&i).met);

        let rare = variant("GENEC").population_af("gnomad", 0.001).build();
        let i = input(&rare, &[], &config, &defaults);
        assert!(!sbvs1(&i).met && !sbs1(&i).met);
    }

    #[test]
    fn test_sbs2_needs_splice_prediction() {
        let config = ClassifierConfig::default();
        let defaults = SourceDefaults::default();

        let silent = variant("GENED").consequence(Consequence::Synonymous).splice_effect(false).build();
        assert!(sbs2(&input(&silent, &[], &config, &defaults)).met);

        let splice_risk =
            variant("GENED").consequence(Consequence::Synonymous).splice_effect(true).build();
        assert!(!sbs2(&input(&splice_risk, &[], &config, &defaults)).met);

        // Unscored splice effect is missing data, not absence of effect.
        let unscored = variant("GENED").consequence(Consequence::Synonymous).build();
        assert!(!sbs2(&input(&unscored, &[], &config, &defaults)).met);
    }
}
