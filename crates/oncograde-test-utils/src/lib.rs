//! oncograde-test-utils — Builder-style fixtures for unit and integration
//! tests. Dev-dependency only; never ships in the engine path.

use oncograde_common::evidence::{EvidenceRecord, GuidelineTag};
use oncograde_common::variant::{
    ComputationalPrediction, Consequence, HotspotObservation, PopulationFrequency,
    PredictionCall, VariantContext,
};

// ── Evidence fixtures ────────────────────────────────────────────────────────

/// Start building an evidence record with sensible defaults.
pub fn evidence(code: &str, tag: GuidelineTag, category: &str) -> EvidenceBuilder {
    EvidenceBuilder {
        record: EvidenceRecord {
            code: code.to_string(),
            numeric_score: 5.0,
            guideline_tag: tag,
            source: "civic".to_string(),
            description: category.to_string(),
            confidence: None,
            evidence_category: category.to_string(),
            metadata: Default::default(),
        },
    }
}

pub struct EvidenceBuilder {
    record: EvidenceRecord,
}

impl EvidenceBuilder {
    pub fn source(mut self, source: &str) -> Self {
        self.record.source = source.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record.description = description.to_string();
        self
    }

    pub fn numeric_score(mut self, score: f64) -> Self {
        self.record.numeric_score = score;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.record.confidence = Some(confidence);
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.record.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> EvidenceRecord {
        self.record
    }
}

// ── Variant fixtures ─────────────────────────────────────────────────────────

/// Start building a variant context for a gene.
pub fn variant(gene: &str) -> VariantBuilder {
    VariantBuilder { ctx: VariantContext::for_gene(gene) }
}

pub struct VariantBuilder {
    ctx: VariantContext,
}

impl VariantBuilder {
    pub fn consequence(mut self, c: Consequence) -> Self {
        self.ctx.consequences.push(c);
        self
    }

    pub fn oncogene(mut self) -> Self {
        self.ctx.gene_role.oncogene = true;
        self
    }

    pub fn tumor_suppressor(mut self) -> Self {
        self.ctx.gene_role.tumor_suppressor = true;
        self
    }

    pub fn lof_mechanism(mut self) -> Self {
        self.ctx.gene_role.lof_mechanism = Some(true);
        self
    }

    pub fn lof_not_established(mut self) -> Self {
        self.ctx.gene_role.lof_mechanism = Some(false);
        self
    }

    pub fn missense_mechanism(mut self) -> Self {
        self.ctx.gene_role.missense_mechanism = true;
        self
    }

    pub fn benign_missense_tolerant(mut self) -> Self {
        self.ctx.gene_role.benign_missense_tolerant = true;
        self
    }

    pub fn hotspot(mut self, source: &str, sample_count: u32) -> Self {
        self.ctx.hotspots.push(HotspotObservation {
            source: source.to_string(),
            sample_count,
            cancer_types: vec![],
            q_value: None,
        });
        self
    }

    pub fn hotspot_with_q(mut self, source: &str, sample_count: u32, q_value: f64) -> Self {
        self.ctx.hotspots.push(HotspotObservation {
            source: source.to_string(),
            sample_count,
            cancer_types: vec![],
            q_value: Some(q_value),
        });
        self
    }

    pub fn population_af(mut self, database: &str, allele_frequency: f64) -> Self {
        self.ctx.population_frequencies.push(PopulationFrequency {
            database: database.to_string(),
            allele_frequency,
        });
        self
    }

    pub fn prediction(mut self, tool: &str, call: PredictionCall) -> Self {
        self.ctx.predictions.push(ComputationalPrediction {
            tool: tool.to_string(),
            call,
            score: None,
        });
        self
    }

    pub fn constraint_score(mut self, score: f64) -> Self {
        self.ctx.constraint_score = Some(score);
        self
    }

    pub fn vaf(mut self, vaf: f64) -> Self {
        self.ctx.tumor_vaf = Some(vaf);
        self
    }

    pub fn purity(mut self, purity: f64) -> Self {
        self.ctx.tumor_purity = Some(purity);
        self
    }

    pub fn germline_pathogenic(mut self) -> Self {
        self.ctx.known_germline_pathogenic = true;
        self
    }

    pub fn signature_consistent(mut self) -> Self {
        self.ctx.signature_consistent = true;
        self
    }

    pub fn in_cis_with_pathogenic(mut self) -> Self {
        self.ctx.in_cis_with_pathogenic = true;
        self
    }

    pub fn splice_effect(mut self, predicted: bool) -> Self {
        self.ctx.splice_effect_predicted = Some(predicted);
        self
    }

    pub fn same_aa_change_as_oncogenic(mut self) -> Self {
        self.ctx.same_aa_change_as_oncogenic = true;
        self
    }

    pub fn cancer_type(mut self, cancer_type: &str) -> Self {
        self.ctx.cancer_type = Some(cancer_type.to_string());
        self
    }

    pub fn build(self) -> VariantContext {
        self.ctx
    }
}
