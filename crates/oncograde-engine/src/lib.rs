//! oncograde-engine — The classification facade.
//!
//! Wires the scorer, classifier, tiering engine, and DSC estimator behind a
//! single entry point. The engine is pure and stateless per call: reference
//! tables are loaded once at construction into immutable structures shared
//! by reference, so a batch of variants fans out across worker threads with
//! no coordination beyond the final collect.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use oncograde_classifier::OncogenicityClassifier;
use oncograde_common::engine_config::AnalysisType;
use oncograde_common::evidence::EvidenceRecord;
use oncograde_common::variant::VariantContext;
use oncograde_dsc::DscEstimator;
use oncograde_scoring::EvidenceScorer;
use oncograde_tiering::{primary_tier, TieringEngine};

// Re-export the types a caller needs to drive the engine.
pub use oncograde_common::classification::VariantAssessment;
pub use oncograde_common::engine_config::EngineConfig;
pub use oncograde_common::error::{OncogradeError, Result};
pub use oncograde_common::tables::ReferenceTables;

/// Evidence-based variant interpretation engine.
pub struct InterpretationEngine {
    analysis_type: AnalysisType,
    scorer: EvidenceScorer,
    classifier: OncogenicityClassifier,
    tiering: TieringEngine,
    dsc: DscEstimator,
}

impl InterpretationEngine {
    /// Construct the engine, validating the supplied configuration. A
    /// malformed threshold or weight table refuses to construct; defaults
    /// are never substituted for configuration that was explicitly given.
    pub fn new(config: EngineConfig, tables: ReferenceTables) -> Result<Self> {
        config.validate()?;
        let tables = Arc::new(tables);

        Ok(Self {
            analysis_type: config.analysis_type,
            scorer: EvidenceScorer::new(config.scoring.clone()),
            classifier: OncogenicityClassifier::new(
                config.classifier,
                config.scoring.source_defaults,
                tables,
            ),
            tiering: TieringEngine::new(config.tiering),
            dsc: DscEstimator::new(config.dsc),
        })
    }

    /// Default configuration, empty reference tables.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), ReferenceTables::new())
            .expect("default engine configuration is valid")
    }

    /// Interpret one variant: classification, per-context tiers, and (for
    /// tumor-only analyses) dynamic somatic confidence.
    ///
    /// The only per-call error is a context without a gene symbol. Data
    /// gaps inside a well-formed context are the expected path and surface
    /// as unmet criteria or absent tier assignments.
    pub fn interpret(
        &self,
        ctx: &VariantContext,
        evidence: &[EvidenceRecord],
    ) -> Result<VariantAssessment> {
        if ctx.gene.trim().is_empty() {
            return Err(OncogradeError::InvalidContext(
                "variant context is missing a gene symbol".into(),
            ));
        }

        let classification = self.classifier.classify(ctx, evidence);
        let context_scores =
            self.scorer.score_all_contexts(evidence, ctx.cancer_type.as_deref());
        let tier_assignments = self.tiering.assign_all(&context_scores);
        let primary = primary_tier(&tier_assignments);

        let dsc = match self.analysis_type {
            AnalysisType::TumorOnly => Some(self.dsc.estimate(ctx)),
            AnalysisType::TumorNormal => None,
        };

        debug!(
            gene = %ctx.gene,
            class = classification.class.as_str(),
            tier = primary.as_str(),
            "interpreted variant"
        );

        Ok(VariantAssessment { classification, tier_assignments, primary_tier: primary, dsc })
    }

    /// Interpret a batch in parallel. One result slot per input; a variant
    /// that fails (malformed context) never aborts its siblings.
    pub fn interpret_batch(
        &self,
        items: &[(VariantContext, Vec<EvidenceRecord>)],
    ) -> Vec<Result<VariantAssessment>> {
        items
            .par_iter()
            .map(|(ctx, evidence)| self.interpret(ctx, evidence))
            .collect()
    }
}
