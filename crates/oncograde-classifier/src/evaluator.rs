//! Criterion evaluator table and the classifier entry point.
//!
//! Evaluators are held in a table keyed by criterion identifier. A
//! deployment supplies superseding functions for specific keys and inherits
//! the rest unchanged: a composable override map rather than inheritance.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use oncograde_common::classification::{
    ClassificationResult, CriterionCounts, CriterionEvidence, CriterionId,
};
use oncograde_common::confidence::classification_confidence;
use oncograde_common::engine_config::ClassifierConfig;
use oncograde_common::evidence::{EvidenceRecord, SourceDefaults};
use oncograde_common::tables::ReferenceTables;
use oncograde_common::variant::{GeneRole, VariantContext};

use crate::combine;
use crate::criteria;

/// Everything one criterion evaluation may inspect.
pub struct CriterionInput<'a> {
    pub ctx: &'a VariantContext,
    /// Context role flags merged with the reference gene-role table.
    pub role: GeneRole,
    pub evidence: &'a [EvidenceRecord],
    pub config: &'a ClassifierConfig,
    pub source_defaults: &'a SourceDefaults,
}

/// A criterion evaluator. Must be pure: same input, same output.
pub type CriterionEvaluator = Box<dyn Fn(&CriterionInput<'_>) -> CriterionEvidence + Send + Sync>;

/// The 17-criterion oncogenicity classifier.
pub struct OncogenicityClassifier {
    config: ClassifierConfig,
    source_defaults: SourceDefaults,
    tables: Arc<ReferenceTables>,
    evaluators: BTreeMap<CriterionId, CriterionEvaluator>,
}

impl OncogenicityClassifier {
    pub fn new(
        config: ClassifierConfig,
        source_defaults: SourceDefaults,
        tables: Arc<ReferenceTables>,
    ) -> Self {
        Self::with_overrides(config, source_defaults, tables, BTreeMap::new())
    }

    /// Build with superseding evaluators for specific criteria; every other
    /// criterion keeps its default evaluator.
    pub fn with_overrides(
        config: ClassifierConfig,
        source_defaults: SourceDefaults,
        tables: Arc<ReferenceTables>,
        overrides: BTreeMap<CriterionId, CriterionEvaluator>,
    ) -> Self {
        let mut evaluators = Self::default_evaluators();
        for (id, evaluator) in overrides {
            evaluators.insert(id, evaluator);
        }
        Self { config, source_defaults, tables, evaluators }
    }

    fn default_evaluators() -> BTreeMap<CriterionId, CriterionEvaluator> {
        let mut map: BTreeMap<CriterionId, CriterionEvaluator> = BTreeMap::new();
        map.insert(CriterionId::OVS1, Box::new(criteria::ovs1));
        map.insert(CriterionId::OS1, Box::new(criteria::os1));
        map.insert(CriterionId::OS2, Box::new(criteria::os2));
        map.insert(CriterionId::OS3, Box::new(criteria::os3));
        map.insert(CriterionId::OM1, Box::new(criteria::om1));
        map.insert(CriterionId::OM2, Box::new(criteria::om2));
        map.insert(CriterionId::OM3, Box::new(criteria::om3));
        map.insert(CriterionId::OM4, Box::new(criteria::om4));
        map.insert(CriterionId::OP1, Box::new(criteria::op1));
        map.insert(CriterionId::OP2, Box::new(criteria::op2));
        map.insert(CriterionId::OP3, Box::new(criteria::op3));
        map.insert(CriterionId::OP4, Box::new(criteria::op4));
        map.insert(CriterionId::SBVS1, Box::new(criteria::sbvs1));
        map.insert(CriterionId::SBS1, Box::new(criteria::sbs1));
        map.insert(CriterionId::SBS2, Box::new(criteria::sbs2));
        map.insert(CriterionId::SBP1, Box::new(criteria::sbp1));
        map.insert(CriterionId::SBP2, Box::new(criteria::sbp2));
        map
    }

    /// Classify one variant. Pure and total: data gaps surface as unmet
    /// criteria, never as errors.
    pub fn classify(
        &self,
        ctx: &VariantContext,
        evidence: &[EvidenceRecord],
    ) -> ClassificationResult {
        let fallback = GeneRole::default();
        let table_role = self.tables.gene_role(&ctx.gene).unwrap_or(&fallback);
        let role = ctx.gene_role.merged_with(table_role);

        let input = CriterionInput {
            ctx,
            role,
            evidence,
            config: &self.config,
            source_defaults: &self.source_defaults,
        };

        // CriterionId::ALL fixes the evaluation order, keeping the rationale
        // and the met-criteria listing deterministic.
        let met_criteria: Vec<CriterionEvidence> = CriterionId::ALL
            .iter()
            .filter_map(|id| {
                let evaluator = self.evaluators.get(id)?;
                let outcome = evaluator(&input);
                debug!(criterion = id.as_str(), met = outcome.met, "evaluated criterion");
                outcome.met.then_some(outcome)
            })
            .collect();

        let counts = CriterionCounts::tally(&met_criteria);
        let class = combine::apply_rules(&counts);
        let confidence = classification_confidence(&met_criteria);
        let rationale = combine::rationale(class, &met_criteria);

        ClassificationResult { class, met_criteria, counts, confidence, rationale }
    }
}
