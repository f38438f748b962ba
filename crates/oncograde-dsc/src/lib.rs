//! oncograde-dsc — Dynamic somatic confidence for tumor-only samples.
//!
//! Combines VAF/purity consistency, a somatic-vs-germline prior, and
//! genomic-context signals into one probability that the variant is somatic,
//! plus a confidence in that probability. Modules score independently;
//! whichever are available are averaged, and the result always stays in
//! [0, 1].

use tracing::debug;

use oncograde_common::classification::{DscModule, DscResult};
use oncograde_common::engine_config::DscConfig;
use oncograde_common::variant::VariantContext;

/// Dynamic somatic confidence estimator.
pub struct DscEstimator {
    config: DscConfig,
}

impl DscEstimator {
    pub fn new(config: DscConfig) -> Self {
        Self { config }
    }

    /// Estimate somatic confidence for one tumor-only variant.
    pub fn estimate(&self, ctx: &VariantContext) -> DscResult {
        let mut modules = Vec::new();
        let mut scores = Vec::new();

        if let Some(score) = self.vaf_purity_consistency(ctx) {
            modules.push(DscModule::VafPurityConsistency);
            scores.push(score);
        }

        // The prior is computable for every variant.
        modules.push(DscModule::SomaticPrior);
        scores.push(self.somatic_prior(ctx));

        if let Some(score) = self.genomic_context(ctx) {
            modules.push(DscModule::GenomicContext);
            scores.push(score);
        }

        let score =
            (scores.iter().sum::<f64>() / scores.len() as f64).clamp(0.0, 1.0);
        let confidence = self.confidence(&modules);

        debug!(score, confidence, ?modules, "estimated somatic confidence");
        DscResult { score, confidence, modules_available: modules }
    }

    /// Expected somatic VAF for a heterozygous event is purity / 2; the
    /// score decays linearly with relative divergence from that expectation.
    /// Not scored when purity is absent or zero.
    fn vaf_purity_consistency(&self, ctx: &VariantContext) -> Option<f64> {
        let vaf = ctx.tumor_vaf?;
        let purity = ctx.tumor_purity.filter(|p| *p > 0.0)?;
        let expected = purity / 2.0;
        let divergence = (vaf - expected).abs() / expected;
        Some((1.0 - divergence).clamp(0.0, 1.0))
    }

    /// Base somatic rate, raised by hotspot evidence and lowered by high
    /// population frequency or a known germline-pathogenic assertion.
    fn somatic_prior(&self, ctx: &VariantContext) -> f64 {
        let mut prior = self.config.base_prior;
        if ctx.has_hotspot_evidence() {
            prior += self.config.hotspot_boost;
        }
        if ctx
            .max_allele_frequency()
            .map(|af| af > self.config.common_af_threshold)
            .unwrap_or(false)
        {
            prior -= self.config.population_frequency_penalty;
        }
        if ctx.known_germline_pathogenic {
            prior -= self.config.germline_pathogenic_penalty;
        }
        prior.clamp(0.0, 1.0)
    }

    /// Aggregate of additional corroborating signals; currently mutational
    /// signature consistency. Not scored when no signal is present.
    fn genomic_context(&self, ctx: &VariantContext) -> Option<f64> {
        ctx.signature_consistent.then_some(0.8)
    }

    fn confidence(&self, modules: &[DscModule]) -> f64 {
        let missing = 3usize.saturating_sub(modules.len());
        let mut confidence =
            self.config.full_confidence - self.config.missing_module_step * missing as f64;
        if modules == [DscModule::SomaticPrior] {
            confidence *= self.config.prior_only_confidence_factor;
        }
        confidence.clamp(0.0, 1.0)
    }
}

impl Default for DscEstimator {
    fn default() -> Self {
        Self::new(DscConfig::default())
    }
}
