//! Engine configuration: strategy weights, criterion thresholds, tier
//! boundaries, and DSC parameters.
//!
//! Deployments tune the engine via YAML/TOML/JSON config or the workflow
//! layer. An absent config falls back to the documented defaults, including
//! a source weight multiplier of 1.0 for every knowledge base. Explicitly
//! provided configuration is validated at construction time and a malformed
//! table refuses to construct; defaults are never silently substituted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OncogradeError, Result};
use crate::evidence::SourceDefaults;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tumor-only vs tumor-normal workflow flag
    #[serde(default)]
    pub analysis_type: AnalysisType,

    /// Evidence scoring strategy weights and modifiers
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Criterion thresholds and policies
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Tier score boundaries
    #[serde(default)]
    pub tiering: TierThresholds,

    /// Dynamic somatic confidence parameters
    #[serde(default)]
    pub dsc: DscConfig,
}

/// Analysis workflow type supplied by the pathway configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    TumorOnly,
    #[default]
    TumorNormal,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Base weights for the evidence scoring strategy chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyWeights {
    #[serde(default = "default_fda_weight")]
    pub fda: f64,
    #[serde(default = "default_guideline_weight")]
    pub guideline: f64,
    #[serde(default = "default_meta_analysis_weight")]
    pub meta_analysis: f64,
    #[serde(default = "default_well_powered_weight")]
    pub well_powered_study: f64,
    #[serde(default = "default_consensus_weight")]
    pub expert_consensus: f64,
    #[serde(default = "default_small_studies_weight")]
    pub multiple_small_studies: f64,
    #[serde(default = "default_case_report_weight")]
    pub case_report: f64,
    #[serde(default = "default_preclinical_weight")]
    pub preclinical: f64,
}

fn default_fda_weight() -> f64 { 1.0 }
fn default_guideline_weight() -> f64 { 0.95 }
fn default_meta_analysis_weight() -> f64 { 0.9 }
fn default_well_powered_weight() -> f64 { 0.85 }
fn default_consensus_weight() -> f64 { 0.8 }
fn default_small_studies_weight() -> f64 { 0.6 }
fn default_case_report_weight() -> f64 { 0.4 }
fn default_preclinical_weight() -> f64 { 0.3 }

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            fda: default_fda_weight(),
            guideline: default_guideline_weight(),
            meta_analysis: default_meta_analysis_weight(),
            well_powered_study: default_well_powered_weight(),
            expert_consensus: default_consensus_weight(),
            multiple_small_studies: default_small_studies_weight(),
            case_report: default_case_report_weight(),
            preclinical: default_preclinical_weight(),
        }
    }
}

impl StrategyWeights {
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.fda,
            self.guideline,
            self.meta_analysis,
            self.well_powered_study,
            self.expert_consensus,
            self.multiple_small_studies,
            self.case_report,
            self.preclinical,
        ]
    }

    fn validate(&self) -> Result<()> {
        for (i, w) in self.as_array().iter().enumerate() {
            if !w.is_finite() || *w < 0.0 || *w > 1.0 {
                return Err(OncogradeError::Config(format!(
                    "strategy weight #{i} out of range [0, 1]: {w}"
                )));
            }
        }
        if self.fda <= 0.0 {
            return Err(OncogradeError::Config(
                "FDA base weight must be positive: it normalises the theoretical maximum".into(),
            ));
        }
        let max = self.as_array().into_iter().fold(0.0f64, f64::max);
        if self.fda < max {
            return Err(OncogradeError::Config(
                "FDA base weight must be the largest strategy weight".into(),
            ));
        }
        Ok(())
    }
}

/// Context relevance multipliers for one strategy family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextModifiers {
    pub therapeutic: f64,
    pub diagnostic: f64,
    pub prognostic: f64,
}

impl ContextModifiers {
    fn validate(&self, name: &str) -> Result<()> {
        for m in [self.therapeutic, self.diagnostic, self.prognostic] {
            if !m.is_finite() || !(0.0..=1.0).contains(&m) {
                return Err(OncogradeError::Config(format!(
                    "{name} context modifier out of range [0, 1]: {m}"
                )));
            }
        }
        Ok(())
    }
}

/// Evidence scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: StrategyWeights,

    /// Modifiers applied to clinical-study evidence
    #[serde(default = "default_clinical_modifiers")]
    pub clinical_study_modifiers: ContextModifiers,

    /// Modifiers applied to every other strategy family
    #[serde(default = "default_other_modifiers")]
    pub default_modifiers: ContextModifiers,

    /// Additive bonus for cancer-type-specific evidence
    #[serde(default = "default_cancer_type_bonus")]
    pub cancer_type_bonus: f64,

    /// Penalty for off-label therapeutic evidence
    #[serde(default = "default_off_label_penalty")]
    pub off_label_penalty: f64,

    /// Per-knowledge-base weight multipliers from the workflow layer.
    /// Missing sources fall back to 1.0.
    #[serde(default)]
    pub source_multipliers: BTreeMap<String, f64>,

    /// Per-source default confidences for records that carry none
    #[serde(default)]
    pub source_defaults: SourceDefaults,
}

fn default_clinical_modifiers() -> ContextModifiers {
    ContextModifiers { therapeutic: 1.0, diagnostic: 0.8, prognostic: 0.9 }
}

fn default_other_modifiers() -> ContextModifiers {
    ContextModifiers { therapeutic: 1.0, diagnostic: 1.0, prognostic: 1.0 }
}

fn default_cancer_type_bonus() -> f64 { 0.1 }
fn default_off_label_penalty() -> f64 { 0.2 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: StrategyWeights::default(),
            clinical_study_modifiers: default_clinical_modifiers(),
            default_modifiers: default_other_modifiers(),
            cancer_type_bonus: default_cancer_type_bonus(),
            off_label_penalty: default_off_label_penalty(),
            source_multipliers: BTreeMap::new(),
            source_defaults: SourceDefaults::default(),
        }
    }
}

impl ScoringConfig {
    /// Workflow multiplier for a knowledge base; 1.0 when unconfigured.
    pub fn source_multiplier(&self, source: &str) -> f64 {
        self.source_multipliers
            .get(&source.to_lowercase())
            .copied()
            .unwrap_or(1.0)
    }

    fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.clinical_study_modifiers.validate("clinical_study")?;
        self.default_modifiers.validate("default")?;
        if !(0.0..=1.0).contains(&self.cancer_type_bonus) {
            return Err(OncogradeError::Config(format!(
                "cancer_type_bonus out of range [0, 1]: {}",
                self.cancer_type_bonus
            )));
        }
        if !(0.0..=1.0).contains(&self.off_label_penalty) {
            return Err(OncogradeError::Config(format!(
                "off_label_penalty out of range [0, 1]: {}",
                self.off_label_penalty
            )));
        }
        for (source, m) in &self.source_multipliers {
            if !m.is_finite() || *m < 0.0 {
                return Err(OncogradeError::Config(format!(
                    "source multiplier for '{source}' must be non-negative: {m}"
                )));
            }
        }
        Ok(())
    }
}

// ── Classifier ───────────────────────────────────────────────────────────────

/// Thresholds and policies for the seventeen criterion evaluators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Well-established hotspot: at least this many samples
    #[serde(default = "default_hotspot_strong_samples")]
    pub hotspot_strong_samples: u32,

    /// Well-established hotspot: q-value at or below this
    #[serde(default = "default_hotspot_strong_q")]
    pub hotspot_strong_q_value: f64,

    /// Lower-confidence hotspot: sample count in [moderate, strong)
    #[serde(default = "default_hotspot_moderate_samples")]
    pub hotspot_moderate_min_samples: u32,

    /// Relaxed significance for the moderate hotspot criterion
    #[serde(default = "default_hotspot_moderate_q")]
    pub hotspot_moderate_q_value: f64,

    /// Minimal hotspot: at least this many samples
    #[serde(default = "default_hotspot_supporting_samples")]
    pub hotspot_supporting_min_samples: u32,

    /// Population-absence floor: every database below this frequency
    #[serde(default = "default_absence_af_floor")]
    pub population_absence_max_af: f64,

    /// Very-strong benign: allele frequency above this
    #[serde(default = "default_benign_very_strong_af")]
    pub benign_very_strong_af: f64,

    /// Strong benign: allele frequency in [min, very-strong]
    #[serde(default = "default_benign_strong_min_af")]
    pub benign_strong_min_af: f64,

    /// Highly constrained gene: constraint metric at or above this
    #[serde(default = "default_constraint_threshold")]
    pub constraint_score_threshold: f64,

    /// Concordant in-silico predictors required
    #[serde(default = "default_min_predictors")]
    pub min_concordant_predictors: usize,

    /// Accept a knowledge base's "oncogenic" assertion as satisfying the
    /// same-amino-acid-change criterion. Cross-guideline substitution is a
    /// modeling assumption, kept configurable pending domain sign-off.
    #[serde(default = "default_true")]
    pub accept_kb_assertions: bool,
}

fn default_hotspot_strong_samples() -> u32 { 50 }
fn default_hotspot_strong_q() -> f64 { 0.01 }
fn default_hotspot_moderate_samples() -> u32 { 10 }
fn default_hotspot_moderate_q() -> f64 { 0.05 }
fn default_hotspot_supporting_samples() -> u32 { 3 }
fn default_absence_af_floor() -> f64 { 0.00001 }
fn default_benign_very_strong_af() -> f64 { 0.05 }
fn default_benign_strong_min_af() -> f64 { 0.01 }
fn default_constraint_threshold() -> f64 { 3.09 }
fn default_min_predictors() -> usize { 2 }
fn default_true() -> bool { true }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hotspot_strong_samples: default_hotspot_strong_samples(),
            hotspot_strong_q_value: default_hotspot_strong_q(),
            hotspot_moderate_min_samples: default_hotspot_moderate_samples(),
            hotspot_moderate_q_value: default_hotspot_moderate_q(),
            hotspot_supporting_min_samples: default_hotspot_supporting_samples(),
            population_absence_max_af: default_absence_af_floor(),
            benign_very_strong_af: default_benign_very_strong_af(),
            benign_strong_min_af: default_benign_strong_min_af(),
            constraint_score_threshold: default_constraint_threshold(),
            min_concordant_predictors: default_min_predictors(),
            accept_kb_assertions: default_true(),
        }
    }
}

impl ClassifierConfig {
    fn validate(&self) -> Result<()> {
        if self.hotspot_supporting_min_samples == 0 {
            return Err(OncogradeError::Config(
                "hotspot_supporting_min_samples must be at least 1".into(),
            ));
        }
        if self.hotspot_supporting_min_samples > self.hotspot_moderate_min_samples
            || self.hotspot_moderate_min_samples > self.hotspot_strong_samples
        {
            return Err(OncogradeError::Config(format!(
                "hotspot sample thresholds must be ordered supporting <= moderate <= strong, got {} / {} / {}",
                self.hotspot_supporting_min_samples,
                self.hotspot_moderate_min_samples,
                self.hotspot_strong_samples,
            )));
        }
        for (name, q) in [
            ("hotspot_strong_q_value", self.hotspot_strong_q_value),
            ("hotspot_moderate_q_value", self.hotspot_moderate_q_value),
        ] {
            if !q.is_finite() || !(0.0..=1.0).contains(&q) {
                return Err(OncogradeError::Config(format!("{name} out of range [0, 1]: {q}")));
            }
        }
        if self.hotspot_strong_q_value > self.hotspot_moderate_q_value {
            return Err(OncogradeError::Config(
                "hotspot_strong_q_value must not exceed hotspot_moderate_q_value".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.population_absence_max_af)
            || self.population_absence_max_af >= self.benign_strong_min_af
        {
            return Err(OncogradeError::Config(format!(
                "population_absence_max_af must sit below benign_strong_min_af: {} vs {}",
                self.population_absence_max_af, self.benign_strong_min_af
            )));
        }
        if self.benign_strong_min_af >= self.benign_very_strong_af
            || self.benign_very_strong_af > 1.0
        {
            return Err(OncogradeError::Config(format!(
                "benign allele-frequency thresholds must be ordered strong < very-strong <= 1: {} vs {}",
                self.benign_strong_min_af, self.benign_very_strong_af
            )));
        }
        if self.min_concordant_predictors < 2 {
            return Err(OncogradeError::Config(
                "min_concordant_predictors must require at least 2 independent tools".into(),
            ));
        }
        Ok(())
    }
}

// ── Tiering ──────────────────────────────────────────────────────────────────

/// Score boundaries for the seven-tier mapping, each inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_tier_ia")]
    pub tier_ia: f64,
    #[serde(default = "default_tier_ib")]
    pub tier_ib: f64,
    #[serde(default = "default_tier_iic")]
    pub tier_iic: f64,
    #[serde(default = "default_tier_iid")]
    pub tier_iid: f64,
}

fn default_tier_ia() -> f64 { 0.9 }
fn default_tier_ib() -> f64 { 0.8 }
fn default_tier_iic() -> f64 { 0.6 }
fn default_tier_iid() -> f64 { 0.4 }

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            tier_ia: default_tier_ia(),
            tier_ib: default_tier_ib(),
            tier_iic: default_tier_iic(),
            tier_iid: default_tier_iid(),
        }
    }
}

impl TierThresholds {
    fn validate(&self) -> Result<()> {
        let ordered = [self.tier_ia, self.tier_ib, self.tier_iic, self.tier_iid];
        for t in ordered {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(OncogradeError::Config(format!(
                    "tier threshold out of range [0, 1]: {t}"
                )));
            }
        }
        if !(self.tier_ia > self.tier_ib
            && self.tier_ib > self.tier_iic
            && self.tier_iic > self.tier_iid
            && self.tier_iid > 0.0)
        {
            return Err(OncogradeError::Config(format!(
                "tier thresholds must be strictly descending and positive: {:?}",
                ordered
            )));
        }
        Ok(())
    }
}

// ── DSC ──────────────────────────────────────────────────────────────────────

/// Parameters for the dynamic somatic confidence estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscConfig {
    /// Base somatic prior before adjustments
    #[serde(default = "default_base_prior")]
    pub base_prior: f64,

    /// Prior boost when hotspot evidence is present
    #[serde(default = "default_hotspot_boost")]
    pub hotspot_boost: f64,

    /// Prior penalty when population frequency exceeds `common_af_threshold`
    #[serde(default = "default_popfreq_penalty")]
    pub population_frequency_penalty: f64,

    /// Allele frequency above which a variant counts as common
    #[serde(default = "default_common_af")]
    pub common_af_threshold: f64,

    /// Prior penalty for a known germline-pathogenic variant
    #[serde(default = "default_germline_penalty")]
    pub germline_pathogenic_penalty: f64,

    /// Confidence when all three modules contributed
    #[serde(default = "default_full_confidence")]
    pub full_confidence: f64,

    /// Confidence reduction per missing module
    #[serde(default = "default_missing_module_step")]
    pub missing_module_step: f64,

    /// Extra factor applied when only the prior module contributed
    #[serde(default = "default_prior_only_factor")]
    pub prior_only_confidence_factor: f64,
}

fn default_base_prior() -> f64 { 0.5 }
fn default_hotspot_boost() -> f64 { 0.3 }
fn default_popfreq_penalty() -> f64 { 0.3 }
fn default_common_af() -> f64 { 0.01 }
fn default_germline_penalty() -> f64 { 0.4 }
fn default_full_confidence() -> f64 { 0.9 }
fn default_missing_module_step() -> f64 { 0.15 }
fn default_prior_only_factor() -> f64 { 0.6 }

impl Default for DscConfig {
    fn default() -> Self {
        Self {
            base_prior: default_base_prior(),
            hotspot_boost: default_hotspot_boost(),
            population_frequency_penalty: default_popfreq_penalty(),
            common_af_threshold: default_common_af(),
            germline_pathogenic_penalty: default_germline_penalty(),
            full_confidence: default_full_confidence(),
            missing_module_step: default_missing_module_step(),
            prior_only_confidence_factor: default_prior_only_factor(),
        }
    }
}

impl DscConfig {
    fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("base_prior", self.base_prior),
            ("hotspot_boost", self.hotspot_boost),
            ("population_frequency_penalty", self.population_frequency_penalty),
            ("common_af_threshold", self.common_af_threshold),
            ("germline_pathogenic_penalty", self.germline_pathogenic_penalty),
            ("full_confidence", self.full_confidence),
            ("missing_module_step", self.missing_module_step),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(OncogradeError::Config(format!("{name} out of range [0, 1]: {v}")));
            }
        }
        if !(0.0 < self.prior_only_confidence_factor && self.prior_only_confidence_factor <= 1.0) {
            return Err(OncogradeError::Config(format!(
                "prior_only_confidence_factor out of range (0, 1]: {}",
                self.prior_only_confidence_factor
            )));
        }
        Ok(())
    }
}

// ── Loading & validation ─────────────────────────────────────────────────────

impl EngineConfig {
    /// Validate every sub-table. Called by the engine constructor; a
    /// malformed configuration is a fatal, startup-time failure.
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.classifier.validate()?;
        self.tiering.validate()?;
        self.dsc.validate()?;
        Ok(())
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
