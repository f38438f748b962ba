//! Result records produced by the engine.
//!
//! All of these are plain immutable value types: computed once per
//! (variant, evidence set) invocation and handed downstream, no behavior
//! beyond ordering helpers.

use serde::{Deserialize, Serialize};

use crate::evidence::{ActionabilityContext, EvidenceLevel};

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The seventeen CGC/VICC-style criterion identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CriterionId {
    // Oncogenic
    OVS1,
    OS1,
    OS2,
    OS3,
    OM1,
    OM2,
    OM3,
    OM4,
    OP1,
    OP2,
    OP3,
    OP4,
    // Benign
    SBVS1,
    SBS1,
    SBS2,
    SBP1,
    SBP2,
}

impl CriterionId {
    pub const ALL: [CriterionId; 17] = [
        CriterionId::OVS1,
        CriterionId::OS1,
        CriterionId::OS2,
        CriterionId::OS3,
        CriterionId::OM1,
        CriterionId::OM2,
        CriterionId::OM3,
        CriterionId::OM4,
        CriterionId::OP1,
        CriterionId::OP2,
        CriterionId::OP3,
        CriterionId::OP4,
        CriterionId::SBVS1,
        CriterionId::SBS1,
        CriterionId::SBS2,
        CriterionId::SBP1,
        CriterionId::SBP2,
    ];

    pub fn direction(&self) -> CriterionDirection {
        match self {
            CriterionId::SBVS1
            | CriterionId::SBS1
            | CriterionId::SBS2
            | CriterionId::SBP1
            | CriterionId::SBP2 => CriterionDirection::Benign,
            _ => CriterionDirection::Oncogenic,
        }
    }

    pub fn strength(&self) -> CriterionStrength {
        match self {
            CriterionId::OVS1 | CriterionId::SBVS1 => CriterionStrength::VeryStrong,
            CriterionId::OS1
            | CriterionId::OS2
            | CriterionId::OS3
            | CriterionId::SBS1
            | CriterionId::SBS2 => CriterionStrength::Strong,
            CriterionId::OM1 | CriterionId::OM2 | CriterionId::OM3 | CriterionId::OM4 => {
                CriterionStrength::Moderate
            }
            _ => CriterionStrength::Supporting,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionId::OVS1  => "OVS1",
            CriterionId::OS1   => "OS1",
            CriterionId::OS2   => "OS2",
            CriterionId::OS3   => "OS3",
            CriterionId::OM1   => "OM1",
            CriterionId::OM2   => "OM2",
            CriterionId::OM3   => "OM3",
            CriterionId::OM4   => "OM4",
            CriterionId::OP1   => "OP1",
            CriterionId::OP2   => "OP2",
            CriterionId::OP3   => "OP3",
            CriterionId::OP4   => "OP4",
            CriterionId::SBVS1 => "SBVS1",
            CriterionId::SBS1  => "SBS1",
            CriterionId::SBS2  => "SBS2",
            CriterionId::SBP1  => "SBP1",
            CriterionId::SBP2  => "SBP2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionDirection {
    Oncogenic,
    Benign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStrength {
    VeryStrong,
    Strong,
    Moderate,
    Supporting,
}

impl CriterionStrength {
    /// Weight used in the strength-weighted confidence average.
    pub fn confidence_weight(&self) -> f64 {
        match self {
            CriterionStrength::VeryStrong => 1.0,
            CriterionStrength::Strong     => 0.8,
            CriterionStrength::Moderate   => 0.5,
            CriterionStrength::Supporting => 0.3,
        }
    }
}

/// Outcome of one criterion evaluation. Produced fresh per classification
/// call; never shared across variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionEvidence {
    pub id: CriterionId,
    pub met: bool,
    pub strength: CriterionStrength,
    /// Knowledge bases / sources that contributed to the decision.
    #[serde(default)]
    pub citations: Vec<String>,
    pub confidence: f64,
    pub note: Option<String>,
}

impl CriterionEvidence {
    /// An unmet result at the criterion's canonical strength.
    pub fn not_met(id: CriterionId) -> Self {
        Self {
            id,
            met: false,
            strength: id.strength(),
            citations: vec![],
            confidence: 0.0,
            note: None,
        }
    }

    pub fn met(id: CriterionId, confidence: f64) -> Self {
        Self {
            id,
            met: true,
            strength: id.strength(),
            citations: vec![],
            confidence: confidence.clamp(0.0, 1.0),
            note: None,
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Classification result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OncogenicityClass {
    Oncogenic,
    LikelyOncogenic,
    UncertainSignificance,
    LikelyBenign,
    Benign,
}

impl OncogenicityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OncogenicityClass::Oncogenic             => "Oncogenic",
            OncogenicityClass::LikelyOncogenic       => "Likely Oncogenic",
            OncogenicityClass::UncertainSignificance => "Uncertain Significance",
            OncogenicityClass::LikelyBenign          => "Likely Benign",
            OncogenicityClass::Benign                => "Benign",
        }
    }
}

/// Met-criterion counts by direction and strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionCounts {
    pub oncogenic_very_strong: usize,
    pub oncogenic_strong: usize,
    pub oncogenic_moderate: usize,
    pub oncogenic_supporting: usize,
    pub benign_very_strong: usize,
    pub benign_strong: usize,
    pub benign_supporting: usize,
}

impl CriterionCounts {
    pub fn tally(met: &[CriterionEvidence]) -> Self {
        let mut counts = CriterionCounts::default();
        for c in met.iter().filter(|c| c.met) {
            match (c.id.direction(), c.strength) {
                (CriterionDirection::Oncogenic, CriterionStrength::VeryStrong) => {
                    counts.oncogenic_very_strong += 1
                }
                (CriterionDirection::Oncogenic, CriterionStrength::Strong) => {
                    counts.oncogenic_strong += 1
                }
                (CriterionDirection::Oncogenic, CriterionStrength::Moderate) => {
                    counts.oncogenic_moderate += 1
                }
                (CriterionDirection::Oncogenic, CriterionStrength::Supporting) => {
                    counts.oncogenic_supporting += 1
                }
                (CriterionDirection::Benign, CriterionStrength::VeryStrong) => {
                    counts.benign_very_strong += 1
                }
                (CriterionDirection::Benign, CriterionStrength::Strong) => {
                    counts.benign_strong += 1
                }
                (CriterionDirection::Benign, _) => counts.benign_supporting += 1,
            }
        }
        counts
    }

    pub fn total_met(&self) -> usize {
        self.oncogenic_very_strong
            + self.oncogenic_strong
            + self.oncogenic_moderate
            + self.oncogenic_supporting
            + self.benign_very_strong
            + self.benign_strong
            + self.benign_supporting
    }
}

/// Five-class oncogenicity classification plus its audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class: OncogenicityClass,
    /// Every met criterion, in canonical criterion order.
    pub met_criteria: Vec<CriterionEvidence>,
    pub counts: CriterionCounts,
    /// Overall confidence in [0, 0.99].
    pub confidence: f64,
    /// Deterministic listing of met criteria grouped by direction.
    pub rationale: String,
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Seven ordered clinical-actionability levels; lower = more significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Tier {
    IA,
    IB,
    IIC,
    IID,
    IIE,
    III,
    IV,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::IA  => "Tier IA",
            Tier::IB  => "Tier IB",
            Tier::IIC => "Tier IIC",
            Tier::IID => "Tier IID",
            Tier::IIE => "Tier IIE",
            Tier::III => "Tier III",
            Tier::IV  => "Tier IV",
        }
    }
}

/// Tier assignment for one actionability context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextTierAssignment {
    pub context: ActionabilityContext,
    pub tier: Tier,
    pub strongest_evidence: EvidenceLevel,
    pub score: f64,
    pub confidence: f64,
    pub regulatory_approved: bool,
    pub guideline_included: bool,
    pub cancer_type_specific: bool,
}

// ---------------------------------------------------------------------------
// DSC
// ---------------------------------------------------------------------------

/// Modules that can contribute to the dynamic somatic confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DscModule {
    VafPurityConsistency,
    SomaticPrior,
    GenomicContext,
}

/// Tumor-only somatic-vs-germline confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DscResult {
    /// Probability the variant is somatic, in [0, 1].
    pub score: f64,
    /// Confidence in that probability, in [0, 1].
    pub confidence: f64,
    pub modules_available: Vec<DscModule>,
}

// ---------------------------------------------------------------------------
// Facade output
// ---------------------------------------------------------------------------

/// Everything the engine produces for one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantAssessment {
    pub classification: ClassificationResult,
    /// Zero to three context assignments, in Therapeutic/Diagnostic/Prognostic order.
    pub tier_assignments: Vec<ContextTierAssignment>,
    pub primary_tier: Tier,
    /// Present only for tumor-only analyses.
    pub dsc: Option<DscResult>,
}
