//! Variant-level and gene-level facts evaluated by the criterion evaluators.
//!
//! Every field except the gene symbol is optional in spirit: an absent field
//! makes dependent criteria evaluate to "not met", it never fails a call.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Consequence
// ---------------------------------------------------------------------------

/// Molecular consequence of the variant, SO-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consequence {
    Missense,
    StopGained,
    Frameshift,
    SpliceAcceptor,
    SpliceDonor,
    StartLost,
    StopLost,
    InframeInsertion,
    InframeDeletion,
    Synonymous,
    Other,
}

impl Consequence {
    /// Parse an SO-style consequence term. Unknown terms map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "missense" | "missense_variant"                    => Consequence::Missense,
            "stop_gained" | "nonsense"                         => Consequence::StopGained,
            "frameshift" | "frameshift_variant"                => Consequence::Frameshift,
            "splice_acceptor" | "splice_acceptor_variant"      => Consequence::SpliceAcceptor,
            "splice_donor" | "splice_donor_variant"            => Consequence::SpliceDonor,
            "start_lost"                                       => Consequence::StartLost,
            "stop_lost"                                        => Consequence::StopLost,
            "inframe_insertion"                                => Consequence::InframeInsertion,
            "inframe_deletion"                                 => Consequence::InframeDeletion,
            "synonymous" | "synonymous_variant"                => Consequence::Synonymous,
            _                                                  => Consequence::Other,
        }
    }

    /// Null consequence: predicted to abolish the gene product.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Consequence::StopGained
                | Consequence::Frameshift
                | Consequence::SpliceAcceptor
                | Consequence::SpliceDonor
                | Consequence::StartLost
        )
    }

    /// Truncating subset of the null consequences.
    pub fn is_truncating(&self) -> bool {
        matches!(self, Consequence::StopGained | Consequence::Frameshift)
    }

    /// Changes protein length without abolishing the product.
    pub fn is_length_changing(&self) -> bool {
        matches!(
            self,
            Consequence::InframeInsertion | Consequence::InframeDeletion | Consequence::StopLost
        )
    }
}

// ---------------------------------------------------------------------------
// Gene role
// ---------------------------------------------------------------------------

/// Gene-level role flags consumed by the oncogenicity criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRole {
    #[serde(default)]
    pub oncogene: bool,
    #[serde(default)]
    pub tumor_suppressor: bool,
    /// Whether loss of function is an established oncogenic mechanism.
    /// `None` = unknown; a tumor suppressor with unknown status is treated
    /// as acting through loss of function, `Some(false)` records that the
    /// mechanism is explicitly not established.
    #[serde(default)]
    pub lof_mechanism: Option<bool>,
    /// Missense is a recognized oncogenic mechanism for this gene.
    #[serde(default)]
    pub missense_mechanism: bool,
    /// Gene tolerates benign missense variation.
    #[serde(default)]
    pub benign_missense_tolerant: bool,
}

impl GeneRole {
    pub fn is_cancer_gene(&self) -> bool {
        self.oncogene || self.tumor_suppressor
    }

    /// Loss of function drives oncogenesis in this gene.
    pub fn acts_through_lof(&self) -> bool {
        match self.lof_mechanism {
            Some(established) => established,
            None => self.tumor_suppressor,
        }
    }

    /// Merge flags from a reference table into flags the context already
    /// carries. Context flags win; the table only fills gaps.
    pub fn merged_with(&self, fallback: &GeneRole) -> GeneRole {
        GeneRole {
            oncogene: self.oncogene || fallback.oncogene,
            tumor_suppressor: self.tumor_suppressor || fallback.tumor_suppressor,
            lof_mechanism: self.lof_mechanism.or(fallback.lof_mechanism),
            missense_mechanism: self.missense_mechanism || fallback.missense_mechanism,
            benign_missense_tolerant: self.benign_missense_tolerant
                || fallback.benign_missense_tolerant,
        }
    }
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// One hotspot record for the variant position, from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotObservation {
    pub source: String,
    pub sample_count: u32,
    #[serde(default)]
    pub cancer_types: Vec<String>,
    /// Recurrence significance, when the source publishes one.
    pub q_value: Option<f64>,
}

/// One population allele-frequency record, from one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationFrequency {
    pub database: String,
    pub allele_frequency: f64,
}

/// Computational predictor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionCall {
    Damaging,
    Tolerated,
    Ambiguous,
}

/// One in-silico prediction from one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationalPrediction {
    pub tool: String,
    pub call: PredictionCall,
    pub score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Variant context
// ---------------------------------------------------------------------------

/// The variant/gene facts a single classification call evaluates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantContext {
    /// Gene symbol; the only required field.
    pub gene: String,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    #[serde(default)]
    pub gene_role: GeneRole,
    /// Ordered hotspot observations, strongest source first by convention.
    #[serde(default)]
    pub hotspots: Vec<HotspotObservation>,
    #[serde(default)]
    pub population_frequencies: Vec<PopulationFrequency>,
    #[serde(default)]
    pub predictions: Vec<ComputationalPrediction>,
    /// Gene constraint metric (e.g. missense z-score).
    pub constraint_score: Option<f64>,
    pub tumor_vaf: Option<f64>,
    pub tumor_purity: Option<f64>,
    #[serde(default)]
    pub known_germline_pathogenic: bool,
    /// Variant profile is consistent with a known mutational signature.
    #[serde(default)]
    pub signature_consistent: bool,
    /// Observed in cis with a separately established pathogenic variant.
    #[serde(default)]
    pub in_cis_with_pathogenic: bool,
    /// Splice-effect prediction for synonymous variants; `None` = unscored.
    pub splice_effect_predicted: Option<bool>,
    /// Literal amino-acid-change match against an established oncogenic variant.
    #[serde(default)]
    pub same_aa_change_as_oncogenic: bool,
    /// Cancer type of the case, OncoTree-style name or code.
    pub cancer_type: Option<String>,
}

impl VariantContext {
    /// Minimal context carrying only the required gene symbol.
    pub fn for_gene(gene: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            consequences: vec![],
            gene_role: GeneRole::default(),
            hotspots: vec![],
            population_frequencies: vec![],
            predictions: vec![],
            constraint_score: None,
            tumor_vaf: None,
            tumor_purity: None,
            known_germline_pathogenic: false,
            signature_consistent: false,
            in_cis_with_pathogenic: false,
            splice_effect_predicted: None,
            same_aa_change_as_oncogenic: false,
            cancer_type: None,
        }
    }

    pub fn has_consequence(&self, c: Consequence) -> bool {
        self.consequences.contains(&c)
    }

    /// Highest allele frequency across population databases.
    pub fn max_allele_frequency(&self) -> Option<f64> {
        self.population_frequencies
            .iter()
            .map(|p| p.allele_frequency)
            .fold(None, |acc, f| Some(acc.map_or(f, |a: f64| a.max(f))))
    }

    /// Largest hotspot sample count across sources.
    pub fn max_hotspot_samples(&self) -> u32 {
        self.hotspots.iter().map(|h| h.sample_count).max().unwrap_or(0)
    }

    /// Smallest published hotspot q-value across sources.
    pub fn min_hotspot_q_value(&self) -> Option<f64> {
        self.hotspots
            .iter()
            .filter_map(|h| h.q_value)
            .fold(None, |acc, q| Some(acc.map_or(q, |a: f64| a.min(q))))
    }

    /// Any hotspot record present at all.
    pub fn has_hotspot_evidence(&self) -> bool {
        !self.hotspots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consequence_classes() {
        assert!(Consequence::StopGained.is_null());
        assert!(Consequence::Frameshift.is_truncating());
        assert!(Consequence::InframeDeletion.is_length_changing());
        assert!(!Consequence::Missense.is_null());
        assert_eq!(Consequence::parse("missense_variant"), Consequence::Missense);
        assert_eq!(Consequence::parse("weird_term"), Consequence::Other);
    }

    #[test]
    fn test_max_allele_frequency() {
        let mut ctx = VariantContext::for_gene("KRAS");
        assert_eq!(ctx.max_allele_frequency(), None);

        ctx.population_frequencies = vec![
            PopulationFrequency { database: "gnomad".into(), allele_frequency: 0.0002 },
            PopulationFrequency { database: "exac".into(), allele_frequency: 0.004 },
        ];
        assert!((ctx.max_allele_frequency().unwrap() - 0.004).abs() < 1e-12);
    }

    #[test]
    fn test_role_merge_prefers_either_flag() {
        let ctx_role = GeneRole { oncogene: true, ..Default::default() };
        let table_role =
            GeneRole { tumor_suppressor: true, lof_mechanism: Some(true), ..Default::default() };
        let merged = ctx_role.merged_with(&table_role);
        assert!(merged.oncogene && merged.tumor_suppressor);
        assert_eq!(merged.lof_mechanism, Some(true));
    }

    #[test]
    fn test_tumor_suppressor_defaults_to_lof_mechanism() {
        let tsg = GeneRole { tumor_suppressor: true, ..Default::default() };
        assert!(tsg.acts_through_lof());

        let disproven =
            GeneRole { tumor_suppressor: true, lof_mechanism: Some(false), ..Default::default() };
        assert!(!disproven.acts_through_lof());

        let oncogene = GeneRole { oncogene: true, ..Default::default() };
        assert!(!oncogene.acts_through_lof());
    }
}
