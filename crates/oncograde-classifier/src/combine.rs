//! Combination rules: met criteria → five-class classification.
//!
//! The table is an ordered early-return cascade; the first matching rule
//! wins. Rule order encodes the conflict override (very-strong oncogenic
//! against strong benign) ahead of every accumulation rule.

use oncograde_common::classification::{
    CriterionCounts, CriterionDirection, CriterionEvidence, OncogenicityClass,
};

/// Apply the fixed-precedence combination-rule table.
pub fn apply_rules(counts: &CriterionCounts) -> OncogenicityClass {
    let ovs = counts.oncogenic_very_strong;
    let os = counts.oncogenic_strong;
    let om = counts.oncogenic_moderate;
    let op = counts.oncogenic_supporting;
    let bvs = counts.benign_very_strong;
    let bs = counts.benign_strong;
    let bp = counts.benign_supporting;

    // Explicit conflict override: very-strong oncogenic against strong benign.
    if ovs >= 1 && bs >= 1 {
        return OncogenicityClass::UncertainSignificance;
    }
    if ovs >= 1 {
        return OncogenicityClass::Oncogenic;
    }
    if os >= 2 && bs == 0 {
        return OncogenicityClass::Oncogenic;
    }
    if os == 1 && om >= 2 {
        return OncogenicityClass::Oncogenic;
    }
    if os == 1 && om == 1 && op >= 2 {
        return OncogenicityClass::Oncogenic;
    }
    if os == 1 && om == 1 {
        return OncogenicityClass::LikelyOncogenic;
    }
    if os == 1 && op >= 2 {
        return OncogenicityClass::LikelyOncogenic;
    }
    if om >= 3 {
        return OncogenicityClass::LikelyOncogenic;
    }
    if om == 2 && op >= 2 {
        return OncogenicityClass::LikelyOncogenic;
    }
    if bvs >= 1 {
        return OncogenicityClass::Benign;
    }
    if bs >= 2 {
        return OncogenicityClass::Benign;
    }
    if bs == 1 && bp >= 1 {
        return OncogenicityClass::LikelyBenign;
    }
    if bp >= 2 {
        return OncogenicityClass::LikelyBenign;
    }
    OncogenicityClass::UncertainSignificance
}

/// Deterministic rationale: met criteria listed by direction, then the
/// resulting class. No free text, no randomness.
pub fn rationale(class: OncogenicityClass, met: &[CriterionEvidence]) -> String {
    let list = |direction: CriterionDirection| -> String {
        let names: Vec<&str> = met
            .iter()
            .filter(|c| c.met && c.id.direction() == direction)
            .map(|c| c.id.as_str())
            .collect();
        if names.is_empty() { "none".to_string() } else { names.join(", ") }
    };

    format!(
        "Oncogenic criteria met: {}. Benign criteria met: {}. Classification: {}.",
        list(CriterionDirection::Oncogenic),
        list(CriterionDirection::Benign),
        class.as_str(),
    )
}
