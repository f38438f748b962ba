//! Confidence arithmetic shared by the classifier and the DSC estimator.

use crate::classification::CriterionEvidence;

/// Aggregate confidence from multiple independent citations using the
/// noisy-OR model: p = 1 - Π(1 - p_i).
pub fn aggregate_confidence(confidences: &[f64]) -> f64 {
    if confidences.is_empty() {
        return 0.0;
    }
    let product: f64 = confidences.iter().map(|&p| 1.0 - p.clamp(0.0, 1.0)).product();
    1.0 - product
}

/// Strength-weighted average of met-criterion confidences, plus an
/// evidence-multiplicity bonus of +0.05 per met criterion beyond the first
/// (capped at +0.2). Result is clamped to [0, 0.99].
pub fn classification_confidence(met: &[CriterionEvidence]) -> f64 {
    let met: Vec<&CriterionEvidence> = met.iter().filter(|c| c.met).collect();
    if met.is_empty() {
        return 0.0;
    }

    let weight_sum: f64 = met.iter().map(|c| c.strength.confidence_weight()).sum();
    let weighted: f64 = met
        .iter()
        .map(|c| c.strength.confidence_weight() * c.confidence)
        .sum();
    let base = if weight_sum > 0.0 { weighted / weight_sum } else { 0.0 };

    let bonus = (0.05 * (met.len().saturating_sub(1)) as f64).min(0.2);
    (base + bonus).clamp(0.0, 0.99)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::CriterionId;

    #[test]
    fn test_aggregate_noisy_or() {
        // Two independent citations at 0.7 each: 1 - 0.3 * 0.3 = 0.91
        let agg = aggregate_confidence(&[0.7, 0.7]);
        assert!((agg - 0.91).abs() < 1e-9);
        assert_eq!(aggregate_confidence(&[]), 0.0);
    }

    #[test]
    fn test_classification_confidence_empty() {
        assert_eq!(classification_confidence(&[]), 0.0);
        assert_eq!(
            classification_confidence(&[CriterionEvidence::not_met(CriterionId::OVS1)]),
            0.0
        );
    }

    #[test]
    fn test_classification_confidence_weighted() {
        // One very-strong at 0.9: base 0.9, no bonus.
        let single = vec![CriterionEvidence::met(CriterionId::OVS1, 0.9)];
        assert!((classification_confidence(&single) - 0.9).abs() < 1e-9);

        // Adding a supporting criterion shifts the average and adds +0.05.
        let pair = vec![
            CriterionEvidence::met(CriterionId::OVS1, 0.9),
            CriterionEvidence::met(CriterionId::OP4, 0.5),
        ];
        let expected = (1.0 * 0.9 + 0.3 * 0.5) / 1.3 + 0.05;
        assert!((classification_confidence(&pair) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_never_reaches_one() {
        let many: Vec<CriterionEvidence> = [
            CriterionId::OVS1,
            CriterionId::OS1,
            CriterionId::OS2,
            CriterionId::OS3,
            CriterionId::OM1,
            CriterionId::OM2,
        ]
        .iter()
        .map(|&id| CriterionEvidence::met(id, 1.0))
        .collect();
        let c = classification_confidence(&many);
        assert!(c <= 0.99);
    }
}
