//! oncograde-common — Shared value types, errors, and configuration used
//! across all Oncograde crates.

pub mod classification;
pub mod confidence;
pub mod engine_config;
pub mod error;
pub mod evidence;
pub mod tables;
pub mod variant;

// Re-export commonly used types
pub use engine_config::{AnalysisType, EngineConfig};
pub use error::{OncogradeError, Result};
pub use evidence::{ActionabilityContext, EvidenceLevel, EvidenceRecord, GuidelineTag};
pub use variant::{Consequence, GeneRole, VariantContext};
