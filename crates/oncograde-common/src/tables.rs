//! Reference knowledge tables injected at engine construction.
//!
//! Loaded once into read-only structures and shared by reference across
//! calls; nothing is written after load, so classification stays lock-free.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::variant::GeneRole;

/// Immutable gene-role lookup backing the criterion evaluators when the
/// variant context omits role flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceTables {
    #[serde(default)]
    pub gene_roles: HashMap<String, GeneRole>,
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gene-role entry. Symbols are matched case-insensitively.
    pub fn with_gene_role(mut self, symbol: &str, role: GeneRole) -> Self {
        self.gene_roles.insert(symbol.to_uppercase(), role);
        self
    }

    pub fn gene_role(&self, symbol: &str) -> Option<&GeneRole> {
        self.gene_roles.get(&symbol.to_uppercase())
    }
}
