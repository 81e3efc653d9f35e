//! Reverse index from alternative names to the packages offering them.
//!
//! A dependency is often declared on a name no installed package carries
//! literally: a virtual capability (`mail-transport-agent`) or a
//! superseded name some newer package now replaces. Both `Provides` and
//! `Replaces` declarations feed one index — the graph builder only needs
//! a fallback lookup, not a semantic distinction between the two.

use std::collections::{BTreeSet, HashMap};

use debdu_core::Catalog;

/// Map from an alternative name to the real package names declaring it
/// in `Replaces` or `Provides`.
///
/// When several packages offer the same name, the set's iteration order
/// is arbitrary but stable within one run; callers must not depend on
/// which provider comes first.
#[derive(Debug, Default)]
pub struct AliasIndex {
    providers: HashMap<String, BTreeSet<String>>,
}

impl AliasIndex {
    /// Build the index from every record's `replaces` and `provides`
    /// declarations.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut providers: HashMap<String, BTreeSet<String>> = HashMap::new();
        for record in catalog.values() {
            for alias in record.replaces.iter().chain(&record.provides) {
                providers
                    .entry(alias.clone())
                    .or_default()
                    .insert(record.name.clone());
            }
        }
        Self { providers }
    }

    /// Real package names offering `alias`, if any declared it.
    #[must_use]
    pub fn providers_of(&self, alias: &str) -> Option<&BTreeSet<String>> {
        self.providers.get(alias)
    }

    /// Number of distinct alternative names known to the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no record declared any alternative name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
