//! The validated, immutable content aggregate.

use crate::content::facets::{FilterFacets, derive_facets};
use crate::content::module::Module;
use crate::content::query::ModuleQuery;
use crate::content::reference::{RefKey, RefType, Reference};
use crate::content::ship::ShipHub;
use rustc_hash::FxHashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// All modules, references, and ship hubs of one successful load.
///
/// Only constructed from collections that already passed integrity
/// validation; nothing is mutated afterwards, so a `Corpus` can be shared
/// freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    modules: Vec<Module>,
    references: Vec<Reference>,
    ship_hubs: Vec<ShipHub>,
    module_index: FxHashMap<String, usize>,
    reference_index: FxHashMap<RefKey, usize>,
    ship_index: FxHashMap<String, usize>,
    facets: FilterFacets,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CorpusView<'a> {
    modules: &'a [Module],
    references: &'a [Reference],
    ship_hubs: &'a [ShipHub],
    facets: &'a FilterFacets,
}

impl Corpus {
    pub(crate) fn assemble(
        modules: Vec<Module>,
        references: Vec<Reference>,
        ship_hubs: Vec<ShipHub>,
    ) -> Self {
        let module_index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let reference_index = references
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key(), i))
            .collect();
        let ship_index = ship_hubs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.slug.clone(), i))
            .collect();
        let facets = derive_facets(&modules);

        Self {
            modules,
            references,
            ship_hubs,
            module_index,
            reference_index,
            ship_index,
            facets,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.references.is_empty() && self.ship_hubs.is_empty()
    }

    pub fn get_module(&self, id: &str) -> Option<&Module> {
        self.module_index.get(id).map(|&i| &self.modules[i])
    }

    pub fn get_reference(&self, ref_type: RefType, id: &str) -> Option<&Reference> {
        self.get_reference_by_key(&RefKey::new(ref_type, id))
    }

    pub fn get_reference_by_key(&self, key: &RefKey) -> Option<&Reference> {
        self.reference_index.get(key).map(|&i| &self.references[i])
    }

    pub fn get_ship_hub(&self, slug: &str) -> Option<&ShipHub> {
        self.ship_index.get(slug).map(|&i| &self.ship_hubs[i])
    }

    /// Modules in discovery order (lexicographic by path).
    pub fn list_modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn list_references(&self) -> &[Reference] {
        &self.references
    }

    pub fn list_ship_hubs(&self) -> &[ShipHub] {
        &self.ship_hubs
    }

    pub fn facets(&self) -> &FilterFacets {
        &self.facets
    }

    pub fn filter_modules<'a>(&'a self, query: &'a ModuleQuery) -> impl Iterator<Item = &'a Module> {
        self.modules.iter().filter(move |m| query.matches(m))
    }

    /// Modules recommended by a ship hub, in the hub's order.
    pub fn recommended_modules<'a>(&'a self, hub: &'a ShipHub) -> impl Iterator<Item = &'a Module> {
        hub.recommended_module_ids
            .iter()
            .filter_map(move |id| self.get_module(id))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.view()).unwrap_or_default()
    }

    fn view(&self) -> CorpusView<'_> {
        CorpusView {
            modules: &self.modules,
            references: &self.references,
            ship_hubs: &self.ship_hubs,
            facets: &self.facets,
        }
    }

    /// SHA-256 over every entity field, document body, and facet. Two loads of
    /// the same documents produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        if let Ok(bytes) = serde_json::to_vec(&self.view()) {
            hasher.update(&bytes);
        }
        for body in self
            .modules
            .iter()
            .map(|m| &m.body)
            .chain(self.references.iter().map(|r| &r.body))
        {
            hasher.update((body.len() as u64).to_le_bytes());
            hasher.update(body.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}
