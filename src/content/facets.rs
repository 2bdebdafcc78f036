//! Filter facets derived from the module collection.

use crate::content::module::Module;
use crate::core::fields::ContentEnum;
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct values per filterable dimension, each sorted by ordinal string
/// comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterFacets {
    pub ships: Vec<String>,
    pub roles: Vec<String>,
    pub enemies: Vec<String>,
    pub maps: Vec<String>,
    pub statuses: Vec<String>,
    pub types: Vec<String>,
}

impl FilterFacets {
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
            && self.roles.is_empty()
            && self.enemies.is_empty()
            && self.maps.is_empty()
            && self.statuses.is_empty()
            && self.types.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn derive_facets(modules: &[Module]) -> FilterFacets {
    FilterFacets {
        ships: distinct(modules.iter().flat_map(|m| m.ships.iter().map(String::as_str))),
        roles: distinct(modules.iter().flat_map(|m| m.roles.iter().map(String::as_str))),
        enemies: distinct(modules.iter().flat_map(|m| m.enemies.iter().map(String::as_str))),
        maps: distinct(modules.iter().flat_map(|m| m.maps.iter().map(String::as_str))),
        statuses: distinct(modules.iter().map(|m| m.status.as_str())),
        types: distinct(modules.iter().map(|m| m.module_type.as_str())),
    }
}
