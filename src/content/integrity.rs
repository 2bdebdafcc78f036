//! Corpus-wide integrity checks: uniqueness and referential closure.
//!
//! Every check runs to completion and pushes into a shared [`IntegrityReport`],
//! so one pass surfaces the full list of broken links.

use crate::content::module::Module;
use crate::content::reference::{RefKey, RefType, Reference};
use crate::content::ship::ShipHub;
use crate::core::error::{ContentError, EntityKind, LoadFailure};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

#[derive(Debug, Default)]
pub struct IntegrityReport {
    errors: Vec<ContentError>,
}

impl IntegrityReport {
    fn push(&mut self, error: ContentError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ContentError] {
        &self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), LoadFailure> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(LoadFailure::new(self.errors))
        }
    }
}

fn check_unique<'a, K>(
    kind: EntityKind,
    entries: impl Iterator<Item = (K, &'a Path)>,
    report: &mut IntegrityReport,
) where
    K: std::hash::Hash + Eq + ToString,
{
    let mut seen: FxHashMap<K, &Path> = FxHashMap::default();
    for (key, path) in entries {
        if let Some(first) = seen.get(&key) {
            report.push(ContentError::DuplicateId {
                kind,
                key: key.to_string(),
                first: first.to_path_buf(),
                second: path.to_path_buf(),
            });
        } else {
            seen.insert(key, path);
        }
    }
}

fn unknown(
    source_kind: EntityKind,
    source_id: &str,
    target_kind: EntityKind,
    missing_id: String,
) -> ContentError {
    ContentError::UnknownReference {
        source_kind,
        source_id: source_id.to_string(),
        target_kind,
        missing_id,
    }
}

fn check_module_links(
    modules: &[Module],
    module_ids: &FxHashSet<&str>,
    reference_keys: &FxHashSet<RefKey>,
    report: &mut IntegrityReport,
) {
    for module in modules {
        for related in &module.related_module_ids {
            if !module_ids.contains(related.as_str()) {
                report.push(unknown(
                    EntityKind::Module,
                    &module.id,
                    EntityKind::Module,
                    related.clone(),
                ));
            }
        }
        for map_id in &module.maps {
            let key = RefKey::new(RefType::Map, map_id.clone());
            if !reference_keys.contains(&key) {
                report.push(unknown(
                    EntityKind::Module,
                    &module.id,
                    EntityKind::Reference,
                    key.to_string(),
                ));
            }
        }
    }
}

fn check_ship_links(
    ship_hubs: &[ShipHub],
    module_ids: &FxHashSet<&str>,
    reference_keys: &FxHashSet<RefKey>,
    report: &mut IntegrityReport,
) {
    for hub in ship_hubs {
        for module_id in &hub.recommended_module_ids {
            if !module_ids.contains(module_id.as_str()) {
                report.push(unknown(
                    EntityKind::Ship,
                    &hub.slug,
                    EntityKind::Module,
                    module_id.clone(),
                ));
            }
        }
        for (raw, key) in hub.reference_keys() {
            if !key.is_some_and(|key| reference_keys.contains(&key)) {
                report.push(unknown(
                    EntityKind::Ship,
                    &hub.slug,
                    EntityKind::Reference,
                    raw.to_string(),
                ));
            }
        }
    }
}

/// Run every integrity check over complete collections.
pub fn validate_integrity(
    modules: &[Module],
    references: &[Reference],
    ship_hubs: &[ShipHub],
) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    check_unique(
        EntityKind::Module,
        modules.iter().map(|m| (m.id.as_str(), m.path.as_path())),
        &mut report,
    );
    check_unique(
        EntityKind::Reference,
        references.iter().map(|r| (r.key(), r.path.as_path())),
        &mut report,
    );
    check_unique(
        EntityKind::Ship,
        ship_hubs.iter().map(|s| (s.slug.as_str(), s.source.as_path())),
        &mut report,
    );

    let module_ids: FxHashSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();
    let reference_keys: FxHashSet<RefKey> = references.iter().map(Reference::key).collect();

    check_module_links(modules, &module_ids, &reference_keys, &mut report);
    check_ship_links(ship_hubs, &module_ids, &reference_keys, &mut report);

    report
}
