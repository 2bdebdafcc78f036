use doctrine::content::reference::RefType;
use doctrine::content::{ContentLoader, CorpusSources, Document, load_corpus};
use doctrine::core::config::{DoctrineConfig, parse_config};
use doctrine::core::error::{ContentError, DoctrineError, EntityKind, IncludeDimension};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::{TempDir, tempdir};

fn module_doc(id: &str, extra: &str) -> String {
    format!(
        r#"---
id: {id}
title: Module {id}
type: module
status: review
moduleType: manning
owner: gunnery-lead
intent: Put rounds on the power plant
lastValidated: 2026-03-02
tags: ["gunnery"]
useWhen: ["Target shields are down"]
steps: ["Call the component", "Hold fire discipline"]
failureModes: ["Split fire"]
validation: ["Component destroyed"]
{extra}
---
Procedure body for {id}.
"#
    )
}

fn reference_doc(id: &str, ref_type: &str) -> String {
    format!(
        "---\nid: {id}\ntitle: {id}\ntype: reference\nstatus: draft\nrefType: {ref_type}\nlastUpdated: 2026-03-01\ntags: [\"nav\"]\n---\n"
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn project() -> TempDir {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    write(
        root,
        "content/modules/a.mdx",
        &module_doc(
            "a",
            "ships: [\"perseus\"]\nroles: [\"gunner\"]\nmaps: [\"stanton-orbit-lanes\"]\nrelatedModuleIds: [\"b\"]",
        ),
    );
    write(
        root,
        "content/modules/recovery/b.mdx",
        &module_doc("b", "ships: [\"perseus\", \"polaris\"]\nrelatedModuleIds: []"),
    );
    write(root, "content/modules/c.mdx", &module_doc("c", "enemies: [\"idris\"]"));
    write(root, "content/modules/notes.txt", "not a document");
    write(
        root,
        "content/refs/maps/stanton-orbit-lanes.mdx",
        &reference_doc("stanton-orbit-lanes", "map"),
    );
    write(
        root,
        "content/refs/diagrams/perseus-component-priority.mdx",
        &reference_doc("perseus-component-priority", "diagram"),
    );
    write(
        root,
        "content/ships.toml",
        r#"
[[ship]]
slug = "perseus"
name = "RSI Perseus"
career = "combat"
role = "Heavy Gunship"
imageSrc = "/images/perseus.png"
primaryRoles = ["pilot", "gunner", "engineer"]
primaryRoleFlow = ["Pilot maintains the aft pressure window."]
commonFailureModes = ["Crew commits before target state is verified."]
recommendedModuleIds = ["a", "c"]
referenceIds = ["diagram/perseus-component-priority", "map/stanton-orbit-lanes"]
"#,
    );
    tmp
}

fn loader(root: &Path) -> ContentLoader {
    ContentLoader::from_project_root(root).expect("loader")
}

#[test]
fn loads_project_from_disk() {
    let tmp = project();
    let corpus = loader(tmp.path()).load().expect("load");

    let ids: Vec<_> = corpus.list_modules().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c", "b"], "discovery order is lexicographic by path");

    let a = corpus.get_module("a").expect("module a");
    assert_eq!(a.related_module_ids, vec!["b"]);
    assert!(corpus.get_module("b").is_some());
    assert_eq!(a.body, "Procedure body for a.\n");

    assert!(corpus.get_reference(RefType::Map, "stanton-orbit-lanes").is_some());
    assert!(corpus.get_reference(RefType::Diagram, "stanton-orbit-lanes").is_none());
    assert_eq!(corpus.list_references().len(), 2);

    let hub = corpus.get_ship_hub("perseus").expect("perseus hub");
    let recommended: Vec<_> = corpus.recommended_modules(hub).map(|m| m.id.as_str()).collect();
    assert_eq!(recommended, vec!["a", "c"]);

    let facets = corpus.facets();
    assert_eq!(facets.ships, vec!["perseus", "polaris"]);
    assert_eq!(facets.roles, vec!["gunner"]);
    assert_eq!(facets.enemies, vec!["idris"]);
    assert_eq!(facets.maps, vec!["stanton-orbit-lanes"]);
    assert_eq!(facets.statuses, vec!["review"]);
    assert_eq!(facets.types, vec!["manning"]);
}

#[test]
fn loading_twice_is_identical() {
    let tmp = project();
    let first = loader(tmp.path()).load().expect("first");
    let second = loader(tmp.path()).load().expect("second");
    assert_eq!(first.list_modules(), second.list_modules());
    assert_eq!(first.list_references(), second.list_references());
    assert_eq!(first.facets(), second.facets());
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn removing_a_related_module_fails_the_load() {
    let tmp = project();
    fs::remove_file(tmp.path().join("content/modules/recovery/b.mdx")).expect("remove");

    let err = loader(tmp.path()).load().unwrap_err();
    let DoctrineError::Load(failure) = err else {
        panic!("expected a content failure, got {err:?}");
    };
    assert_eq!(
        failure.errors,
        vec![ContentError::UnknownReference {
            source_kind: EntityKind::Module,
            source_id: "a".into(),
            target_kind: EntityKind::Module,
            missing_id: "b".into(),
        }]
    );
}

#[test]
fn integrity_problems_are_reported_together() {
    let tmp = project();
    let root = tmp.path();
    fs::remove_file(root.join("content/refs/maps/stanton-orbit-lanes.mdx")).expect("remove");
    write(root, "content/modules/extra/c.mdx", &module_doc("c", ""));

    let Err(DoctrineError::Load(failure)) = loader(root).load() else {
        panic!("expected a content failure");
    };
    assert_eq!(failure.len(), 3, "{failure}");
    assert!(matches!(
        &failure.errors[0],
        ContentError::DuplicateId { kind: EntityKind::Module, key, .. } if key == "c"
    ));
    assert!(matches!(
        &failure.errors[1],
        ContentError::UnknownReference { source_kind: EntityKind::Module, missing_id, .. }
            if missing_id == "map/stanton-orbit-lanes"
    ));
    assert!(matches!(
        &failure.errors[2],
        ContentError::UnknownReference { source_kind: EntityKind::Ship, source_id, .. }
            if source_id == "perseus"
    ));
}

#[test]
fn conflicting_include_exclude_fails() {
    let tmp = project();
    write(
        tmp.path(),
        "content/modules/d.mdx",
        &module_doc("d", "ships: [\"perseus\"]\nexcludeShips: [\"perseus\"]"),
    );
    let Err(DoctrineError::Load(failure)) = loader(tmp.path()).load() else {
        panic!("expected a content failure");
    };
    assert!(matches!(
        &failure.errors[0],
        ContentError::ConflictingIncludeExclude { dimension: IncludeDimension::Ship, value, .. }
            if value == "perseus"
    ));
}

#[test]
fn filename_mismatch_fails() {
    let tmp = project();
    write(tmp.path(), "content/modules/foo.mdx", &module_doc("bar", ""));
    let Err(DoctrineError::Load(failure)) = loader(tmp.path()).load() else {
        panic!("expected a content failure");
    };
    assert_eq!(failure.len(), 1);
    assert!(matches!(
        &failure.errors[0],
        ContentError::IdFilenameMismatch { id, expected, .. } if id == "bar" && expected == "foo"
    ));
}

#[test]
fn lenient_mode_substitutes_empty_corpus_but_keeps_failure() {
    let tmp = project();
    write(tmp.path(), "content/modules/broken.mdx", "no frontmatter here");

    let strict = loader(tmp.path());
    assert!(matches!(strict.load_or_empty(), Err(DoctrineError::Load(_))));

    let mut config = DoctrineConfig::default();
    config.load.allow_empty_on_failure = true;
    let lenient = ContentLoader::new(tmp.path(), config);
    let outcome = lenient.load_or_empty().expect("lenient load");
    assert!(outcome.is_degraded());
    assert!(outcome.corpus.is_empty());
    assert!(matches!(
        outcome.failure.as_ref().map(|f| &f.errors[0]),
        Some(ContentError::MissingFrontmatter { .. })
    ));
}

#[test]
fn custom_layout_and_bounded_workers() {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();
    write(
        root,
        "doctrine.toml",
        "[content]\nroot = \"docs\"\nmodules_dir = \"procedures\"\nextension = \"md\"\n\n[load]\nmax_workers = 2\n",
    );
    write(root, "docs/procedures/a.md", &module_doc("a", ""));
    write(root, "docs/procedures/ignored.mdx", &module_doc("ignored", ""));

    let loader = loader(root);
    assert_eq!(loader.config().load.max_workers, 2);
    let corpus = loader.load().expect("load");
    assert_eq!(corpus.list_modules().len(), 1);
    assert!(corpus.list_ship_hubs().is_empty());
}

#[test]
fn missing_content_directories_load_empty() {
    let tmp = tempdir().expect("tempdir");
    let corpus = loader(tmp.path()).load().expect("load");
    assert!(corpus.is_empty());
}

#[test]
fn invalid_config_is_reported() {
    assert!(matches!(
        parse_config("[load]\nmax_workers = \"many\"\n"),
        Err(DoctrineError::ConfigError(_))
    ));
}

#[test]
fn in_memory_sources_need_no_filesystem() {
    let sources = CorpusSources {
        modules: vec![
            Document::new("a.mdx", module_doc("a", "relatedModuleIds: [\"b\"]")),
            Document::new("b.mdx", module_doc("b", "")),
        ],
        references: vec![Document::new("lanes.mdx", reference_doc("lanes", "map"))],
        ..Default::default()
    };
    let corpus = load_corpus(&sources).expect("load");
    assert_eq!(corpus.list_modules().len(), 2);
    assert_eq!(corpus.get_reference(RefType::Map, "lanes").map(|r| r.tags.clone()), Some(vec!["nav".to_string()]));
}

#[test]
fn corpus_is_shared_across_readers() {
    let tmp = project();
    let corpus = Arc::new(loader(tmp.path()).load().expect("load"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let corpus = Arc::clone(&corpus);
            thread::spawn(move || corpus.get_module("a").map(|m| m.title.clone()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("join"), Some("Module a".to_string()));
    }
}

#[test]
fn independent_loaders_run_in_parallel() {
    let a = project();
    let b = project();
    let (ra, rb) = thread::scope(|s| {
        let ha = s.spawn(|| loader(a.path()).load());
        let hb = s.spawn(|| loader(b.path()).load());
        (ha.join().expect("join a"), hb.join().expect("join b"))
    });
    assert_eq!(
        ra.expect("load a").fingerprint(),
        rb.expect("load b").fingerprint()
    );
}

#[test]
fn bundled_content_validates() {
    let corpus = loader(Path::new(env!("CARGO_MANIFEST_DIR")))
        .load()
        .expect("bundled content");
    assert_eq!(corpus.list_modules().len(), 3);
    assert_eq!(corpus.list_references().len(), 3);
    let perseus = corpus.get_ship_hub("perseus").expect("perseus hub");
    assert_eq!(perseus.operational_links.len(), 1);
    assert_eq!(corpus.recommended_modules(perseus).count(), 3);
}
