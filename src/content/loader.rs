//! Corpus loading: discovery, parallel parse/build, integrity, facets.
//!
//! The pipeline is linear and runs once per [`ContentLoader::load`]:
//! documents are read and built on a bounded rayon pool, collected in
//! discovery order, and only then handed to the integrity pass.

use crate::content::corpus::Corpus;
use crate::content::integrity::validate_integrity;
use crate::content::module::{Module, build_module};
use crate::content::reference::{Reference, build_reference};
use crate::content::ship::{ShipHub, ShipSource, build_ship_hub, load_ship_specs};
use crate::core::config::{DoctrineConfig, load_config};
use crate::core::error::{ContentError, DoctrineError, LoadFailure};
use crate::core::frontmatter::{FieldMap, parse_document};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// One discovered source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Everything a load needs, already read from storage.
#[derive(Debug, Clone, Default)]
pub struct CorpusSources {
    pub modules: Vec<Document>,
    pub references: Vec<Document>,
    pub ships: ShipSource,
}

/// Recursively find documents with `extension` under `dir`, sorted by the
/// full path string (so `a-b/x` precedes `a/x`). A missing directory yields no
/// documents.
pub fn discover_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DoctrineError> {
    fn recurse(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<(), DoctrineError> {
        for entry in fs::read_dir(dir).map_err(DoctrineError::IoError)? {
            let entry = entry.map_err(DoctrineError::IoError)?;
            let path = entry.path();
            if path.is_dir() {
                recurse(&path, extension, out)?;
            } else if path.is_file() && path.extension().is_some_and(|e| e == extension) {
                out.push(path);
            }
        }
        Ok(())
    }

    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "content directory not found");
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    recurse(dir, extension, &mut out)?;
    out.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(out)
}

/// Read documents in parallel, preserving the input order.
pub fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>, DoctrineError> {
    paths
        .par_iter()
        .map(|path| {
            fs::read_to_string(path)
                .map(|text| Document::new(path.clone(), text))
                .map_err(DoctrineError::IoError)
        })
        .collect()
}

fn build_documents<T, F>(documents: &[Document], build: F) -> (Vec<T>, Vec<ContentError>)
where
    T: Send,
    F: Fn(&FieldMap, &str, &Path) -> Result<T, ContentError> + Sync,
{
    let results: Vec<Result<T, ContentError>> = documents
        .par_iter()
        .map(|doc| {
            let parsed = parse_document(&doc.text, &doc.path)?;
            tracing::debug!(path = %doc.path.display(), fields = parsed.fields.len(), "parsed document");
            build(&parsed.fields, &parsed.body, &doc.path)
        })
        .collect();

    let mut built = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(entity) => built.push(entity),
            Err(err) => errors.push(err),
        }
    }
    (built, errors)
}

fn build_ship_hubs(source: &ShipSource) -> (Vec<ShipHub>, Vec<ContentError>) {
    let mut hubs = Vec::with_capacity(source.specs.len());
    let mut errors = Vec::new();
    for spec in &source.specs {
        match build_ship_hub(spec, &source.path) {
            Ok(hub) => hubs.push(hub),
            Err(err) => errors.push(err),
        }
    }
    (hubs, errors)
}

/// Build and validate a corpus from in-memory sources.
///
/// Each failing document contributes its first error. Integrity checks only
/// run once every document built, and report every violation they find.
pub fn load_corpus(sources: &CorpusSources) -> Result<Corpus, LoadFailure> {
    let ((modules, module_errors), (references, reference_errors)): (
        (Vec<Module>, Vec<ContentError>),
        (Vec<Reference>, Vec<ContentError>),
    ) = rayon::join(
        || build_documents(&sources.modules, build_module),
        || build_documents(&sources.references, build_reference),
    );
    let (ship_hubs, ship_errors) = build_ship_hubs(&sources.ships);

    let document_errors: Vec<ContentError> = module_errors
        .into_iter()
        .chain(reference_errors)
        .chain(ship_errors)
        .collect();
    if !document_errors.is_empty() {
        return Err(LoadFailure::new(document_errors));
    }

    validate_integrity(&modules, &references, &ship_hubs).into_result()?;

    let corpus = Corpus::assemble(modules, references, ship_hubs);
    tracing::info!(
        modules = corpus.list_modules().len(),
        references = corpus.list_references().len(),
        ship_hubs = corpus.list_ship_hubs().len(),
        "content corpus loaded"
    );
    Ok(corpus)
}

/// Result of a load that may have fallen back to an empty corpus.
#[derive(Debug)]
pub struct LoadOutcome {
    pub corpus: Corpus,
    /// Set when the corpus is an empty stand-in for a failed load.
    pub failure: Option<LoadFailure>,
}

impl LoadOutcome {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DoctrineError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DoctrineError::LoadInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Loads one project's content according to its configuration.
#[derive(Debug)]
pub struct ContentLoader {
    project_root: PathBuf,
    config: DoctrineConfig,
    in_progress: AtomicBool,
}

impl ContentLoader {
    pub fn new(project_root: impl Into<PathBuf>, config: DoctrineConfig) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Use `doctrine.toml` from the project root, or defaults.
    pub fn from_project_root(project_root: impl Into<PathBuf>) -> Result<Self, DoctrineError> {
        let project_root = project_root.into();
        let config = load_config(&project_root)?;
        Ok(Self::new(project_root, config))
    }

    pub fn config(&self) -> &DoctrineConfig {
        &self.config
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Discover and read every document and the ship hub file.
    pub fn collect_sources(&self) -> Result<CorpusSources, DoctrineError> {
        let paths = self.config.resolve(&self.project_root);
        let module_paths = discover_documents(&paths.modules_dir, &paths.extension)?;
        let reference_paths = discover_documents(&paths.references_dir, &paths.extension)?;
        tracing::debug!(
            modules = module_paths.len(),
            references = reference_paths.len(),
            "discovered documents"
        );

        Ok(CorpusSources {
            modules: read_documents(&module_paths)?,
            references: read_documents(&reference_paths)?,
            ships: load_ship_specs(&paths.ships_file)?,
        })
    }

    fn run<T: Send>(
        &self,
        job: impl FnOnce() -> Result<T, DoctrineError> + Send,
    ) -> Result<T, DoctrineError> {
        let _guard = InProgress::acquire(&self.in_progress)?;
        match self.config.load.max_workers {
            0 => job(),
            workers => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| DoctrineError::WorkerPool(e.to_string()))?
                .install(job),
        }
    }

    /// Load the full corpus. Any content problem fails the whole load.
    pub fn load(&self) -> Result<Corpus, DoctrineError> {
        self.run(|| {
            let sources = self.collect_sources()?;
            Ok(load_corpus(&sources)?)
        })
    }

    /// Like [`load`](Self::load), but when `allow_empty_on_failure` is set a
    /// content failure yields an empty corpus plus the failure, logged loudly.
    /// I/O and configuration errors are always returned.
    pub fn load_or_empty(&self) -> Result<LoadOutcome, DoctrineError> {
        match self.load() {
            Ok(corpus) => Ok(LoadOutcome {
                corpus,
                failure: None,
            }),
            Err(DoctrineError::Load(failure)) if self.config.load.allow_empty_on_failure => {
                tracing::warn!(
                    errors = failure.len(),
                    "content load failed; continuing with an empty corpus"
                );
                for err in &failure.errors {
                    tracing::error!("{}", err);
                }
                Ok(LoadOutcome {
                    corpus: Corpus::empty(),
                    failure: Some(failure),
                })
            }
            Err(err) => Err(err),
        }
    }
}
