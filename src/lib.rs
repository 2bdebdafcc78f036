//! Doctrine: a content-graph loader and validator.
//!
//! Doctrine reads a corpus of hand-authored documents (procedure **modules**
//! and **references** such as keybind tables, maps, and diagrams), each with a
//! small frontmatter header, plus curated **ship hubs** from static
//! configuration. It builds typed entities, enforces cross-entity invariants,
//! and exposes the result as one immutable [`content::Corpus`].
//!
//! # Pipeline
//!
//! 1. Discover documents per kind (sorted by path).
//! 2. Parse frontmatter and coerce values ([`core::frontmatter`], [`core::value`]).
//! 3. Build entities with per-field contracts ([`content::module`],
//!    [`content::reference`], [`content::ship`]).
//! 4. Check uniqueness and referential closure over the complete collections
//!    ([`content::integrity`]), collecting every violation.
//! 5. Derive filter facets ([`content::facets`]).
//!
//! A load either yields a fully valid corpus or a [`core::error::LoadFailure`]
//! listing every problem found; there is no partially populated corpus.
//!
//! # Examples
//!
//! ```bash
//! # Validate the content under ./content
//! doctrine validate
//!
//! # Machine-readable report
//! doctrine validate --format json
//!
//! # Modules usable on the Perseus by a gunner
//! doctrine modules --ship perseus --role gunner
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: errors, parsing, field contracts, configuration, logging, output
//! - [`content`]: entities, loader, integrity validator, facets, queries

pub mod content;
pub mod core;

use crate::content::reference::RefType;
use crate::content::{ContentLoader, LoadOutcome};
use crate::core::error::DoctrineError;
use crate::core::fields::ContentEnum;
use crate::core::{logging, output};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "doctrine",
    version = env!("CARGO_PKG_VERSION"),
    about = "Load, validate, and query doctrine content"
)]
struct Cli {
    /// Project root holding doctrine.toml and the content directory (defaults to cwd).
    #[clap(long, global = true)]
    root: Option<PathBuf>,
    /// Debug-level logging (overridden by DOCTRINE_LOG).
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args, Debug)]
struct ValidateCli {
    /// Output format: 'text' or 'json'.
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct ModulesCli {
    #[clap(long)]
    ship: Option<String>,
    #[clap(long)]
    role: Option<String>,
    #[clap(long)]
    enemy: Option<String>,
    #[clap(long)]
    map: Option<String>,
    #[clap(long)]
    status: Option<String>,
    /// Module type: flying, manning, facing, recovery.
    #[clap(long = "type")]
    module_type: Option<String>,
    /// Tag to match.
    #[clap(long)]
    domain: Option<String>,
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum ShowCommand {
    /// A module by id.
    Module { id: String },
    /// A reference by type and id.
    Reference { ref_type: String, id: String },
    /// A ship hub by slug.
    Ship { slug: String },
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the corpus and report every content problem
    #[clap(name = "validate", visible_alias = "v")]
    Validate(ValidateCli),

    /// Print filter facets as JSON
    #[clap(name = "facets")]
    Facets,

    /// List modules, optionally filtered
    #[clap(name = "modules", visible_alias = "m")]
    Modules(ModulesCli),

    /// Print one entity as JSON
    #[clap(name = "show")]
    Show {
        #[clap(subcommand)]
        command: ShowCommand,
    },

    /// Show version information
    #[clap(name = "version")]
    Version,
}

fn print_json(value: &impl serde::Serialize) -> Result<(), DoctrineError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| DoctrineError::ConfigError(format!("failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

/// Load for the query commands. A strict failure is listed on stderr before it
/// is returned; a lenient one is summarised as a warning.
fn load_for_query(loader: &ContentLoader) -> Result<LoadOutcome, DoctrineError> {
    let outcome = loader.load_or_empty().inspect_err(|err| {
        if let DoctrineError::Load(failure) = err {
            eprintln!(
                "{} content failed to load with {} error(s)",
                "✗".bright_red(),
                failure.len()
            );
            for line in output::failure_lines(failure, 240) {
                eprintln!("{}", line);
            }
        }
    })?;

    if let Some(failure) = &outcome.failure {
        eprintln!(
            "{} content failed to load ({} error(s)); showing an empty corpus: {}",
            "⚠".bright_yellow(),
            failure.len(),
            output::failure_summary(failure, 2, 110)
        );
    }
    Ok(outcome)
}

fn run_validate(loader: &ContentLoader, format: OutputFormat) -> Result<(), DoctrineError> {
    match loader.load() {
        Ok(corpus) => {
            let fingerprint = corpus.fingerprint();
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "status": "ok",
                    "modules": corpus.list_modules().len(),
                    "references": corpus.list_references().len(),
                    "shipHubs": corpus.list_ship_hubs().len(),
                    "fingerprint": fingerprint,
                }))?,
                OutputFormat::Text => {
                    println!(
                        "{} validate: ok modules={} references={} ship_hubs={}",
                        "✓".bright_green(),
                        corpus.list_modules().len(),
                        corpus.list_references().len(),
                        corpus.list_ship_hubs().len()
                    );
                    println!("validate: fingerprint {}", fingerprint);
                }
            }
            Ok(())
        }
        Err(DoctrineError::Load(failure)) => {
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "status": "failed",
                    "errors": &failure.errors,
                }))?,
                OutputFormat::Text => {
                    println!(
                        "{} validate: failed with {} error(s)",
                        "✗".bright_red(),
                        failure.len()
                    );
                    for line in output::failure_lines(&failure, 240) {
                        println!("{}", line);
                    }
                }
            }
            Err(DoctrineError::Load(failure))
        }
        Err(other) => Err(other),
    }
}

fn run_modules(loader: &ContentLoader, cli: ModulesCli) -> Result<(), DoctrineError> {
    let outcome = load_for_query(loader)?;

    let query = content::query::ModuleQuery {
        ship: cli.ship,
        role: cli.role,
        enemy: cli.enemy,
        map: cli.map,
        status: cli.status,
        module_type: cli.module_type,
        domain: cli.domain,
    };
    let modules: Vec<_> = outcome.corpus.filter_modules(&query).collect();

    match cli.format {
        OutputFormat::Json => print_json(&modules),
        OutputFormat::Text => {
            for module in &modules {
                println!(
                    "{} {:<10} {:<9} {}",
                    format!("{:<32}", module.id).bright_cyan(),
                    module.status.as_str(),
                    module.module_type.as_str(),
                    module.title
                );
            }
            println!("modules: {} match(es)", modules.len());
            Ok(())
        }
    }
}

fn run_show(loader: &ContentLoader, command: ShowCommand) -> Result<(), DoctrineError> {
    let outcome = load_for_query(loader)?;
    let corpus = &outcome.corpus;

    match command {
        ShowCommand::Module { id } => match corpus.get_module(&id) {
            Some(module) => print_json(module),
            None => Err(DoctrineError::NotFound(format!("module {}", id))),
        },
        ShowCommand::Reference { ref_type, id } => {
            let parsed = RefType::from_token(&ref_type).ok_or_else(|| {
                DoctrineError::NotFound(format!(
                    "reference type {} (expected one of: {})",
                    ref_type,
                    RefType::ALLOWED.join(", ")
                ))
            })?;
            match corpus.get_reference(parsed, &id) {
                Some(reference) => print_json(reference),
                None => Err(DoctrineError::NotFound(format!(
                    "reference {}/{}",
                    ref_type, id
                ))),
            }
        }
        ShowCommand::Ship { slug } => match corpus.get_ship_hub(&slug) {
            Some(hub) => print_json(hub),
            None => Err(DoctrineError::NotFound(format!("ship hub {}", slug))),
        },
    }
}

pub fn run() -> Result<(), DoctrineError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Command::Version = cli.command {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let loader = ContentLoader::from_project_root(root)?;

    match cli.command {
        Command::Validate(validate) => run_validate(&loader, validate.format),
        Command::Facets => {
            let outcome = load_for_query(&loader)?;
            print_json(outcome.corpus.facets())
        }
        Command::Modules(modules) => run_modules(&loader, modules),
        Command::Show { command } => run_show(&loader, command),
        Command::Version => Ok(()),
    }
}
