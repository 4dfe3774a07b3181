//! The whole pipeline: scan, index, read metadata, register definitions,
//! parse operations, generate schemas and assemble the document.

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::metadata::extract_metadata;
use crate::openapi_builder::{Placement, Specification, SpecificationAssembler};
use crate::operation_parser::OperationParser;
use crate::parser::{SourceIndex, SourceUnit};
use crate::registry::DefinitionRegistry;
use crate::scanner::FileScanner;
use crate::schema_generator::SchemaGenerator;
use log::{debug, info, warn};
use std::path::{Component, Path, PathBuf};

/// Entry file used when none is configured, relative to the project root
pub const DEFAULT_ENTRY_FILE: &str = "src/main.rs";

/// What to generate from.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Project root directory
    pub root: PathBuf,
    /// File carrying the API metadata, relative to `root`
    pub entry_file: PathBuf,
    /// Path components excluded from scanning, on top of the scanner defaults
    pub excludes: Vec<String>,
}

impl GeneratorConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entry_file: PathBuf::from(DEFAULT_ENTRY_FILE),
            excludes: Vec::new(),
        }
    }

    pub fn with_entry_file(mut self, entry_file: impl Into<PathBuf>) -> Self {
        self.entry_file = entry_file.into();
        self
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// The entry file's location on disk.
    pub fn entry_path(&self) -> PathBuf {
        if self.entry_file.is_absolute() {
            self.entry_file.clone()
        } else {
            self.root.join(&self.entry_file)
        }
    }
}

/// A generated document and everything reported while building it.
#[derive(Debug)]
pub struct Generation {
    pub specification: Specification,
    pub diagnostics: Diagnostics,
}

/// Runs the full pipeline over `config.root`.
///
/// Fails on the first unreadable or unparsable file and on the first field
/// whose shape has no schema type. Directive-level problems are returned as
/// diagnostics instead.
pub fn generate(config: &GeneratorConfig) -> Result<Generation> {
    info!("Scanning project directory: {}", config.root.display());
    let scan_result = FileScanner::new(config.root.clone())
        .with_excludes(config.excludes.clone())
        .scan()?;
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    info!("Found {} Rust files", scan_result.rust_files.len());

    let index = SourceIndex::build(&config.root, &scan_result.rust_files)?;

    let entry_path = config.entry_path();
    match find_unit(&index, &entry_path) {
        Some(entry) => assemble(&index, entry),
        None if entry_path.is_file() => {
            debug!(
                "Entry file {} is outside the scanned set, parsing it separately",
                entry_path.display()
            );
            let entry = SourceUnit::parse(&config.root, &entry_path)?;
            assemble(&index, &entry)
        }
        None => Err(Error::EntryFileNotFound(entry_path)),
    }
}

/// Builds the document from an already indexed project.
pub fn assemble(index: &SourceIndex, entry: &SourceUnit) -> Result<Generation> {
    let mut diagnostics = Diagnostics::new();

    let metadata = extract_metadata(entry);

    // The registry is complete before anything resolves a reference.
    let registry = DefinitionRegistry::build(index, &mut diagnostics);
    info!("Registered {} definitions", registry.len());

    let operations = OperationParser::new(&registry)
        .with_entry(entry)
        .parse_index(index, &mut diagnostics);
    let definitions = SchemaGenerator::new(&registry, index).generate_definitions(&mut diagnostics)?;

    let mut assembler = SpecificationAssembler::new(metadata);
    let mut placed = 0;
    for operation in operations {
        match assembler.add_operation(operation) {
            Placement::Inserted => placed += 1,
            Placement::Replaced => diagnostics.record_route_collision(),
            Placement::Unrouted => {}
        }
    }
    info!("Placed {} operations", placed);

    Ok(Generation {
        specification: assembler.with_definitions(definitions).build(),
        diagnostics,
    })
}

fn find_unit<'i>(index: &'i SourceIndex, path: &Path) -> Option<&'i SourceUnit> {
    let wanted = normalize(path);
    index.units().iter().find(|unit| normalize(&unit.path) == wanted)
}

/// Drops `.` components so `./proj/src/main.rs` and `proj/src/main.rs` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
