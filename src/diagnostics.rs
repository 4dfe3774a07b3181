use crate::directive::DirectiveError;
use log::warn;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A directive line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// Name of the function or struct the doc comment belongs to
    pub declaration: String,
    /// The raw doc line
    pub line: String,
    pub error: DirectiveError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} (line: `{}`)",
            self.file.display(),
            self.declaration,
            self.error,
            self.line
        )
    }
}

/// Everything that went wrong or was overridden without failing the run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    route_collisions: usize,
    definition_collisions: usize,
    unresolved_references: BTreeSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// A route + method was documented more than once; the later one won.
    pub fn record_route_collision(&mut self) {
        self.route_collisions += 1;
    }

    /// A symbolic name was registered more than once; the later one won.
    pub fn record_definition_collision(&mut self) {
        self.definition_collisions += 1;
    }

    /// A `@Name` reference that no `@def` registered.
    pub fn record_unresolved_reference(&mut self, name: &str) {
        self.unresolved_references.insert(name.to_string());
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn route_collisions(&self) -> usize {
        self.route_collisions
    }

    pub fn definition_collisions(&self) -> usize {
        self.definition_collisions
    }

    pub fn unresolved_references(&self) -> &BTreeSet<String> {
        &self.unresolved_references
    }

    /// True when no directive line was skipped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
