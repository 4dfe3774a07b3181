//! Symbolic name → struct declaration registry, built from `@def` doc lines.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::directive::DirectiveError;
use crate::doc_comment::split_directive;
use crate::parser::{SourceIndex, TypeDeclaration};
use log::debug;
use std::collections::BTreeMap;

/// Directive registering a struct under a symbolic name
pub const DEF_KEYWORD: &str = "@def";

/// Every `@def`-marked struct of the index, keyed by symbolic name.
///
/// Built once by [`DefinitionRegistry::build`] and read-only afterwards; the
/// operation and schema phases borrow it.
#[derive(Debug, Default)]
pub struct DefinitionRegistry<'a> {
    definitions: BTreeMap<String, TypeDeclaration<'a>>,
}

impl<'a> DefinitionRegistry<'a> {
    /// Scans every struct's doc comment for `@def Name`.
    ///
    /// Registering an existing name replaces the earlier struct and counts as a
    /// definition collision. A `@def` without a name is reported and skipped.
    pub fn build(index: &'a SourceIndex, diagnostics: &mut Diagnostics) -> Self {
        let mut registry = Self::default();

        for decl in index.type_declarations() {
            for name in definition_names(&decl, diagnostics) {
                registry.register(name, decl.clone(), diagnostics);
            }
        }

        debug!("Registered {} definitions", registry.len());
        registry
    }

    fn register(
        &mut self,
        name: String,
        decl: TypeDeclaration<'a>,
        diagnostics: &mut Diagnostics,
    ) {
        debug!("Registering definition {} -> {}::{}", name, decl.scope, decl.name);
        if let Some(previous) = self.definitions.insert(name.clone(), decl) {
            debug!(
                "Definition {} re-registered, replacing {}::{}",
                name, previous.scope, previous.name
            );
            diagnostics.record_definition_collision();
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDeclaration<'a>> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDeclaration<'a>)> {
        self.definitions.iter().map(|(name, decl)| (name.as_str(), decl))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn definition_names(decl: &TypeDeclaration<'_>, diagnostics: &mut Diagnostics) -> Vec<String> {
    let mut names = Vec::new();
    for line in &decl.doc {
        let Some((token, rest)) = split_directive(line) else {
            continue;
        };
        if !token.eq_ignore_ascii_case(DEF_KEYWORD) {
            continue;
        }
        match rest.split_whitespace().next() {
            Some(name) => names.push(name.to_string()),
            None => diagnostics.push(Diagnostic {
                file: decl.file.to_path_buf(),
                declaration: decl.name.clone(),
                line: line.clone(),
                error: DirectiveError::MissingDefinitionName,
            }),
        }
    }
    names
}
