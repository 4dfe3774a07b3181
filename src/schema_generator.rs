use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::openapi_builder::{Property, Schema};
use crate::parser::{FieldDeclaration, SourceIndex, TypeDeclaration};
use crate::registry::DefinitionRegistry;
use crate::type_resolver::TypeResolver;
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Reference marker in a field's tag text: `swag:"Name"`
static SWAG_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"swag:"(\w+)""#).unwrap());

/// Schema generator - turns every registered definition into an object schema
pub struct SchemaGenerator<'r, 'a> {
    registry: &'r DefinitionRegistry<'a>,
    resolver: TypeResolver<'r>,
}

impl<'r, 'a> SchemaGenerator<'r, 'a> {
    pub fn new(registry: &'r DefinitionRegistry<'a>, index: &'r SourceIndex) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            registry,
            resolver: TypeResolver::new(index),
        }
    }

    /// Generates the schema of every registered symbolic name.
    ///
    /// The first field whose shape cannot be mapped aborts generation.
    pub fn generate_definitions(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Schema>> {
        let mut definitions = BTreeMap::new();
        for (name, decl) in self.registry.iter() {
            let schema = self.generate_schema(name, decl, diagnostics)?;
            definitions.insert(name.to_string(), schema);
        }
        debug!("Generated {} definitions", definitions.len());
        Ok(definitions)
    }

    fn generate_schema(
        &self,
        definition: &str,
        decl: &TypeDeclaration<'a>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Schema> {
        debug!("Generating schema for {} ({}::{})", definition, decl.scope, decl.name);

        let mut properties = IndexMap::new();
        for field in &decl.fields {
            let property = self.generate_property(definition, decl, field, diagnostics)?;
            properties.insert(property_name(&field.name), property);
        }
        Ok(Schema::object(properties))
    }

    fn generate_property(
        &self,
        definition: &str,
        decl: &TypeDeclaration<'a>,
        field: &FieldDeclaration<'a>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Property> {
        let type_tag = self
            .resolver
            .infer(field.ty)
            .map_err(|shape| Error::UnsupportedShape {
                definition: definition.to_string(),
                declaration: decl.name.clone(),
                field: field.name.clone(),
                shape,
            })?;

        let reference = if type_tag.is_container() {
            field.tag.as_deref().and_then(reference_target)
        } else {
            None
        };
        if let Some(name) = &reference {
            if !self.registry.contains(name) {
                diagnostics.record_unresolved_reference(name);
            }
        }

        Ok(Property { type_tag, reference })
    }
}

/// Symbolic name named by a `swag:"Name"` marker in a field's tag text.
pub fn reference_target(tag: &str) -> Option<String> {
    SWAG_REFERENCE
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Canonical property name: lowercase with an underscore before each capital
/// that does not follow an underscore or start the name.
pub fn property_name(field: &str) -> String {
    let field = field.strip_prefix("r#").unwrap_or(field);
    let mut name = String::with_capacity(field.len() + 4);
    let mut previous = None;
    for (i, c) in field.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() && previous != Some('_') {
            name.push('_');
        }
        name.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    name
}
