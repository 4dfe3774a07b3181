//! Builds [`Operation`]s from the directive lines of function doc comments.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::directive::{
    Directive, DirectiveError, ParamDirective, ResponseBody, ResponseDirective, TypeRef,
};
use crate::openapi_builder::{
    Operation, Parameter, ParameterLocation, ParameterSchema, Response, SchemaRef,
};
use crate::parser::{FunctionDeclaration, SourceIndex, SourceUnit};
use crate::registry::DefinitionRegistry;
use log::debug;

/// Operation parser - reads operations from every documented function.
///
/// Borrows the frozen [`DefinitionRegistry`] to check symbolic references.
pub struct OperationParser<'r, 'a> {
    registry: &'r DefinitionRegistry<'a>,
    /// Entry file whose top-level `fn main` carries metadata, not an operation
    entry: Option<&'r SourceUnit>,
}

impl<'r, 'a> OperationParser<'r, 'a> {
    pub fn new(registry: &'r DefinitionRegistry<'a>) -> Self {
        Self {
            registry,
            entry: None,
        }
    }

    /// Skips the top-level `fn main` of `entry`; its docs are the metadata block.
    pub fn with_entry(mut self, entry: &'r SourceUnit) -> Self {
        self.entry = Some(entry);
        self
    }

    /// Parses every function of the index, in file order.
    pub fn parse_index(&self, index: &SourceIndex, diagnostics: &mut Diagnostics) -> Vec<Operation> {
        let operations: Vec<Operation> = index
            .function_declarations()
            .iter()
            .filter(|function| !self.is_entry_main(function))
            .filter_map(|function| self.parse_function(function, diagnostics))
            .collect();
        debug!("Parsed {} operations", operations.len());
        operations
    }

    /// Parses one function's doc comment.
    ///
    /// Returns `None` when the comment holds no operation directive. A
    /// malformed directive line is reported and skipped; the remaining lines
    /// still contribute.
    pub fn parse_function(
        &self,
        function: &FunctionDeclaration<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Operation> {
        let mut operation = Operation::default();
        let mut documented = false;

        for line in &function.doc {
            let directive = match Directive::parse(line) {
                Ok(Some(directive)) => directive,
                Ok(None) => continue,
                Err(error) => {
                    documented = true;
                    diagnostics.push(diagnostic(function, line, error));
                    continue;
                }
            };
            documented = true;
            self.apply(&mut operation, directive, diagnostics);
        }

        if !documented {
            return None;
        }

        debug!("Parsed operation from {}::{}", function.scope, function.name);
        if operation.path.is_none() {
            diagnostics.push(diagnostic(function, "", DirectiveError::MissingRoute));
        }
        Some(operation)
    }

    fn is_entry_main(&self, function: &FunctionDeclaration<'_>) -> bool {
        self.entry.is_some_and(|entry| {
            function.name == "main"
                && function.scope == entry.scope
                && function.file == entry.path.as_path()
        })
    }

    fn apply(&self, operation: &mut Operation, directive: Directive, diagnostics: &mut Diagnostics) {
        match directive {
            Directive::Summary(summary) => operation.summary = Some(summary),
            Directive::Description(description) => operation.description = Some(description),
            Directive::Id(id) => operation.operation_id = Some(id),
            Directive::Tag(tags) => operation.tags.extend(tags),
            Directive::Accept(mimes) => operation.consumes.extend(mimes),
            Directive::Produce(mimes) => operation.produces.extend(mimes),
            Directive::Param(param) => {
                let parameter = self.parameter(param, diagnostics);
                operation.parameters.push(parameter);
            }
            Directive::Response(response) => {
                let (code, response) = self.response(response, diagnostics);
                operation.responses.insert(code, response);
            }
            Directive::Router(route) => {
                operation.path = Some(route.path);
                operation.method = Some(route.method);
            }
        }
    }

    fn parameter(&self, param: ParamDirective, diagnostics: &mut Diagnostics) -> Parameter {
        self.check_reference(&param.data_type, diagnostics);

        let schema = match (param.location, &param.data_type) {
            (ParameterLocation::Body, TypeRef::Symbolic(name))
            | (ParameterLocation::FormData, TypeRef::Symbolic(name)) => {
                ParameterSchema::Schema(SchemaRef::definition(name))
            }
            (ParameterLocation::Body, TypeRef::Primitive(name)) => {
                ParameterSchema::Schema(SchemaRef::of_type(name.as_str()))
            }
            (_, data_type) => ParameterSchema::Primitive(data_type.name().to_string()),
        };

        Parameter {
            name: param.name,
            location: param.location,
            required: param.required,
            description: param.description,
            schema,
        }
    }

    fn response(&self, response: ResponseDirective, diagnostics: &mut Diagnostics) -> (u16, Response) {
        let schema = match &response.body {
            ResponseBody::Empty => None,
            ResponseBody::Object(data_type) => {
                self.check_reference(data_type, diagnostics);
                Some(SchemaRef::definition(data_type.name()))
            }
            ResponseBody::Array(data_type) => {
                self.check_reference(data_type, diagnostics);
                Some(SchemaRef::array_of(SchemaRef::definition(data_type.name())))
            }
            ResponseBody::Inline(kind) => Some(SchemaRef::of_type(kind.as_str())),
        };

        (
            response.code,
            Response {
                description: response.description,
                schema,
            },
        )
    }

    fn check_reference(&self, data_type: &TypeRef, diagnostics: &mut Diagnostics) {
        if let TypeRef::Symbolic(name) = data_type {
            if !self.registry.contains(name) {
                debug!("Unresolved reference @{}", name);
                diagnostics.record_unresolved_reference(name);
            }
        }
    }
}

fn diagnostic(function: &FunctionDeclaration<'_>, line: &str, error: DirectiveError) -> Diagnostic {
    Diagnostic {
        file: function.file.to_path_buf(),
        declaration: function.name.clone(),
        line: line.to_string(),
        error,
    }
}
