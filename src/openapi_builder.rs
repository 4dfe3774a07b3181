//! The Swagger 2.0 document model and the assembler that merges metadata,
//! operations and definitions into it.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of the document's `swagger` field
pub const SWAGGER_VERSION: &str = "2.0";

/// JSON pointer prefix of every definition reference
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Builds the `$ref` pointer for a symbolic definition name.
pub fn definition_ref(name: &str) -> String {
    format!("{}{}", DEFINITIONS_PREFIX, name)
}

/// HTTP methods a [`PathItem`] has a slot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Case-insensitive lookup.
    pub fn parse(method: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(method.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Path,
    Body,
    Header,
    FormData,
}

impl ParameterLocation {
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "query" => Some(ParameterLocation::Query),
            "path" => Some(ParameterLocation::Path),
            "body" => Some(ParameterLocation::Body),
            "header" => Some(ParameterLocation::Header),
            "formData" => Some(ParameterLocation::FormData),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Body => "body",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
        }
    }

    /// Body and form parameters may name a registered definition.
    pub fn accepts_definitions(&self) -> bool {
        matches!(self, ParameterLocation::Body | ParameterLocation::FormData)
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema type tag of a definition property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(TypeTag::String),
            "number" => Some(TypeTag::Number),
            "boolean" => Some(TypeTag::Boolean),
            "array" => Some(TypeTag::Array),
            "object" => Some(TypeTag::Object),
            _ => None,
        }
    }

    /// Only container tags may carry a reference to another definition.
    pub fn is_container(&self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::Object)
    }
}

/// API info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Document-wide metadata read from the entry file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadata {
    pub info: Info,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Inline schema fragment used by parameters, responses and properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,
}

impl SchemaRef {
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// A `$ref` to a symbolic definition.
    pub fn definition(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Self::default()
        }
    }

    pub fn array_of(items: SchemaRef) -> Self {
        Self {
            schema_type: Some(TypeTag::Array.as_str().to_string()),
            reference: None,
            items: Some(Box::new(items)),
        }
    }

    /// The symbolic name this fragment (or its items) points at, if any.
    pub fn referenced_definition(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .or_else(|| self.items.as_ref().and_then(|i| i.reference.as_deref()))
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
    }
}

/// One property of a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SchemaRef", try_from = "SchemaRef")]
pub struct Property {
    pub type_tag: TypeTag,
    /// Symbolic name of the referenced definition (array items or object)
    pub reference: Option<String>,
}

impl From<Property> for SchemaRef {
    fn from(property: Property) -> Self {
        match (property.type_tag, property.reference) {
            (TypeTag::Array, Some(name)) => SchemaRef::array_of(SchemaRef::definition(&name)),
            (tag, Some(name)) => SchemaRef {
                schema_type: Some(tag.as_str().to_string()),
                reference: Some(definition_ref(&name)),
                items: None,
            },
            (tag, None) => SchemaRef::of_type(tag.as_str()),
        }
    }
}

impl TryFrom<SchemaRef> for Property {
    type Error = String;

    fn try_from(schema: SchemaRef) -> Result<Self, Self::Error> {
        let type_tag = schema
            .schema_type
            .as_deref()
            .and_then(TypeTag::parse)
            .ok_or_else(|| format!("invalid property type: {:?}", schema.schema_type))?;
        Ok(Property {
            type_tag,
            reference: schema.referenced_definition().map(str::to_string),
        })
    }
}

/// A generated definition: an object with its properties in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: TypeTag,
    pub properties: IndexMap<String, Property>,
}

impl Schema {
    pub fn object(properties: IndexMap<String, Property>) -> Self {
        Self {
            schema_type: TypeTag::Object,
            properties,
        }
    }
}

/// Type of a parameter: a primitive tag or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterSchema {
    #[serde(rename = "type")]
    Primitive(String),
    #[serde(rename = "schema")]
    Schema(SchemaRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub schema: ParameterSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

/// One documented route + method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Set by `@router`; not serialized, the method is the slot in [`PathItem`]
    #[serde(skip)]
    pub method: Option<HttpMethod>,
    /// Set by `@router`; not serialized, the path is the key in `paths`
    #[serde(skip)]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<u16, Response>,
}

/// All operations for a single path, at most one per method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
}

impl PathItem {
    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Options => &mut self.options,
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
        }
    }

    /// Stores `operation` in the method's slot, returning whatever it replaced.
    pub fn insert(&mut self, method: HttpMethod, operation: Operation) -> Option<Operation> {
        self.slot_mut(method).replace(operation)
    }
}

/// The complete document handed to the serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub swagger: String,
    #[serde(flatten)]
    pub metadata: ApiMetadata,
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Schema>,
}

/// Outcome of placing an operation into the path table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Inserted,
    /// An earlier operation with the same route and method was overwritten.
    Replaced,
    /// The operation has no route and was dropped.
    Unrouted,
}

/// Merges metadata, operations and definitions into a [`Specification`].
pub struct SpecificationAssembler {
    metadata: ApiMetadata,
    paths: BTreeMap<String, PathItem>,
    definitions: BTreeMap<String, Schema>,
}

impl SpecificationAssembler {
    pub fn new(metadata: ApiMetadata) -> Self {
        debug!("Initializing SpecificationAssembler");
        Self {
            metadata,
            paths: BTreeMap::new(),
            definitions: BTreeMap::new(),
        }
    }

    /// Places an operation under its route. A second operation for the same
    /// route and method replaces the first.
    pub fn add_operation(&mut self, operation: Operation) -> Placement {
        let (path, method) = match (operation.path.clone(), operation.method) {
            (Some(path), Some(method)) => (path, method),
            _ => return Placement::Unrouted,
        };
        debug!("Adding operation: {} {}", method, path);

        let path_item = self.paths.entry(path).or_default();
        match path_item.insert(method, operation) {
            Some(_) => Placement::Replaced,
            None => Placement::Inserted,
        }
    }

    pub fn with_definitions(mut self, definitions: BTreeMap<String, Schema>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn build(self) -> Specification {
        debug!(
            "Building specification: {} paths, {} definitions",
            self.paths.len(),
            self.definitions.len()
        );
        Specification {
            swagger: SWAGGER_VERSION.to_string(),
            metadata: self.metadata,
            paths: self.paths,
            definitions: self.definitions,
        }
    }
}
