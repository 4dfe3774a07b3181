//! swagdoc - Swagger 2.0 documentation from annotated Rust doc comments.
//!
//! Handlers describe themselves with `@directive` lines in their doc comments;
//! structs opt into the `definitions` section with `@def Name`. swagdoc reads
//! these statically, without compiling the project.
//!
//! ```text
//! /// @Summary list pets
//! /// @Success 200 {array} @Pets "all pets"
//! /// @Router /pets [get]
//! pub async fn list_pets() { /* ... */ }
//! ```
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans the project directory for Rust files
//! 2. [`parser`] - Parses every file and indexes its structs and functions
//! 3. [`metadata`] - Reads document-wide metadata from the entry file
//! 4. [`registry`] - Registers `@def` structs under their symbolic names
//! 5. [`operation_parser`] - Turns handler doc comments into operations, via [`directive`]
//! 6. [`schema_generator`] - Builds a schema for every registered struct, via [`type_resolver`]
//! 7. [`openapi_builder`] - The document model and its assembler
//! 8. [`serializer`] - Serializes the document to JSON or YAML
//!
//! [`generator`] runs the whole pipeline.
//!
//! # Example Usage
//!
//! ```no_run
//! use swagdoc::generator::{generate, GeneratorConfig};
//! use swagdoc::serializer::serialize_json;
//!
//! let generation = generate(&GeneratorConfig::new("./my-project")).unwrap();
//! for diagnostic in generation.diagnostics.entries() {
//!     eprintln!("skipped: {}", diagnostic);
//! }
//! println!("{}", serialize_json(&generation.specification).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod diagnostics;
pub mod directive;
pub mod doc_comment;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod openapi_builder;
pub mod operation_parser;
pub mod parser;
pub mod registry;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod type_resolver;
