//! Serialization of the generated [`Specification`] to YAML or JSON.

use crate::error::{Error, Result};
use crate::openapi_builder::Specification;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(spec: &Specification) -> Result<String> {
    debug!("Serializing specification to YAML");
    Ok(serde_yaml::to_string(spec)?)
}

/// Serializes the document to pretty-printed JSON.
///
/// Maps in the document are ordered, so the same input always yields the
/// same text.
///
/// # Example
///
/// ```
/// use swagdoc::openapi_builder::{ApiMetadata, SpecificationAssembler};
/// use swagdoc::serializer::serialize_json;
///
/// let spec = SpecificationAssembler::new(ApiMetadata::default()).build();
/// let json = serialize_json(&spec).unwrap();
/// assert!(json.contains("\"swagger\": \"2.0\""));
/// ```
pub fn serialize_json(spec: &Specification) -> Result<String> {
    debug!("Serializing specification to JSON");
    Ok(serde_json::to_string_pretty(spec)?)
}

/// Writes `content` to `path`, creating parent directories as needed and
/// overwriting an existing file.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
