use crate::error::ShapeError;
use crate::openapi_builder::TypeTag;
use crate::parser::SourceIndex;
use log::debug;
use quote::ToTokens;

/// Wrappers that only point at their content. Fields declared through them
/// have no schema rendition.
const INDIRECTIONS: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow"];

const SEQUENCES: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "BinaryHeap",
];

const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// External types that serialize as strings.
const WELL_KNOWN_STRINGS: &[&str] = &[
    "DateTime",
    "NaiveDate",
    "NaiveDateTime",
    "NaiveTime",
    "SystemTime",
    "Instant",
    "Uuid",
    "ObjectId",
    "Url",
    "Decimal",
];

/// Maps declared field types onto schema type tags.
pub struct TypeResolver<'r> {
    index: &'r SourceIndex,
}

impl<'r> TypeResolver<'r> {
    pub fn new(index: &'r SourceIndex) -> Self {
        Self { index }
    }

    /// Infers the type tag of a field's declared shape.
    pub fn infer(&self, ty: &syn::Type) -> Result<TypeTag, ShapeError> {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                self.infer_path(&type_path.path, ty)
            }
            syn::Type::Array(_) | syn::Type::Slice(_) => Ok(TypeTag::Array),
            syn::Type::Reference(_) | syn::Type::Ptr(_) => {
                Err(ShapeError::Indirection(render(ty)))
            }
            syn::Type::Paren(inner) => self.infer(&inner.elem),
            syn::Type::Group(inner) => self.infer(&inner.elem),
            _ => Err(ShapeError::Unsupported(render(ty))),
        }
    }

    fn infer_path(&self, path: &syn::Path, ty: &syn::Type) -> Result<TypeTag, ShapeError> {
        let Some(last) = path.segments.last() else {
            return Err(ShapeError::Unsupported(render(ty)));
        };
        let ident = last.ident.to_string();

        if INDIRECTIONS.contains(&ident.as_str()) {
            return Err(ShapeError::Indirection(render(ty)));
        }
        if SEQUENCES.contains(&ident.as_str()) {
            return Ok(TypeTag::Array);
        }
        if MAPS.contains(&ident.as_str()) {
            return Ok(TypeTag::Object);
        }
        if let Some(tag) = primitive_tag(&ident) {
            return Ok(tag);
        }
        if WELL_KNOWN_STRINGS.contains(&ident.as_str()) {
            return Ok(TypeTag::String);
        }
        if path.segments.len() > 1 {
            debug!("Treating qualified type {} as string", render(ty));
            return Ok(TypeTag::String);
        }
        if self.index.declares_type(&ident) {
            return Ok(TypeTag::Object);
        }

        Err(ShapeError::Unsupported(render(ty)))
    }
}

fn primitive_tag(ident: &str) -> Option<TypeTag> {
    match ident {
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" | "f32" | "f64" => Some(TypeTag::Number),
        "bool" => Some(TypeTag::Boolean),
        "String" | "str" | "char" => Some(TypeTag::String),
        _ => None,
    }
}

fn render(ty: &syn::Type) -> String {
    ty.to_token_stream().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SourceUnit, ROOT_SCOPE};
    use std::path::PathBuf;

    fn index(code: &str) -> SourceIndex {
        SourceIndex::from_units(vec![SourceUnit::from_source(
            PathBuf::from("model.rs"),
            ROOT_SCOPE.to_string(),
            code,
        )
        .unwrap()])
    }

    fn infer(index: &SourceIndex, ty: &str) -> Result<TypeTag, ShapeError> {
        let ty: syn::Type = syn::parse_str(ty).unwrap();
        TypeResolver::new(index).infer(&ty)
    }

    #[test]
    fn test_primitives() {
        let index = index("");
        for ty in ["u8", "i64", "usize", "f32", "f64"] {
            assert_eq!(infer(&index, ty), Ok(TypeTag::Number), "{}", ty);
        }
        assert_eq!(infer(&index, "bool"), Ok(TypeTag::Boolean));
        assert_eq!(infer(&index, "String"), Ok(TypeTag::String));
        assert_eq!(infer(&index, "char"), Ok(TypeTag::String));
    }

    #[test]
    fn test_containers() {
        let index = index("");
        assert_eq!(infer(&index, "Vec<Tag>"), Ok(TypeTag::Array));
        assert_eq!(infer(&index, "std::collections::HashSet<String>"), Ok(TypeTag::Array));
        assert_eq!(infer(&index, "[u8; 4]"), Ok(TypeTag::Array));
        assert_eq!(infer(&index, "HashMap<String, u32>"), Ok(TypeTag::Object));
        assert_eq!(infer(&index, "BTreeMap<String, Tag>"), Ok(TypeTag::Object));
    }

    #[test]
    fn test_external_types_are_strings() {
        let index = index("");
        assert_eq!(infer(&index, "DateTime<Utc>"), Ok(TypeTag::String));
        assert_eq!(infer(&index, "Uuid"), Ok(TypeTag::String));
        assert_eq!(infer(&index, "bson::oid::ObjectId"), Ok(TypeTag::String));
        assert_eq!(infer(&index, "rust_decimal::Money"), Ok(TypeTag::String));
    }

    #[test]
    fn test_declared_struct_is_object() {
        let index = index("pub struct Category { pub name: String }");
        assert_eq!(infer(&index, "Category"), Ok(TypeTag::Object));
    }

    #[test]
    fn test_indirection_is_rejected() {
        let index = index("pub struct Category { pub name: String }");
        for ty in ["Option<String>", "Box<Category>", "Arc<str>", "&'static str", "*const u8"] {
            assert!(
                matches!(infer(&index, ty), Err(ShapeError::Indirection(_))),
                "{}",
                ty
            );
        }
    }

    #[test]
    fn test_unsupported_shapes_report_rendering() {
        let index = index("");
        assert_eq!(
            infer(&index, "Unknown"),
            Err(ShapeError::Unsupported("Unknown".to_string()))
        );
        assert!(matches!(infer(&index, "(u8, u8)"), Err(ShapeError::Unsupported(_))));
        assert!(matches!(infer(&index, "()"), Err(ShapeError::Unsupported(_))));
        assert!(matches!(infer(&index, "fn(u8)"), Err(ShapeError::Unsupported(_))));
    }
}
