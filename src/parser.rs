//! Source indexing: parses every scanned file into a `syn` tree and exposes the
//! struct and function declarations the annotation phases work on.

use crate::doc_comment::doc_lines;
use crate::error::{Error, Result};
use log::debug;
use quote::ToTokens;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use syn::visit::{self, Visit};
use syn::{Expr, Lit, LitStr, Meta};

/// Scope name of the crate root.
pub const ROOT_SCOPE: &str = "crate";

/// One parsed source file. Immutable after indexing.
#[derive(Debug)]
pub struct SourceUnit {
    /// Path to the source file
    pub path: PathBuf,
    /// Module path the file declares items in (e.g. `crate::model`)
    pub scope: String,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl SourceUnit {
    /// Reads and parses `path`, deriving its scope from its location below `root`.
    pub fn parse(root: &Path, path: &Path) -> Result<Self> {
        debug!("Parsing file: {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path.to_path_buf(), scope_for_path(root, path), &content)
    }

    /// Parses in-memory source text.
    pub fn from_source(path: PathBuf, scope: String, content: &str) -> Result<Self> {
        let syntax_tree = syn::parse_file(content).map_err(|e| Error::Parse {
            file: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path,
            scope,
            syntax_tree,
        })
    }

    /// Inner (`//!`) doc lines at the top of the file.
    pub fn leading_doc_lines(&self) -> Vec<String> {
        doc_lines(&self.syntax_tree.attrs)
    }

    /// Collects every struct and function declaration in the file, including
    /// those inside inline modules and `impl` blocks.
    pub fn declarations(&self) -> Declarations<'_> {
        let mut collector = DeclarationCollector {
            file: &self.path,
            scopes: vec![self.scope.clone()],
            impl_owner: None,
            declarations: Declarations::default(),
        };
        collector.visit_file(&self.syntax_tree);
        collector.declarations
    }
}

/// A struct, enum or type alias declaration, borrowed from its [`SourceUnit`].
/// Only structs with named fields carry fields.
#[derive(Debug, Clone)]
pub struct TypeDeclaration<'a> {
    pub name: String,
    pub scope: String,
    pub file: &'a Path,
    pub doc: Vec<String>,
    /// Named fields in declaration order
    pub fields: Vec<FieldDeclaration<'a>>,
}

/// A named struct field.
#[derive(Debug, Clone)]
pub struct FieldDeclaration<'a> {
    pub name: String,
    pub ty: &'a syn::Type,
    /// Attribute and doc text attached to the field, e.g. `swag:"Tag" #[serde(default)]`
    pub tag: Option<String>,
}

/// A free function or `impl` method with its doc comment.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration<'a> {
    /// Function name, prefixed with the `impl` self type for methods (`PetApi::list`)
    pub name: String,
    pub scope: String,
    pub file: &'a Path,
    pub doc: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Declarations<'a> {
    pub types: Vec<TypeDeclaration<'a>>,
    pub functions: Vec<FunctionDeclaration<'a>>,
}

struct DeclarationCollector<'a> {
    file: &'a Path,
    scopes: Vec<String>,
    impl_owner: Option<String>,
    declarations: Declarations<'a>,
}

impl<'a> DeclarationCollector<'a> {
    fn scope(&self) -> String {
        self.scopes.last().cloned().unwrap_or_else(|| ROOT_SCOPE.to_string())
    }

    /// Enums and type aliases are indexed without fields.
    fn push_opaque_type(&mut self, ident: &syn::Ident, attrs: &[syn::Attribute]) {
        self.declarations.types.push(TypeDeclaration {
            name: ident.to_string(),
            scope: self.scope(),
            file: self.file,
            doc: doc_lines(attrs),
            fields: Vec::new(),
        });
    }
}

impl<'a> Visit<'a> for DeclarationCollector<'a> {
    fn visit_item_mod(&mut self, item_mod: &'a syn::ItemMod) {
        let scope = format!("{}::{}", self.scope(), item_mod.ident);
        self.scopes.push(scope);
        visit::visit_item_mod(self, item_mod);
        self.scopes.pop();
    }

    fn visit_item_struct(&mut self, item_struct: &'a syn::ItemStruct) {
        let fields = match &item_struct.fields {
            syn::Fields::Named(named) => named
                .named
                .iter()
                .filter_map(|field| {
                    let ident = field.ident.as_ref()?;
                    Some(FieldDeclaration {
                        name: ident.to_string(),
                        ty: &field.ty,
                        tag: field_tag(field),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        self.declarations.types.push(TypeDeclaration {
            name: item_struct.ident.to_string(),
            scope: self.scope(),
            file: self.file,
            doc: doc_lines(&item_struct.attrs),
            fields,
        });
    }

    fn visit_item_enum(&mut self, item_enum: &'a syn::ItemEnum) {
        self.push_opaque_type(&item_enum.ident, &item_enum.attrs);
    }

    fn visit_item_type(&mut self, item_type: &'a syn::ItemType) {
        self.push_opaque_type(&item_type.ident, &item_type.attrs);
    }

    // Function bodies are not walked: items declared inside them are not indexed.
    fn visit_item_fn(&mut self, item_fn: &'a syn::ItemFn) {
        self.declarations.functions.push(FunctionDeclaration {
            name: item_fn.sig.ident.to_string(),
            scope: self.scope(),
            file: self.file,
            doc: doc_lines(&item_fn.attrs),
        });
    }

    fn visit_item_impl(&mut self, item_impl: &'a syn::ItemImpl) {
        let owner = match item_impl.self_ty.as_ref() {
            syn::Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        };
        let previous = std::mem::replace(&mut self.impl_owner, owner);
        visit::visit_item_impl(self, item_impl);
        self.impl_owner = previous;
    }

    fn visit_impl_item_fn(&mut self, method: &'a syn::ImplItemFn) {
        let name = match &self.impl_owner {
            Some(owner) => format!("{}::{}", owner, method.sig.ident),
            None => method.sig.ident.to_string(),
        };
        self.declarations.functions.push(FunctionDeclaration {
            name,
            scope: self.scope(),
            file: self.file,
            doc: doc_lines(&method.attrs),
        });
    }
}

/// Renders a field's attributes into tag text. `#[swag = "X"]` and
/// `#[swag("X")]` become `swag:"X"`; doc lines are appended as written.
fn field_tag(field: &syn::Field) -> Option<String> {
    let mut parts = Vec::new();
    for attr in &field.attrs {
        if attr.path().is_ident("doc") {
            continue;
        }
        if attr.path().is_ident("swag") {
            let target = match &attr.meta {
                Meta::NameValue(name_value) => match &name_value.value {
                    Expr::Lit(expr_lit) => match &expr_lit.lit {
                        Lit::Str(s) => Some(s.value()),
                        _ => None,
                    },
                    _ => None,
                },
                Meta::List(_) => attr.parse_args::<LitStr>().ok().map(|s| s.value()),
                Meta::Path(_) => None,
            };
            if let Some(target) = target {
                parts.push(format!("swag:\"{}\"", target));
                continue;
            }
        }
        parts.push(attr.to_token_stream().to_string());
    }
    parts.extend(doc_lines(&field.attrs).into_iter().filter(|l| !l.is_empty()));

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Derives a module path from a file location: `src/model/pet.rs` under `root`
/// becomes `crate::model::pet`; `lib.rs`, `main.rs` and `mod.rs` name their directory.
pub fn scope_for_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.first().map(String::as_str) == Some("src") {
        segments.remove(0);
    }
    if matches!(
        segments.last().map(String::as_str),
        Some("lib") | Some("main") | Some("mod")
    ) {
        segments.pop();
    }

    std::iter::once(ROOT_SCOPE.to_string())
        .chain(segments)
        .collect::<Vec<_>>()
        .join("::")
}

/// Every parsed file of a project, sorted by path.
#[derive(Debug)]
pub struct SourceIndex {
    units: Vec<SourceUnit>,
    type_names: HashSet<String>,
}

impl SourceIndex {
    /// Parses all `files`. A single unreadable or unparsable file fails the whole
    /// index: later phases need the complete set of declarations.
    pub fn build(root: &Path, files: &[PathBuf]) -> Result<Self> {
        debug!("Indexing {} files", files.len());
        let units = files
            .iter()
            .map(|path| SourceUnit::parse(root, path))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_units(units))
    }

    pub fn from_units(mut units: Vec<SourceUnit>) -> Self {
        units.sort_by(|a, b| a.path.cmp(&b.path));
        let type_names = units
            .iter()
            .flat_map(|unit| unit.declarations().types)
            .map(|decl| decl.name)
            .collect();
        Self { units, type_names }
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    /// Whether a struct with this identifier is declared anywhere in the index.
    pub fn declares_type(&self, name: &str) -> bool {
        self.type_names.contains(name)
    }

    pub fn type_declarations(&self) -> Vec<TypeDeclaration<'_>> {
        self.units
            .iter()
            .flat_map(|unit| unit.declarations().types)
            .collect()
    }

    pub fn function_declarations(&self) -> Vec<FunctionDeclaration<'_>> {
        self.units
            .iter()
            .flat_map(|unit| unit.declarations().functions)
            .collect()
    }

    /// Struct declarations grouped by their declaring module.
    pub fn types_by_scope(&self) -> BTreeMap<String, Vec<TypeDeclaration<'_>>> {
        let mut scopes: BTreeMap<String, Vec<TypeDeclaration<'_>>> = BTreeMap::new();
        for decl in self.type_declarations() {
            scopes.entry(decl.scope.clone()).or_default().push(decl);
        }
        scopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    fn unit(code: &str) -> SourceUnit {
        SourceUnit::from_source(PathBuf::from("test.rs"), ROOT_SCOPE.to_string(), code).unwrap()
    }

    #[test]
    fn test_parse_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "src/model.rs", "pub struct Pet { pub id: u32 }");

        let unit = SourceUnit::parse(temp_dir.path(), &path).unwrap();
        assert_eq!(unit.path, path);
        assert_eq!(unit.scope, "crate::model");
        assert_eq!(unit.syntax_tree.items.len(), 1);
    }

    #[test]
    fn test_parse_invalid_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "broken.rs", "pub fn broken( {");

        let err = SourceUnit::parse(temp_dir.path(), &path).unwrap_err();
        match err {
            Error::Parse { file, .. } => assert_eq!(file, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = SourceUnit::parse(Path::new("/"), Path::new("/nonexistent/file.rs")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_index_fails_on_any_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "good.rs", "pub fn hello() {}");
        let bad = create_temp_file(&temp_dir, "bad.rs", "struct Missing }");

        let result = SourceIndex::build(temp_dir.path(), &[good, bad.clone()]);
        match result {
            Err(Error::Parse { file, .. }) => assert_eq!(file, bad),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_scope_for_path() {
        let root = Path::new("/project");
        assert_eq!(scope_for_path(root, Path::new("/project/src/main.rs")), "crate");
        assert_eq!(scope_for_path(root, Path::new("/project/src/lib.rs")), "crate");
        assert_eq!(
            scope_for_path(root, Path::new("/project/src/model/mod.rs")),
            "crate::model"
        );
        assert_eq!(
            scope_for_path(root, Path::new("/project/src/controller/pet.rs")),
            "crate::controller::pet"
        );
        assert_eq!(scope_for_path(root, Path::new("/project/main.rs")), "crate");
    }

    #[test]
    fn test_declarations_collects_structs_and_functions() {
        let unit = unit(
            r#"
            /// @def Pet
            pub struct Pet {
                pub id: u32,
                #[swag = "Tag"]
                pub tags: Vec<Tag>,
            }

            pub struct Unit;

            /// @Router /pets [get]
            pub fn list_pets() {
                struct Hidden { x: u8 }
            }

            impl PetApi {
                /// @Router /pets [post]
                pub fn create(&self) {}
            }

            mod nested {
                pub struct Inner { pub name: String }
            }
            "#,
        );
        let declarations = unit.declarations();

        let type_names: Vec<_> = declarations.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(type_names, vec!["Pet", "Unit", "Inner"]);
        assert_eq!(declarations.types[0].doc, vec!["@def Pet"]);
        assert_eq!(declarations.types[0].fields.len(), 2);
        assert_eq!(declarations.types[0].fields[1].tag.as_deref(), Some("swag:\"Tag\""));
        assert!(declarations.types[1].fields.is_empty());
        assert_eq!(declarations.types[2].scope, "crate::nested");

        let fn_names: Vec<_> = declarations
            .functions
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(fn_names, vec!["list_pets", "PetApi::create"]);
    }

    #[test]
    fn test_enums_and_aliases_are_indexed_without_fields() {
        let unit = unit(
            r#"
            /// @def Status
            pub enum Status { Available, Sold }

            /// @def PetList
            pub type PetList = Vec<Pet>;
            "#,
        );
        let declarations = unit.declarations();

        let names: Vec<_> = declarations.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Status", "PetList"]);
        assert_eq!(declarations.types[0].doc, vec!["@def Status"]);
        assert!(declarations.types.iter().all(|t| t.fields.is_empty()));
    }

    #[test]
    fn test_field_tag_forms() {
        let unit = unit(
            r#"
            struct Pet {
                #[swag("Tag")]
                a: Vec<Tag>,
                /// swag:"Tag"
                b: Vec<Tag>,
                #[serde(default)]
                c: u8,
                d: u8,
            }
            "#,
        );
        let declarations = unit.declarations();
        let tags: Vec<_> = declarations.types[0]
            .fields
            .iter()
            .map(|f| f.tag.clone())
            .collect();
        assert_eq!(tags[0].as_deref(), Some("swag:\"Tag\""));
        assert_eq!(tags[1].as_deref(), Some("swag:\"Tag\""));
        assert!(tags[2].as_deref().unwrap().contains("serde"));
        assert_eq!(tags[3], None);
    }

    #[test]
    fn test_index_types_by_scope() {
        let index = SourceIndex::from_units(vec![
            SourceUnit::from_source(
                PathBuf::from("b.rs"),
                "crate::b".to_string(),
                "struct Two; struct Three;",
            )
            .unwrap(),
            SourceUnit::from_source(PathBuf::from("a.rs"), "crate::a".to_string(), "struct One;")
                .unwrap(),
        ]);

        assert_eq!(index.units()[0].path, PathBuf::from("a.rs"));
        assert!(index.declares_type("Three"));
        assert!(!index.declares_type("Four"));

        let scopes = index.types_by_scope();
        assert_eq!(scopes["crate::a"].len(), 1);
        assert_eq!(scopes["crate::b"].len(), 2);
    }
}
