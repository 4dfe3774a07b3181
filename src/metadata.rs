//! Document-wide metadata read from the entry file's doc comments.

use crate::doc_comment::{doc_lines, split_directive};
use crate::openapi_builder::{ApiMetadata, Contact, Info, License, Tag};
use crate::parser::SourceUnit;
use log::debug;

/// Keywords understood in the entry file's doc comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataKeyword {
    Version,
    Title,
    Description,
    TermsOfService,
    ContactName,
    ContactEmail,
    ContactUrl,
    LicenseName,
    LicenseUrl,
    Host,
    BasePath,
    Schemes,
    Tags,
}

impl MetadataKeyword {
    const TABLE: [(&'static str, MetadataKeyword); 13] = [
        ("@version", MetadataKeyword::Version),
        ("@title", MetadataKeyword::Title),
        ("@description", MetadataKeyword::Description),
        ("@termsofservice", MetadataKeyword::TermsOfService),
        ("@contact.name", MetadataKeyword::ContactName),
        ("@contact.email", MetadataKeyword::ContactEmail),
        ("@contact.url", MetadataKeyword::ContactUrl),
        ("@license.name", MetadataKeyword::LicenseName),
        ("@license.url", MetadataKeyword::LicenseUrl),
        ("@host", MetadataKeyword::Host),
        ("@basepath", MetadataKeyword::BasePath),
        ("@schemes", MetadataKeyword::Schemes),
        ("@tags", MetadataKeyword::Tags),
    ];

    fn from_token(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, keyword)| *keyword)
    }
}

/// Doc lines of the entry file: its `//!` block, then the docs on `fn main`.
pub fn entry_doc_lines(entry: &SourceUnit) -> Vec<String> {
    let mut lines = entry.leading_doc_lines();
    for item in &entry.syntax_tree.items {
        if let syn::Item::Fn(item_fn) = item {
            if item_fn.sig.ident == "main" {
                lines.extend(doc_lines(&item_fn.attrs));
            }
        }
    }
    lines
}

/// Reads the metadata directives of the entry file.
pub fn extract_metadata(entry: &SourceUnit) -> ApiMetadata {
    debug!("Reading API metadata from {}", entry.path.display());
    parse_metadata_lines(&entry_doc_lines(entry))
}

/// Applies every recognised metadata directive in `lines`; anything else is skipped.
pub fn parse_metadata_lines(lines: &[String]) -> ApiMetadata {
    let mut metadata = ApiMetadata::default();

    for line in lines {
        let Some((token, rest)) = split_directive(line) else {
            continue;
        };
        let Some(keyword) = MetadataKeyword::from_token(token) else {
            debug!("Skipping unknown metadata directive: {}", token);
            continue;
        };
        let value = rest.to_string();

        let info = &mut metadata.info;
        match keyword {
            MetadataKeyword::Version => info.version = value,
            MetadataKeyword::Title => info.title = value,
            MetadataKeyword::Description => info.description = Some(value),
            MetadataKeyword::TermsOfService => info.terms_of_service = Some(value),
            MetadataKeyword::ContactName => contact(info).name = Some(value),
            MetadataKeyword::ContactEmail => contact(info).email = Some(value),
            MetadataKeyword::ContactUrl => contact(info).url = Some(value),
            MetadataKeyword::LicenseName => license(info).name = Some(value),
            MetadataKeyword::LicenseUrl => license(info).url = Some(value),
            MetadataKeyword::Host => metadata.host = Some(value),
            MetadataKeyword::BasePath => metadata.base_path = Some(value),
            MetadataKeyword::Schemes => {
                metadata.schemes = rest.split_whitespace().map(str::to_string).collect()
            }
            MetadataKeyword::Tags => {
                if let Some(tag) = parse_tag(rest) {
                    metadata.tags.push(tag);
                }
            }
        }
    }

    metadata
}

fn contact(info: &mut Info) -> &mut Contact {
    info.contact.get_or_insert_with(Contact::default)
}

fn license(info: &mut Info) -> &mut License {
    info.license.get_or_insert_with(License::default)
}

/// `name [description...]`
fn parse_tag(rest: &str) -> Option<Tag> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().filter(|n| !n.is_empty())?;
    let description = parts
        .next()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    Some(Tag {
        name: name.to_string(),
        description,
    })
}
