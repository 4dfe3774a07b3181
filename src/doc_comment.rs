//! Doc-comment line extraction.
//!
//! `///`, `//!` and `/** */` comments all reach the syntax tree as `#[doc = "..."]`
//! attributes. These helpers turn them back into trimmed text lines.

use syn::{Attribute, Expr, Lit, Meta};

/// Returns the doc-comment lines carried by `attrs`, in source order.
///
/// Block comments are split on newlines and stripped of their leading `*`
/// decoration. Every line is trimmed; empty lines are kept so callers can see
/// paragraph breaks.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if let Some(text) = doc_text(attr) {
            for line in text.lines() {
                let line = line.trim();
                let line = line.strip_prefix('*').map(str::trim).unwrap_or(line);
                lines.push(line.to_string());
            }
        }
    }
    lines
}

fn doc_text(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    match &attr.meta {
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(expr_lit) => match &expr_lit.lit {
                Lit::Str(s) => Some(s.value()),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

/// Splits a directive line into its keyword and the trimmed remainder.
///
/// Returns `None` unless the first whitespace-delimited token starts with `@`.
pub fn split_directive(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if !line.starts_with('@') {
        return None;
    }
    match line.find(char::is_whitespace) {
        Some(pos) => Some((&line[..pos], line[pos..].trim())),
        None => Some((line, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fn_attrs(code: &str) -> Vec<Attribute> {
        let file = syn::parse_file(code).unwrap();
        match file.items.into_iter().next() {
            Some(syn::Item::Fn(item_fn)) => item_fn.attrs,
            _ => panic!("expected a function"),
        }
    }

    #[test]
    fn test_line_comments() {
        let attrs = fn_attrs(
            r#"
            /// @Summary list pets
            ///
            /// @Router /pets [get]
            #[inline]
            fn list() {}
            "#,
        );
        assert_eq!(
            doc_lines(&attrs),
            vec!["@Summary list pets", "", "@Router /pets [get]"]
        );
    }

    #[test]
    fn test_block_comment() {
        let attrs = fn_attrs(
            r#"
            /**
             * @Summary list pets
             * @Router /pets [get]
             */
            fn list() {}
            "#,
        );
        let lines: Vec<_> = doc_lines(&attrs)
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(lines, vec!["@Summary list pets", "@Router /pets [get]"]);
    }

    #[test]
    fn test_split_directive() {
        assert_eq!(
            split_directive("@Router   /pets [get] "),
            Some(("@Router", "/pets [get]"))
        );
        assert_eq!(split_directive("@deprecated"), Some(("@deprecated", "")));
        assert_eq!(split_directive("plain prose"), None);
        assert_eq!(split_directive(""), None);
    }
}
