//! Operation directives: the `@keyword ...` lines of a handler's doc comment.
//!
//! Each line is dispatched on its first token through [`Keyword`] and parsed by
//! the grammar of that keyword into a [`Directive`]. Adding a directive means
//! adding a `Keyword` variant, its `Directive` variant and one parser.

use crate::doc_comment::split_directive;
use crate::openapi_builder::{HttpMethod, ParameterLocation};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// `name location dataType required "description"`
static PARAM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([-\w]+)\s+(\w+)\s+(\S+)\s+(\w+)\s+"([^"]*)""#).unwrap()
});

/// `code {kind} dataType "description"`; the description is optional
static RESPONSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\d+)\s+\{(\w+)\}\s+(@?[\w\-./]+)[^"]*(?:"(.*)")?"#).unwrap()
});

/// `code "description"`
static EMPTY_RESPONSE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\d+)\s+"(.*)""#).unwrap());

/// `path [method]`
static ROUTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w./\-{}:]+)\s+\[([^\]]+)\]").unwrap());

/// Prefix marking a type token as a symbolic definition name.
pub const REFERENCE_SIGIL: char = '@';

/// MIME type used for unrecognised `@accept` / `@produce` tokens.
pub const WILDCARD_MIME: &str = "*/*";

/// A directive line that matched its keyword but not its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("cannot parse param comment \"{0}\"")]
    MalformedParam(String),
    #[error("unknown parameter location `{0}`")]
    UnknownLocation(String),
    #[error("symbolic reference `@{name}` is not allowed in a {location} parameter")]
    ReferenceNotAllowed { name: String, location: ParameterLocation },
    #[error("cannot parse response comment \"{0}\"")]
    MalformedResponse(String),
    #[error("invalid status code `{0}`")]
    InvalidStatusCode(String),
    #[error("cannot parse router comment \"{0}\"")]
    MalformedRouter(String),
    #[error("unknown HTTP method `{0}`")]
    UnknownMethod(String),
    #[error("@def without a definition name")]
    MissingDefinitionName,
    #[error("operation has no @router directive and was not added to paths")]
    MissingRoute,
}

/// Keywords understood in an operation's doc comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Summary,
    Description,
    Id,
    Tag,
    Accept,
    Produce,
    Param,
    Success,
    Failure,
    Router,
}

impl Keyword {
    const TABLE: [(&'static str, Keyword); 10] = [
        ("@summary", Keyword::Summary),
        ("@description", Keyword::Description),
        ("@id", Keyword::Id),
        ("@tag", Keyword::Tag),
        ("@accept", Keyword::Accept),
        ("@produce", Keyword::Produce),
        ("@param", Keyword::Param),
        ("@success", Keyword::Success),
        ("@failure", Keyword::Failure),
        ("@router", Keyword::Router),
    ];

    /// Case-insensitive lookup of a directive token such as `@Router`.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, keyword)| *keyword)
    }
}

/// A type token of a `@param` or response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A primitive or otherwise opaque type name (`string`, `integer`)
    Primitive(String),
    /// `@Name`: a definition registered with `@def Name`
    Symbolic(String),
}

impl TypeRef {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.strip_prefix(REFERENCE_SIGIL) {
            Some(name) if !name.is_empty() => TypeRef::Symbolic(name.to_string()),
            _ => TypeRef::Primitive(token.to_string()),
        }
    }

    /// The name used in a `$ref`: the symbolic name, or the raw token.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Primitive(name) | TypeRef::Symbolic(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDirective {
    pub name: String,
    pub location: ParameterLocation,
    pub data_type: TypeRef,
    pub required: bool,
    pub description: String,
}

/// What a response carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// `code "description"`
    Empty,
    /// `{object} Type`
    Object(TypeRef),
    /// `{array} Type`
    Array(TypeRef),
    /// Any other `{kind}`, rendered as an inline schema of that type
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDirective {
    pub code: u16,
    pub body: ResponseBody,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDirective {
    pub path: String,
    pub method: HttpMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Summary(String),
    Description(String),
    Id(String),
    Tag(Vec<String>),
    Accept(Vec<String>),
    Produce(Vec<String>),
    Param(ParamDirective),
    Response(ResponseDirective),
    Router(RouteDirective),
}

impl Directive {
    /// Parses one doc line.
    ///
    /// Returns `Ok(None)` for prose and for unknown `@keywords`, and an error
    /// when a known keyword's grammar does not match.
    pub fn parse(line: &str) -> Result<Option<Directive>, DirectiveError> {
        let Some((token, rest)) = split_directive(line) else {
            return Ok(None);
        };
        let Some(keyword) = Keyword::from_token(token) else {
            return Ok(None);
        };

        let directive = match keyword {
            Keyword::Summary => Directive::Summary(rest.to_string()),
            Keyword::Description => Directive::Description(rest.to_string()),
            Keyword::Id => Directive::Id(rest.to_string()),
            Keyword::Tag => Directive::Tag(rest.split_whitespace().map(str::to_string).collect()),
            Keyword::Accept => Directive::Accept(parse_mime_list(rest)),
            Keyword::Produce => Directive::Produce(parse_mime_list(rest)),
            Keyword::Param => Directive::Param(parse_param(rest)?),
            Keyword::Success | Keyword::Failure => Directive::Response(parse_response(rest)?),
            Keyword::Router => Directive::Router(parse_router(rest)?),
        };
        Ok(Some(directive))
    }
}

/// Maps a short MIME alias (or a full MIME type) onto its MIME type.
pub fn mime_type(token: &str) -> &'static str {
    match token {
        "json" | "application/json" => "application/json",
        "xml" | "text/xml" => "text/xml",
        "plain" | "text/plain" => "text/plain",
        "html" | "text/html" => "text/html",
        "mpfd" | "multipart/form-data" => "multipart/form-data",
        _ => WILDCARD_MIME,
    }
}

fn parse_mime_list(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| mime_type(token).to_string())
        .collect()
}

fn parse_param(rest: &str) -> Result<ParamDirective, DirectiveError> {
    let caps = PARAM_PATTERN
        .captures(rest)
        .ok_or_else(|| DirectiveError::MalformedParam(rest.to_string()))?;

    let location = ParameterLocation::parse(&caps[2])
        .ok_or_else(|| DirectiveError::UnknownLocation(caps[2].to_string()))?;
    let data_type = TypeRef::parse(&caps[3]);
    if let TypeRef::Symbolic(name) = &data_type {
        if !location.accepts_definitions() {
            return Err(DirectiveError::ReferenceNotAllowed {
                name: name.clone(),
                location,
            });
        }
    }
    let required = {
        let text = caps[4].to_ascii_lowercase();
        text == "true" || text == "required"
    };

    Ok(ParamDirective {
        name: caps[1].to_string(),
        location,
        data_type,
        required,
        description: caps[5].to_string(),
    })
}

fn parse_status_code(code: &str) -> Result<u16, DirectiveError> {
    code.parse()
        .map_err(|_| DirectiveError::InvalidStatusCode(code.to_string()))
}

/// Tries the schema grammar first, then the empty-body grammar.
fn parse_response(rest: &str) -> Result<ResponseDirective, DirectiveError> {
    if let Some(caps) = RESPONSE_PATTERN.captures(rest) {
        let data_type = TypeRef::parse(&caps[3]);
        let body = match &caps[2] {
            "object" => ResponseBody::Object(data_type),
            "array" => ResponseBody::Array(data_type),
            kind => ResponseBody::Inline(kind.to_string()),
        };
        return Ok(ResponseDirective {
            code: parse_status_code(&caps[1])?,
            body,
            description: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
        });
    }

    if let Some(caps) = EMPTY_RESPONSE_PATTERN.captures(rest) {
        return Ok(ResponseDirective {
            code: parse_status_code(&caps[1])?,
            body: ResponseBody::Empty,
            description: caps[2].to_string(),
        });
    }

    Err(DirectiveError::MalformedResponse(rest.to_string()))
}

fn parse_router(rest: &str) -> Result<RouteDirective, DirectiveError> {
    let caps = ROUTER_PATTERN
        .captures(rest)
        .ok_or_else(|| DirectiveError::MalformedRouter(rest.to_string()))?;
    let method = HttpMethod::parse(&caps[2])
        .ok_or_else(|| DirectiveError::UnknownMethod(caps[2].trim().to_string()))?;
    Ok(RouteDirective {
        path: caps[1].to_string(),
        method,
    })
}
