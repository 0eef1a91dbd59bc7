//! Error kinds surfaced by the preprocessing stages that run ahead of and
//! after the CommonMark parser/renderer proper (metadata, includes,
//! bibliography loading).
//!
//! Per the pipeline's error-handling policy, most of these are never
//! returned to the caller of [`crate::markdown_to_html`]: an unresolvable
//! include or an unparsable bibliography entry is reported inline, at the
//! failure site, and the conversion continues. [`Error`] exists for the
//! narrower set of callers (`file_includes` resolution, bibliography
//! loading) who want the structured reason rather than the rendered
//! comment.

use std::fmt;

/// A stage-reported failure. See the module documentation for how (and
/// whether) these propagate to [`crate::markdown_to_html`]'s output.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The resolved `Options` combination is structurally invalid (e.g. an
    /// unknown mode string reached the library, which should have been
    /// rejected by the CLI's argument parser upstream).
    InvalidOptions(String),
    /// A metadata block was present but malformed; callers degrade to "no
    /// metadata" rather than receiving this in normal operation.
    MetadataMalformed(String),
    /// An include directive named a path that could not be read.
    IncludeNotFound(String),
    /// An include directive's resolution stack revisited a path already on
    /// it.
    IncludeCycle(String),
    /// Include resolution exceeded the recursion depth limit.
    IncludeTooDeep(String),
    /// A bibliography file could not be parsed in its declared format.
    BibliographyParse(String),
    /// Input bytes were not valid UTF-8.
    EncodingError(String),
    /// An internal fixed limit (recursion depth, nesting) was exceeded.
    InternalLimit(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Error::MetadataMalformed(msg) => write!(f, "malformed metadata: {msg}"),
            Error::IncludeNotFound(path) => write!(f, "include not found: {path}"),
            Error::IncludeCycle(path) => write!(f, "include cycle detected at: {path}"),
            Error::IncludeTooDeep(path) => write!(f, "include nesting too deep at: {path}"),
            Error::BibliographyParse(msg) => write!(f, "bibliography parse error: {msg}"),
            Error::EncodingError(msg) => write!(f, "encoding error: {msg}"),
            Error::InternalLimit(msg) => write!(f, "internal limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Renders an `Error` as the inline HTML comment the pipeline substitutes at
/// the failure site, per the "preprocessing errors... are reported by
/// emitting an inline error comment" policy.
pub(crate) fn as_inline_comment(err: &Error) -> String {
    format!("<!-- apex error: {err} -->")
}
