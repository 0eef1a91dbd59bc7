//! Apex is a unified Markdown-to-HTML processor: a CommonMark/GFM core
//! extended with the MultiMarkdown and Kramdown constructs most documents
//! actually reach for -- metadata blocks, file includes, variable
//! substitution, abbreviations, definition lists, callouts, Critic Markup,
//! footnotes/citations, and a table of contents -- behind one pipeline and
//! one [`Options`] struct.
//!
//! [`markdown_to_html`] runs the whole pipeline end to end. Lower-level
//! callers can drive [`parse_document`] and [`format_document`] directly to
//! work with the AST in between.
//!
//! ```
//! # use apex_markdown::{markdown_to_html, Options};
//! let mut options = Options::default();
//! options.extension.strikethrough = true;
//! assert_eq!(
//!     markdown_to_html("Hello, ~~world~~ friend!\n", &options),
//!     "<p>Hello, <del>world</del> friend!</p>\n"
//! );
//! ```

mod arena_tree;
mod character_set;
mod ctype;
mod entity;
mod remstack;
mod scanners;
mod strings;

pub mod adapters;
pub mod dialect;
pub mod error;
pub mod html;
pub mod nodes;
pub mod parser;
pub mod plugins;
pub mod xml;

pub mod bibliography;

mod abbreviations;
mod includes;
mod metadata;
mod pretty;
mod standalone;
mod toc;
mod variables;


pub use crate::bibliography::Bibliography;
pub use crate::dialect::Mode;
pub use crate::error::Error;
pub use crate::html::{format_document, format_document_with_plugins, Anchorizer};
pub use crate::nodes::AstNode;
pub use crate::parser::{
    parse_document, parse_document_with_broken_link_callback, BrokenLinkCallback,
    BrokenLinkReference, CriticMode, ExtensionOptions, Options, ParseOptions, Plugins,
    RenderOptions, RenderPlugins, ResolvedReference, URLRewriter,
};
pub use typed_arena::Arena;

#[cfg(feature = "bon")]
pub use crate::parser::{
    ExtensionOptionsBuilder, OptionsBuilder, ParseOptionsBuilder, RenderOptionsBuilder,
};

/// Runs the full pipeline over `source`, returning a self-contained HTML
/// string.
///
/// Options resolution is the caller's job: build an [`Options`] directly, or
/// start from a [`Mode`] preset (via [`options_for_mode`] or
/// [`Mode::options`][dialect::Mode::options]) and override individual
/// fields. Every extension this crate implements -- metadata extraction,
/// include expansion, variable substitution, abbreviation/TOC/bibliography
/// handling, standalone document wrapping, pretty printing -- is driven
/// entirely by the gates on `options`; with every extension left at its
/// default (`false`), this is a plain CommonMark renderer.
///
/// ```
/// # use apex_markdown::{markdown_to_html, Options};
/// assert_eq!(
///     markdown_to_html("Hello, **world**!\n", &Options::default()),
///     "<p>Hello, <strong>world</strong>!</p>\n"
/// );
/// ```
pub fn markdown_to_html(source: &str, options: &Options) -> String {
    markdown_to_html_with_plugins(source, options, &Plugins::default())
}

/// As [`markdown_to_html`], but accepts a [`Plugins`] for customising syntax
/// highlighting and heading rendering.
pub fn markdown_to_html_with_plugins(source: &str, options: &Options, plugins: &Plugins) -> String {
    let ext = &options.extension;

    let (body, metadata) = metadata::extract(source, ext.metadata);

    let expanded = includes::expand(body, options.parse.base_directory.as_deref(), ext.file_includes);

    let substituted = variables::substitute(
        &expanded,
        &metadata,
        ext.variable_substitution,
        ext.metadata_transforms,
    );

    let (preprocessed, abbrevs) = abbreviations::collect(&substituted, ext.abbreviations);

    let arena = Arena::new();
    let root = parse_document(&arena, &preprocessed, options);

    let mut html = String::new();
    format_document_with_plugins(root, options, &mut html, plugins)
        .expect("writing to a String cannot fail");

    let html = includes::decode_raw_sentinels(&html);
    let html = abbreviations::wrap(&html, &abbrevs);
    let html = toc::inject(&html, ext.toc, true);
    let html = bibliography::finalize(&html, options.parse.bibliography.as_ref());
    let html = standalone::wrap(
        &html,
        options.render.standalone,
        options
            .parse
            .document_title
            .as_deref()
            .or_else(|| metadata.get("title")),
        options
            .parse
            .stylesheet_path
            .as_deref()
            .map(standalone::Stylesheet::Linked)
            .unwrap_or(standalone::Stylesheet::Default),
    );
    pretty::print(&html, options.render.pretty)
}

/// Formats an AST as CommonMark-flavoured XML, per the
/// [CommonMark spec's XML schema](https://github.com/commonmark/commonmark-spec/blob/master/CommonMark.dtd).
///
/// This is an escape hatch for callers who want a structured view of the
/// parsed tree without committing to this crate's `AstNode` lifetime; it
/// isn't otherwise driven by the pipeline documented on [`markdown_to_html`].
pub fn markdown_to_commonmark_xml(source: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, source, options);
    let mut buffer = Vec::new();
    xml::format_document(root, options, &mut buffer).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8(buffer).expect("XML formatter only ever writes valid UTF-8")
}

/// Resolves a [`Mode`] preset into a fully populated [`Options`]. Equivalent
/// to `mode.options()`, kept as a free function for callers who'd rather not
/// import [`dialect::Mode`] directly.
pub fn options_for_mode(mode: Mode) -> Options<'static> {
    mode.options()
}
