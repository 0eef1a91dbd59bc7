//! Adapter traits for plugins.
//!
//! Each plugin has to implement one of the traits available in this module.

use crate::nodes::Sourcepos;
use std::collections::HashMap;
use std::fmt;

/// Implement this adapter for creating a plugin for custom syntax highlighting of codefence blocks.
pub trait SyntaxHighlighterAdapter {
    /// Generates a syntax highlighted HTML output.
    ///
    /// lang: Name of the programming language (the info string of the codefence block after the initial "```" part).
    /// code: The source code to be syntax highlighted.
    fn highlight(&self, lang: Option<&str>, code: &str) -> String;

    /// Generates the opening `<pre>` tag. Some syntax highlighter libraries might include their own
    /// `<pre>` tag possibly with some HTML attribute pre-filled.
    ///
    /// `attributes`: A map of HTML attributes provided by comrak.
    fn build_pre_tag(&self, attributes: &HashMap<String, String>) -> String;

    /// Generates the opening `<code>` tag. Some syntax highlighter libraries might include their own
    /// `<code>` tag possibly with some HTML attribute pre-filled.
    ///
    /// `attributes`: A map of HTML attributes provided by comrak.
    fn build_code_tag(&self, attributes: &HashMap<String, String>) -> String;
}

/// The data passed to a [`HeadingAdapter`] for a single heading node.
#[derive(Debug, Clone)]
pub struct HeadingMeta {
    /// The heading level, 1 through 6.
    pub level: u8,

    /// The rendered text content of the heading, with all inline markup stripped.
    pub content: String,
}

/// Implement this adapter to take over heading rendering, e.g. to emit a
/// table-of-contents entry alongside each heading or to change anchor
/// generation.
pub trait HeadingAdapter {
    /// Called when entering a heading node. `sourcepos` is populated only
    /// when [`crate::RenderOptions::sourcepos`] is set.
    fn enter(
        &self,
        output: &mut dyn fmt::Write,
        heading: &HeadingMeta,
        sourcepos: Option<Sourcepos>,
    ) -> fmt::Result;

    /// Called when leaving a heading node.
    fn exit(&self, output: &mut dyn fmt::Write, heading: &HeadingMeta) -> fmt::Result;
}
