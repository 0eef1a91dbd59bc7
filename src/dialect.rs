//! Dialect presets (S1 of the pipeline: options resolution).
//!
//! A [`Mode`] is a named bundle of extension/parse/render gates. Constructing
//! an [`Options`] via [`Mode::options`] (or the crate-level [`crate::options_for_mode`]
//! helper) fully populates every field; callers then override individual
//! fields before handing the result to [`crate::markdown_to_html`]. This
//! mirrors the rest of the crate's `Options` story -- there is no hidden
//! "user override" record, just a struct literal the caller can keep
//! mutating.

use crate::html::IdFormat;
use crate::parser::{CriticMode, Options};

/// Selects the dialect preset used to populate an [`Options`] value.
///
/// ```
/// # use apex_markdown::dialect::Mode;
/// # use apex_markdown::markdown_to_html;
/// let options = Mode::Unified.options();
/// assert_eq!(markdown_to_html("H~2~O\n", &options), "<p>H<sub>2</sub>O</p>\n");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plain CommonMark, no extensions, `unsafe_ = false`.
    CommonMark,
    /// GitHub-Flavored Markdown: tables, strikethrough, autolink, tasklists,
    /// tagfilter, footnotes. `unsafe_ = false`.
    #[default]
    Gfm,
    /// MultiMarkdown: tables, footnotes, sup/sub, metadata, variable
    /// substitution, includes, abbreviations, Critic Markup, TOC.
    Mmd,
    /// Kramdown: tables, footnotes, description lists, relaxed tables,
    /// header IDs, callouts.
    Kramdown,
    /// The permissive superset: every extension this crate knows about,
    /// `unsafe_ = true`.
    Unified,
}

impl Mode {
    /// Builds a fully-populated [`Options`] for this mode. Every extension
    /// gate the mode cares about is set; every other field is left at its
    /// type's default. Callers may mutate the result further -- later
    /// assignments win, per the "preset, then overlay" resolution order.
    pub fn options(self) -> Options<'static> {
        let mut options = Options::default();
        options.mode = self;
        self.apply(&mut options);
        options
    }

    fn apply(self, options: &mut Options<'static>) {
        let ext = &mut options.extension;
        let render = &mut options.render;

        match self {
            Mode::CommonMark => {
                render.unsafe_ = false;
                render.id_format = IdFormat::Gfm;
            }
            Mode::Gfm => {
                ext.strikethrough = true;
                ext.table = true;
                ext.autolink = true;
                ext.tasklist = true;
                ext.tagfilter = true;
                ext.footnotes = true;
                render.unsafe_ = false;
                render.id_format = IdFormat::Gfm;
            }
            Mode::Mmd => {
                ext.table = true;
                ext.footnotes = true;
                ext.strikethrough = true;
                ext.superscript = true;
                ext.subscript = true;
                ext.metadata = true;
                ext.variable_substitution = true;
                ext.file_includes = true;
                ext.abbreviations = true;
                ext.critic_markup = true;
                ext.critic_markup_mode = CriticMode::Markup;
                ext.toc = true;
                ext.relaxed_tables = true;
                render.unsafe_ = false;
                render.id_format = IdFormat::Mmd;
            }
            Mode::Kramdown => {
                ext.table = true;
                ext.footnotes = true;
                ext.description_lists = true;
                ext.relaxed_tables = true;
                ext.callouts = true;
                ext.header_ids = Some(String::new());
                render.unsafe_ = false;
                render.id_format = IdFormat::Kramdown;
            }
            Mode::Unified => {
                ext.strikethrough = true;
                ext.tagfilter = true;
                ext.table = true;
                ext.autolink = true;
                ext.tasklist = true;
                ext.superscript = true;
                ext.subscript = true;
                ext.underline = true;
                ext.highlight = true;
                ext.spoiler = true;
                ext.greentext = true;
                ext.footnotes = true;
                ext.description_lists = true;
                ext.multiline_block_quotes = true;
                ext.alerts = true;
                ext.callouts = true;
                ext.math_dollars = true;
                ext.math_code = true;
                #[cfg(feature = "shortcodes")]
                {
                    ext.shortcodes = true;
                }
                ext.wikilinks_title_after_pipe = true;
                ext.critic_markup = true;
                ext.critic_markup_mode = CriticMode::Markup;
                ext.abbreviations = true;
                ext.relaxed_tables = true;
                ext.file_includes = true;
                ext.variable_substitution = true;
                ext.metadata = true;
                ext.toc = true;
                ext.header_ids = Some(String::new());
                render.unsafe_ = true;
                render.id_format = IdFormat::Gfm;
            }
        }
    }
}
