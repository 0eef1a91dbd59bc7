//! The AST and related types produced by the parser and consumed by the
//! HTML renderer and all pipeline stages that walk the document.

use crate::arena_tree::Node as ArenaNode;
use crate::parser::alert::NodeAlert;
use crate::parser::math::{NodeMath, NodeMathBlock};
use crate::parser::multiline_block_quote::NodeMultilineBlockQuote;
#[cfg(feature = "shortcodes")]
use crate::parser::shortcodes::NodeShortCode;
use std::cell::RefCell;
use std::fmt::{self, Display};

/// The core AST node enum.
///
/// Each variant corresponds to one node type recognised by the parser or by one of
/// the preprocessing stages that run ahead of it. Variants carrying no extra data
/// besides their children use the bare name; variants with extra metadata wrap a
/// `NodeXxx` struct.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// The root node of every document.
    Document,

    /// YAML, TOML or Pandoc-title-block front matter, carried verbatim (including
    /// delimiters) so it can be skipped by the renderer and re-read by later stages.
    FrontMatter(String),

    /// **Block.** A block quote (`> `).
    BlockQuote,

    /// **Block.** A quote delimited by a matching pair of fence lines (`>>>` / `:::`)
    /// rather than a per-line `>` prefix.
    MultilineBlockQuote(NodeMultilineBlockQuote),

    /// **Block.** An alert/callout block (GitHub-style `[!NOTE]` or an extended
    /// custom-type callout).
    Alert(NodeAlert),

    /// **Block.** A list, ordered or unordered.
    List(NodeList),

    /// **Block.** A single item within a `List`.
    Item(NodeList),

    /// **Block.** A description list (MultiMarkdown-style).
    DescriptionList,

    /// **Block.** A single `term` + `details` pair within a `DescriptionList`.
    DescriptionItem(NodeDescriptionItem),

    /// **Block.** The term half of a `DescriptionItem`.
    DescriptionTerm,

    /// **Block.** The details half of a `DescriptionItem`.
    DescriptionDetails,

    /// **Block.** A code block, fenced or indented.
    CodeBlock(NodeCodeBlock),

    /// **Block.** A raw HTML block.
    HtmlBlock(NodeHtmlBlock),

    /// **Block.** A paragraph.
    Paragraph,

    /// **Block.** An ATX or setext heading.
    Heading(NodeHeading),

    /// **Block.** A thematic break (`---`, `***`, `___`).
    ThematicBreak,

    /// **Block.** A footnote definition (`[^name]: ...`).
    FootnoteDefinition(NodeFootnoteDefinition),

    /// **Block.** A display math block (`$$ ... $$` on its own lines, or a fenced
    /// `` ```math `` block).
    MathBlock(NodeMathBlock),

    /// **Block.** A table.
    Table(NodeTable),

    /// **Block.** A row within a `Table`.
    TableRow(bool),

    /// **Block.** A cell within a `TableRow`.
    TableCell(NodeTableCell),

    /// **Inline.** A run of literal text.
    Text(String),

    /// **Inline.** A soft line break.
    SoftBreak,

    /// **Inline.** A hard line break (trailing double-space or backslash).
    LineBreak,

    /// **Inline.** An inline code span.
    Code(NodeCode),

    /// **Inline.** A raw HTML inline span.
    HtmlInline(String),

    /// **Inline.** An inline math span (`$ ... $` or `$$ ... $$`).
    Math(NodeMath),

    /// **Inline.** Emphasis (`*...*`).
    Emph,

    /// **Inline.** Strong emphasis (`**...**`).
    Strong,

    /// **Inline.** Strikethrough (`~~...~~`).
    Strikethrough,

    /// **Inline.** Highlight (`==...==` when the `highlight` extension is on).
    Highlight,

    /// **Inline.** Underline (`__...__` in underline mode).
    Underline,

    /// **Inline.** Superscript (`^...^`).
    Superscript,

    /// **Inline.** Subscript (`~...~`).
    Subscript,

    /// **Inline.** Spoilered text (`||...||`).
    SpoileredText,

    /// **Inline.** A resolved `:shortcode:` emoji.
    #[cfg(feature = "shortcodes")]
    ShortCode(NodeShortCode),

    /// **Inline.** A link.
    Link(NodeLink),

    /// **Inline.** An image.
    Image(NodeLink),

    /// **Inline.** A footnote reference (`[^name]`).
    FootnoteReference(NodeFootnoteReference),

    /// **Inline.** A citation reference (`[@key]`, `[#key]` or mmark `[^key]`-style).
    CitationReference(NodeCitation),

    /// **Inline.** A wiki-style link (`[[target]]` or `[[target|title]]`).
    WikiLink(NodeWikiLink),

    /// **Inline.** A task-list item marker; carries the checked symbol, if any.
    TaskItem(Option<char>),

    /// **Inline.** A Critic Markup addition (`{++...++}`), kept only in `markup` mode.
    CriticAddition,

    /// **Inline.** A Critic Markup deletion (`{--...--}`), kept only in `markup` mode.
    CriticDeletion,

    /// **Inline.** A Critic Markup highlight (`{==...==}`).
    CriticHighlight,

    /// **Inline.** A Critic Markup comment (`{>>...<<}`), rendered as an aside.
    CriticComment,

    /// **Inline.** Raw, already-escaped text emitted verbatim (used for substituted
    /// variables and other content the renderer must not re-escape).
    Raw(String),

    /// **Inline.** An escaped character span, wrapping the literal character.
    Escaped,

    /// **Inline.** An escaped tag-like span (used by `gfm_quirks`).
    EscapedTag(String),
}

impl NodeValue {
    /// Returns `true` for node types the parser treats as containers of other
    /// blocks or inlines, as opposed to leaves.
    pub fn block(&self) -> bool {
        matches!(
            self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::MultilineBlockQuote(..)
                | NodeValue::Alert(..)
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::TaskItem(..)
                | NodeValue::DescriptionList
                | NodeValue::DescriptionItem(..)
                | NodeValue::DescriptionTerm
                | NodeValue::DescriptionDetails
                | NodeValue::CodeBlock(..)
                | NodeValue::HtmlBlock(..)
                | NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::ThematicBreak
                | NodeValue::FootnoteDefinition(..)
                | NodeValue::MathBlock(..)
                | NodeValue::Table(..)
                | NodeValue::TableRow(..)
                | NodeValue::TableCell(..)
        )
    }

    /// Returns `true` if lines of input text should be fed directly into this
    /// node's `content` buffer rather than being parsed as further structure.
    pub fn accepts_lines(&self) -> bool {
        matches!(
            self,
            NodeValue::Paragraph | NodeValue::Heading(..) | NodeValue::CodeBlock(..)
        )
    }

    /// Returns `true` if this node type may directly contain inline content.
    pub fn contains_inlines(&self) -> bool {
        matches!(
            self,
            NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::TableCell(..)
                | NodeValue::DescriptionTerm
        )
    }

    /// Returns the node's literal text, for the variants that carry one.
    pub fn text(&self) -> Option<&String> {
        match *self {
            NodeValue::Text(ref t) | NodeValue::Raw(ref t) | NodeValue::HtmlInline(ref t) => {
                Some(t)
            }
            _ => None,
        }
    }

    /// Returns the node's literal text mutably, for the variants that carry one.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match *self {
            NodeValue::Text(ref mut t)
            | NodeValue::Raw(ref mut t)
            | NodeValue::HtmlInline(ref mut t) => Some(t),
            _ => None,
        }
    }

    /// Returns the tag name used for this node kind by the CommonMark XML
    /// renderer ([`crate::xml`]).
    pub fn xml_node_name(&self) -> &'static str {
        match self {
            NodeValue::Document => "document",
            NodeValue::FrontMatter(_) => "frontmatter",
            NodeValue::BlockQuote => "block_quote",
            NodeValue::MultilineBlockQuote(..) => "multiline_block_quote",
            NodeValue::Alert(..) => "alert",
            NodeValue::List(..) => "list",
            NodeValue::Item(..) => "item",
            NodeValue::DescriptionList => "description_list",
            NodeValue::DescriptionItem(..) => "description_item",
            NodeValue::DescriptionTerm => "description_term",
            NodeValue::DescriptionDetails => "description_details",
            NodeValue::CodeBlock(..) => "code_block",
            NodeValue::HtmlBlock(..) => "html_block",
            NodeValue::Paragraph => "paragraph",
            NodeValue::Heading(..) => "heading",
            NodeValue::ThematicBreak => "thematic_break",
            NodeValue::FootnoteDefinition(..) => "footnote_definition",
            NodeValue::MathBlock(..) => "math_block",
            NodeValue::Table(..) => "table",
            NodeValue::TableRow(..) => "table_row",
            NodeValue::TableCell(..) => "table_cell",
            NodeValue::Text(..) => "text",
            NodeValue::SoftBreak => "softbreak",
            NodeValue::LineBreak => "linebreak",
            NodeValue::Code(..) => "code",
            NodeValue::HtmlInline(..) => "html_inline",
            NodeValue::Math(..) => "math",
            NodeValue::Emph => "emph",
            NodeValue::Strong => "strong",
            NodeValue::Strikethrough => "strikethrough",
            NodeValue::Highlight => "highlight",
            NodeValue::Underline => "underline",
            NodeValue::Superscript => "superscript",
            NodeValue::Subscript => "subscript",
            NodeValue::SpoileredText => "spoiler",
            #[cfg(feature = "shortcodes")]
            NodeValue::ShortCode(..) => "short_code",
            NodeValue::Link(..) => "link",
            NodeValue::Image(..) => "image",
            NodeValue::FootnoteReference(..) => "footnote_reference",
            NodeValue::CitationReference(..) => "citation_reference",
            NodeValue::WikiLink(..) => "wikilink",
            NodeValue::TaskItem(..) => "item",
            NodeValue::CriticAddition => "critic_addition",
            NodeValue::CriticDeletion => "critic_deletion",
            NodeValue::CriticHighlight => "critic_highlight",
            NodeValue::CriticComment => "critic_comment",
            NodeValue::Raw(..) => "raw",
            NodeValue::Escaped => "escaped",
            NodeValue::EscapedTag(..) => "escaped_tag",
        }
    }
}

/// Discriminant-only view of [`NodeValue`], used where callers need to compare
/// node *kinds* without matching on their payloads (e.g. the region scanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeValueDiscriminants {
    Document,
    FrontMatter,
    BlockQuote,
    MultilineBlockQuote,
    Alert,
    List,
    Item,
    DescriptionList,
    DescriptionItem,
    DescriptionTerm,
    DescriptionDetails,
    CodeBlock,
    HtmlBlock,
    Paragraph,
    Heading,
    ThematicBreak,
    FootnoteDefinition,
    MathBlock,
    Table,
    TableRow,
    TableCell,
    Text,
    SoftBreak,
    LineBreak,
    Code,
    HtmlInline,
    Math,
    Emph,
    Strong,
    Strikethrough,
    Highlight,
    Underline,
    Superscript,
    Subscript,
    SpoileredText,
    ShortCode,
    Link,
    Image,
    FootnoteReference,
    CitationReference,
    WikiLink,
    TaskItem,
    CriticAddition,
    CriticDeletion,
    CriticHighlight,
    CriticComment,
    Raw,
    Escaped,
    EscapedTag,
}

impl From<&NodeValue> for NodeValueDiscriminants {
    fn from(v: &NodeValue) -> Self {
        match v {
            NodeValue::Document => Self::Document,
            NodeValue::FrontMatter(..) => Self::FrontMatter,
            NodeValue::BlockQuote => Self::BlockQuote,
            NodeValue::MultilineBlockQuote(..) => Self::MultilineBlockQuote,
            NodeValue::Alert(..) => Self::Alert,
            NodeValue::List(..) => Self::List,
            NodeValue::Item(..) => Self::Item,
            NodeValue::DescriptionList => Self::DescriptionList,
            NodeValue::DescriptionItem(..) => Self::DescriptionItem,
            NodeValue::DescriptionTerm => Self::DescriptionTerm,
            NodeValue::DescriptionDetails => Self::DescriptionDetails,
            NodeValue::CodeBlock(..) => Self::CodeBlock,
            NodeValue::HtmlBlock(..) => Self::HtmlBlock,
            NodeValue::Paragraph => Self::Paragraph,
            NodeValue::Heading(..) => Self::Heading,
            NodeValue::ThematicBreak => Self::ThematicBreak,
            NodeValue::FootnoteDefinition(..) => Self::FootnoteDefinition,
            NodeValue::MathBlock(..) => Self::MathBlock,
            NodeValue::Table(..) => Self::Table,
            NodeValue::TableRow(..) => Self::TableRow,
            NodeValue::TableCell(..) => Self::TableCell,
            NodeValue::Text(..) => Self::Text,
            NodeValue::SoftBreak => Self::SoftBreak,
            NodeValue::LineBreak => Self::LineBreak,
            NodeValue::Code(..) => Self::Code,
            NodeValue::HtmlInline(..) => Self::HtmlInline,
            NodeValue::Math(..) => Self::Math,
            NodeValue::Emph => Self::Emph,
            NodeValue::Strong => Self::Strong,
            NodeValue::Strikethrough => Self::Strikethrough,
            NodeValue::Highlight => Self::Highlight,
            NodeValue::Underline => Self::Underline,
            NodeValue::Superscript => Self::Superscript,
            NodeValue::Subscript => Self::Subscript,
            NodeValue::SpoileredText => Self::SpoileredText,
            #[cfg(feature = "shortcodes")]
            NodeValue::ShortCode(..) => Self::ShortCode,
            NodeValue::Link(..) => Self::Link,
            NodeValue::Image(..) => Self::Image,
            NodeValue::FootnoteReference(..) => Self::FootnoteReference,
            NodeValue::CitationReference(..) => Self::CitationReference,
            NodeValue::WikiLink(..) => Self::WikiLink,
            NodeValue::TaskItem(..) => Self::TaskItem,
            NodeValue::CriticAddition => Self::CriticAddition,
            NodeValue::CriticDeletion => Self::CriticDeletion,
            NodeValue::CriticHighlight => Self::CriticHighlight,
            NodeValue::CriticComment => Self::CriticComment,
            NodeValue::Raw(..) => Self::Raw,
            NodeValue::Escaped => Self::Escaped,
            NodeValue::EscapedTag(..) => Self::EscapedTag,
        }
    }
}

/// Table column alignment, as declared by the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    /// No alignment declared.
    None,
    /// `:---`
    Left,
    /// `:---:`
    Center,
    /// `---:`
    Right,
}

impl Display for TableAlignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TableAlignment::None => "",
            TableAlignment::Left => "left",
            TableAlignment::Center => "center",
            TableAlignment::Right => "right",
        })
    }
}

/// The metadata of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    /// The column alignments.
    pub alignments: Vec<TableAlignment>,

    /// The number of columns in the header row.
    pub num_columns: usize,

    /// The number of data rows (excluding the header).
    pub num_rows: usize,

    /// Whether the table was recognised from a "relaxed" layout (ragged pipes,
    /// no delimiter row) rather than standard GFM table syntax.
    pub relaxed: bool,
}

/// The metadata of a table cell, populated by the `^^`/empty-cell span pass
/// that runs between parsing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTableCell {
    /// Number of rows this cell spans, accumulated from `^^` continuation
    /// cells directly beneath it. `1` means no span.
    pub rowspan: usize,

    /// Number of columns this cell spans, accumulated from empty cells to
    /// its right. `1` means no span.
    pub colspan: usize,
}

impl Default for NodeTableCell {
    fn default() -> Self {
        NodeTableCell {
            rowspan: 1,
            colspan: 1,
        }
    }
}

/// The metadata of a code span (inline code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCode {
    /// The length of the surrounding backtick run.
    pub num_backticks: usize,

    /// The literal contents of the code span.
    pub literal: String,
}

/// The details of a term + details pair within a description list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeDescriptionItem {
    /// The indentation level of the details' content.
    pub marker_offset: usize,

    /// Whether a blank line separates the term from its first details block.
    pub tight: bool,
}

/// The metadata of a link or image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeLink {
    /// The URL for the link destination or image source.
    pub url: String,

    /// The title for the link or image.
    pub title: String,
}

/// The metadata of a wiki-style link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeWikiLink {
    /// The target, resolved the way the active wikilink dialect dictates (raw
    /// title, or title with spaces replaced, etc.)
    pub url: String,
}

/// A citation reference, resolved against the active bibliography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCitation {
    /// The citation key as written (without surrounding punctuation).
    pub key: String,

    /// An optional locator suffix (e.g. "p. 33").
    pub suffix: Option<String>,

    /// Whether the citation is "suppress author" (`[-@key]`).
    pub suppress_author: bool,
}

/// The metadata of a list and its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeList {
    /// The type of list (bullet or ordered).
    pub list_type: ListType,

    /// Minimum indentation needed for the content to be considered "inside" a
    /// list item.
    pub marker_offset: usize,

    /// Number of characters between the start of the marker and the item text,
    /// including the marker.
    pub padding: usize,

    /// For ordered lists, the number of the first item.
    pub start: usize,

    /// For ordered lists, the delimiter after each number.
    pub delimiter: ListDelimType,

    /// For bullet lists, the character used for each item's bullet.
    pub bullet_char: u8,

    /// Whether the list is "tight": does not put `<p>` tags around item contents.
    pub tight: bool,

    /// Whether the items of this list are task-list items, and which symbols
    /// are considered "checked" when `tasklist_classes` is active.
    pub is_task_list: bool,
}

/// The type of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    /// A bulleted list.
    Bullet,
    /// An ordered (numbered) list.
    Ordered,
}

/// The delimiter following an ordered list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDelimType {
    /// `.`
    Period,
    /// `)`
    Paren,
}

/// The metadata of a code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeCodeBlock {
    /// Whether the code block is fenced (```` ``` ````/`~~~`) as opposed to indented.
    pub fenced: bool,

    /// For fenced code blocks, the fence character.
    pub fence_char: u8,

    /// For fenced code blocks, the length of the fence.
    pub fence_length: usize,

    /// For fenced code blocks, the indentation of the fence itself.
    pub fence_offset: usize,

    /// The info string after the opening fence.
    pub info: String,

    /// The literal contents of the code block.
    pub literal: String,

    /// For fenced code blocks, whether a matching closing fence was found
    /// before the document (or an enclosing container) ended.
    pub closed: bool,
}

/// The metadata of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeHeading {
    /// The heading level, from 1 to 6.
    pub level: u8,

    /// Whether the heading was parsed from setext (underline) syntax.
    pub setext: bool,
}

/// The type of block-level raw HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeHtmlBlockType {
    /// Type 1 through 7, per the CommonMark spec's HTML block rules.
    Numbered(u8),
}

/// The metadata of a block of raw HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHtmlBlock {
    /// Which of the CommonMark HTML block types this is.
    pub block_type: u8,

    /// The literal contents of the block.
    pub literal: String,
}

impl Default for NodeHtmlBlock {
    fn default() -> Self {
        NodeHtmlBlock {
            block_type: 0,
            literal: String::new(),
        }
    }
}

/// The metadata of a footnote definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeFootnoteDefinition {
    /// The name/key of the footnote, as written after `^`.
    pub name: String,

    /// The number of times this footnote is referenced in the document body.
    /// Populated once rendering has walked the whole tree.
    pub total_references: u32,
}

/// The metadata of a footnote reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeFootnoteReference {
    /// The name/key of the footnote being referenced.
    pub name: String,

    /// The 1-based ordinal of the definition this reference resolves to, in
    /// document order.
    pub ref_num: u32,

    /// The 1-based ordinal of *this* reference among all references to the
    /// same footnote (used to disambiguate `fnref` anchors).
    pub ix: u32,
}

/// A `(line, column)` position, both 1-based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineColumn {
    /// The line number.
    pub line: usize,
    /// The column number.
    pub column: usize,
}

impl From<(usize, usize)> for LineColumn {
    fn from(other: (usize, usize)) -> Self {
        LineColumn {
            line: other.0,
            column: other.1,
        }
    }
}

/// The inclusive source span of a node, start and end both 1-based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sourcepos {
    /// The position of the first character of the node.
    pub start: LineColumn,
    /// The position of the last character of the node.
    pub end: LineColumn,
}

impl From<(usize, usize, usize, usize)> for Sourcepos {
    fn from(other: (usize, usize, usize, usize)) -> Self {
        Sourcepos {
            start: (other.0, other.1).into(),
            end: (other.2, other.3).into(),
        }
    }
}

impl Display for Sourcepos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A single node's metadata and payload: the `value` plus bookkeeping the
/// parser and downstream stages need as they build and walk the tree.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node value itself.
    pub value: NodeValue,

    /// The accumulated source span of the node.
    pub sourcepos: Sourcepos,

    /// The raw content accumulated for this node so far, before it is
    /// finalized into inlines or a literal.
    #[doc(hidden)]
    pub content: String,

    /// Byte offset into `content`'s originating line already consumed by the
    /// container-opening logic for this node.
    #[doc(hidden)]
    pub internal_offset: usize,

    /// Whether the node (a container) is still open to further lines.
    #[doc(hidden)]
    pub open: bool,

    /// Whether the most recently added line to this node was blank.
    #[doc(hidden)]
    pub last_line_blank: bool,

    /// Set once a table has been recognised starting at this node, so the
    /// table-opening check is not repeated every line.
    #[doc(hidden)]
    pub table_visited: bool,

    /// Byte offsets, within `content`, of each line fed into this node; used
    /// to recover per-line sourcepos information during inline parsing.
    #[doc(hidden)]
    pub line_offsets: Vec<usize>,
}

impl Ast {
    /// Builds a fresh, open `Ast` for a just-created node whose span starts
    /// (and, until closed, ends) at `start`.
    pub(crate) fn new(value: NodeValue, start: LineColumn) -> Self {
        Ast {
            value,
            content: String::new(),
            sourcepos: Sourcepos {
                start,
                end: start,
            },
            internal_offset: 0,
            open: true,
            last_line_blank: false,
            table_visited: false,
            line_offsets: Vec::with_capacity(0),
        }
    }
}

#[doc(hidden)]
pub fn make_block(value: NodeValue, start_line: usize, start_column: usize) -> Ast {
    Ast::new(value, (start_line, start_column).into())
}

/// The type of a node within the document.
///
/// It is bound by the lifetime `'a`, which corresponds to the `Arena` nodes are
/// allocated in. Child `Ast`s are wrapped in `RefCell` for interior mutability.
pub type AstNode<'a> = ArenaNode<'a, RefCell<Ast>>;

/// Shorthand for a reference to an [`AstNode`], used throughout the public
/// rendering API.
pub type Node<'a> = &'a AstNode<'a>;

#[doc(hidden)]
pub fn last_child_is_open<'a>(node: &'a AstNode<'a>) -> bool {
    node.last_child().map_or(false, |n| n.data.borrow().open)
}

#[doc(hidden)]
pub fn can_contain_type<'a>(node: &'a AstNode<'a>, child: &NodeValue) -> bool {
    if let NodeValue::Document = *child {
        return false;
    }

    match node.data.borrow().value {
        NodeValue::Document
        | NodeValue::BlockQuote
        | NodeValue::MultilineBlockQuote(..)
        | NodeValue::Alert(..)
        | NodeValue::FootnoteDefinition(..)
        | NodeValue::DescriptionDetails
        | NodeValue::Item(..) => {
            child.block()
                && !matches!(
                    *child,
                    NodeValue::Item(..) | NodeValue::DescriptionItem(..)
                )
        }

        NodeValue::List(..) => matches!(*child, NodeValue::Item(..)),

        NodeValue::DescriptionList => matches!(*child, NodeValue::DescriptionItem(..)),

        NodeValue::DescriptionItem(..) => {
            matches!(*child, NodeValue::DescriptionTerm | NodeValue::DescriptionDetails)
        }

        NodeValue::Paragraph
        | NodeValue::Heading(..)
        | NodeValue::Emph
        | NodeValue::Strong
        | NodeValue::Link(..)
        | NodeValue::Image(..) => !child.block(),

        NodeValue::Table(..) => matches!(*child, NodeValue::TableRow(..)),

        NodeValue::TableRow(..) => matches!(*child, NodeValue::TableCell(..)),

        NodeValue::TableCell(..) => matches!(
            *child,
            NodeValue::Text(..)
                | NodeValue::Code(..)
                | NodeValue::Emph
                | NodeValue::Strong
                | NodeValue::Link(..)
                | NodeValue::Image(..)
                | NodeValue::Strikethrough
                | NodeValue::HtmlInline(..)
        ),

        _ => false,
    }
}

#[doc(hidden)]
pub fn ends_with_blank_line<'a>(node: &'a AstNode<'a>) -> bool {
    let mut it = Some(node);
    while let Some(cur) = it {
        if cur.data.borrow().last_line_blank {
            return true;
        }
        match cur.data.borrow().value {
            NodeValue::List(..) | NodeValue::Item(..) => it = cur.last_child(),
            _ => it = None,
        };
    }
    false
}

#[doc(hidden)]
pub fn containing_block<'a>(node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let mut ch = Some(node);
    while let Some(n) = ch {
        if n.data.borrow().value.block() {
            return Some(n);
        }
        ch = n.parent();
    }
    None
}
