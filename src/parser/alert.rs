/// The metadata of an Alert node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAlert {
    /// Type of alert.
    pub alert_type: AlertType,

    /// Overridden title. If None, then use the default title.
    pub title: Option<String>,

    /// Originated from a multiline blockquote.
    pub multiline: bool,

    /// Number of `>` fence characters that opened the alert.
    pub fence_length: usize,

    /// Column offset of the fence, used by the multiline-blockquote rewriter.
    pub fence_offset: usize,

    /// Whether the callout renders as a `<details>` element, and if so
    /// whether it starts open. `None` means a plain, non-collapsible block
    /// (GFM alerts are always `None`; a `+`/`-` suffix after `[!TYPE]` sets
    /// this for the generalised `callouts` extension).
    pub collapsible: Option<bool>,
}

/// The type of alert/callout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlertType {
    /// Useful information that users should know, even when skimming content
    #[default]
    Note,

    /// Helpful advice for doing things better or more easily
    Tip,

    /// Key information users need to know to achieve their goal
    Important,

    /// Urgent info that needs immediate user attention to avoid problems
    Warning,

    /// Advises about risks or negative outcomes of certain actions
    Caution,

    /// Any `[!TYPE]` name outside GFM's fixed five, recognised when the
    /// `callouts` extension is enabled. Carries the lowercased type name.
    Custom(String),
}

impl AlertType {
    /// Returns the default title for an alert type
    pub(crate) fn default_title(&self) -> String {
        match *self {
            AlertType::Note => String::from("Note"),
            AlertType::Tip => String::from("Tip"),
            AlertType::Important => String::from("Important"),
            AlertType::Warning => String::from("Warning"),
            AlertType::Caution => String::from("Caution"),
            AlertType::Custom(ref name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
        }
    }

    /// Returns the CSS class to use for a GFM-style alert (`markdown-alert-*`).
    pub(crate) fn css_class(&self) -> String {
        match *self {
            AlertType::Note => String::from("alert-note"),
            AlertType::Tip => String::from("alert-tip"),
            AlertType::Important => String::from("alert-important"),
            AlertType::Warning => String::from("alert-warning"),
            AlertType::Caution => String::from("alert-caution"),
            AlertType::Custom(ref name) => format!("alert-{name}"),
        }
    }

    /// Returns the lowercase type name used by the `callout callout-TYPE`
    /// class pairing of the generalised callouts extension.
    pub(crate) fn callout_name(&self) -> String {
        match *self {
            AlertType::Note => String::from("note"),
            AlertType::Tip => String::from("tip"),
            AlertType::Important => String::from("important"),
            AlertType::Warning => String::from("warning"),
            AlertType::Caution => String::from("caution"),
            AlertType::Custom(ref name) => name.clone(),
        }
    }
}
