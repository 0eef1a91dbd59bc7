use std::borrow::Cow;
use std::collections::HashSet;
use unicode_categories::UnicodeCategories;

/// Converts header strings to canonical, unique, but still human-readable,
/// anchors.
///
/// To guarantee uniqueness, an anchorizer keeps track of the anchors it has
/// returned; use one per output file.
///
/// ## Example
///
/// ```
/// # use apex_markdown::Anchorizer;
/// let mut anchorizer = Anchorizer::new();
/// // First "stuff" is unsuffixed.
/// assert_eq!("stuff", anchorizer.anchorize("Stuff"));
/// // Second "stuff" has "-1" appended to make it unique.
/// assert_eq!("stuff-1", anchorizer.anchorize("Stuff"));
/// ```
#[derive(Debug, Default)]
#[doc(hidden)]
pub struct Anchorizer(HashSet<String>);

impl Anchorizer {
    /// Construct a new anchorizer.
    pub fn new() -> Self {
        Anchorizer(HashSet::new())
    }

    /// Returns a String that has been converted into an anchor using the
    /// GFM algorithm, which involves changing spaces to dashes, removing
    /// problem characters and, if needed, adding a suffix to make the
    /// resultant anchor unique.
    ///
    /// ```
    /// # use apex_markdown::Anchorizer;
    /// let mut anchorizer = Anchorizer::new();
    /// let source = "Ticks aren't in";
    /// assert_eq!("ticks-arent-in", anchorizer.anchorize(source));
    /// ```
    pub fn anchorize(&mut self, header: &str) -> String {
        fn is_permitted_char(&c: &char) -> bool {
            c == ' '
                || c == '-'
                || c.is_letter()
                || c.is_mark()
                || c.is_number()
                || c.is_punctuation_connector()
        }

        let mut id = header.to_lowercase();
        id = id
            .chars()
            .filter(is_permitted_char)
            .map(|c| if c == ' ' { '-' } else { c })
            .collect();

        let mut uniq = 0;
        id = loop {
            let anchor = if uniq == 0 {
                Cow::from(&id)
            } else {
                Cow::from(format!("{}-{}", id, uniq))
            };

            if !self.0.contains(&*anchor) {
                break anchor.into_owned();
            }

            uniq += 1;
        };
        self.0.insert(id.clone());
        id
    }

    /// Converts a header string to an id using one of the three dialect id
    /// formats the unified renderer supports (see [`IdFormat`]), rather than
    /// the fixed GFM algorithm [`Anchorizer::anchorize`] always applies.
    ///
    /// Unlike `anchorize`, collisions are suffixed starting at `-2` (the
    /// first occurrence of an id is never suffixed, the second gets `-2`,
    /// the third `-3`, and so on), matching the numbering scheme MultiMarkdown
    /// and Kramdown both use for duplicate headers.
    pub fn anchorize_format(&mut self, header: &str, format: IdFormat) -> String {
        let mut id = match format {
            IdFormat::Gfm => return self.anchorize(header),
            IdFormat::Mmd => mmd_id(header),
            IdFormat::Kramdown => kramdown_id(header),
        };
        if id.is_empty() {
            id = String::from("header");
        }

        let mut uniq = 1;
        let unique_id = loop {
            let candidate = if uniq == 1 {
                Cow::from(&id)
            } else {
                Cow::from(format!("{}-{}", id, uniq))
            };
            if !self.0.contains(&*candidate) {
                break candidate.into_owned();
            }
            uniq += 1;
        };
        self.0.insert(unique_id.clone());
        unique_id
    }
}

/// Selects the id-generation algorithm [`Anchorizer::anchorize_format`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum IdFormat {
    /// GitHub-Flavored Markdown: lowercase, strip combining marks, collapse
    /// whitespace runs to a single `-`, drop anything that isn't a letter,
    /// digit, `-` or `_`.
    #[default]
    Gfm,
    /// MultiMarkdown: remove spaces only; case, diacritics and existing
    /// dashes are preserved.
    Mmd,
    /// Kramdown: strip diacritics and em/en dashes; every other
    /// non-alphanumeric run becomes one `-` per source character.
    Kramdown,
}

fn mmd_id(header: &str) -> String {
    header.chars().filter(|c| !c.is_whitespace()).collect()
}

fn kramdown_id(header: &str) -> String {
    use unicode_categories::UnicodeCategories;

    // Strip diacritics (combining marks) after NFKD-ish decomposition. We
    // don't pull in a full Unicode normalization crate; ASCII text, which is
    // the overwhelming common case, is unaffected either way.
    let stripped: String = header.chars().filter(|c| !c.is_mark()).collect();

    let mut id = String::new();
    for c in stripped.chars() {
        if c.is_alphanumeric() {
            id.push(c);
        } else if c != '\u{2014}' && c != '\u{2013}' {
            id.push('-');
        }
    }
    id.trim_start_matches('-').to_string()
}
