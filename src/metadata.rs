//! S2 of the pipeline: metadata extraction.
//!
//! Tries, in order, YAML front matter, a Pandoc title block, and bare MMD
//! `KEY: VALUE` lines; the first form whose leading line matches wins.
//! Malformed input degrades silently to "no metadata" rather than erroring,
//! per the pipeline's error policy -- a document that merely looks like it
//! might start with metadata is not a reason to reject it.

/// An ordered, case-insensitively-keyed bag of metadata key/value pairs.
///
/// Insertion order is preserved and later additions of an existing key do
/// not overwrite the earlier one; [`Metadata::get`] always returns the
/// first match, matching the "both are kept but lookup returns the first"
/// invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pairs: Vec<(String, String)>,
}

impl Metadata {
    fn push(&mut self, key: &str, value: &str) {
        self.pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    /// Looks up `key`, case-insensitively, returning the first inserted
    /// value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True if no metadata was collected.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Runs S2 against `text`. Returns the text with any consumed metadata
/// block removed from its head, and the metadata collected from it (empty
/// if `options.extension.metadata` is off, or no leading block was
/// recognised).
pub fn extract<'a>(text: &'a str, enabled: bool) -> (&'a str, Metadata) {
    if !enabled {
        return (text, Metadata::default());
    }

    if let Some(result) = extract_yaml(text) {
        return result;
    }
    if let Some(result) = extract_pandoc_title_block(text) {
        return result;
    }
    extract_mmd(text)
}

fn extract_yaml(text: &str) -> Option<(&str, Metadata)> {
    let rest = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n"))?;

    let mut metadata = Metadata::default();
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            offset += line.len();
            return Some((&text[text.len() - rest.len() + offset..], metadata));
        }
        if let Some((key, value)) = split_key_value(trimmed) {
            metadata.push(key, value);
        }
        offset += line.len();
    }
    // No closing delimiter found: not a valid YAML block after all.
    None
}

fn extract_pandoc_title_block(text: &str) -> Option<(&str, Metadata)> {
    if !text.starts_with('%') {
        return None;
    }

    let keys = ["title", "author", "date"];
    let mut metadata = Metadata::default();
    let mut offset = 0;
    let mut consumed_any = false;

    for (i, key) in keys.iter().enumerate() {
        let remaining = &text[offset..];
        if !remaining.starts_with('%') {
            break;
        }
        let line_end = remaining.find('\n').map(|p| p + 1).unwrap_or(remaining.len());
        let line = &remaining[1..remaining[..line_end].trim_end_matches(['\n', '\r']).len()];
        metadata.push(key, line.trim());
        offset += line_end;
        consumed_any = true;
        let _ = i;
    }

    if !consumed_any {
        return None;
    }
    Some((&text[offset..], metadata))
}

fn extract_mmd(text: &str) -> (&str, Metadata) {
    let mut metadata = Metadata::default();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if trimmed.trim().is_empty() {
            offset += line.len();
            break;
        }
        if disqualifies_mmd_metadata(trimmed) {
            break;
        }
        match split_key_value(trimmed) {
            Some((key, value)) => {
                metadata.push(key, value);
                offset += line.len();
            }
            None => break,
        }
    }

    if metadata.is_empty() {
        (text, metadata)
    } else {
        (&text[offset..], metadata)
    }
}

/// Splits `KEY: VALUE`, requiring the colon be followed by a space or tab
/// (distinguishing a metadata line from, say, a URL scheme).
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let after = line.get(colon + 1..)?;
    if !after.starts_with(' ') && !after.starts_with('\t') {
        return None;
    }
    let key = line[..colon].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, after.trim()))
}

/// True if `line` is one of the constructs the spec says must terminate MMD
/// metadata scanning before it can be mistaken for a key/value pair:
/// a URL, a heading, an abbreviation definition, an HTML comment, a
/// Kramdown/IAL marker, a TOC marker, or a line with Markdown link/image
/// syntax.
fn disqualifies_mmd_metadata(line: &str) -> bool {
    let trimmed = line.trim_start();

    if trimmed.starts_with('#') {
        return true;
    }
    if trimmed.starts_with("*[") && trimmed.contains("]:") {
        return true;
    }
    if trimmed.starts_with("[>") && trimmed.contains("]:") {
        return true;
    }
    if trimmed.starts_with("<!--") {
        return true;
    }
    if trimmed.starts_with("{:") || trimmed.starts_with("{::") {
        return true;
    }
    if trimmed.starts_with("{{TOC") {
        return true;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with("mailto:") {
        return true;
    }
    if let Some(colon) = line.find(':') {
        if line[..colon].ends_with("://") || line[colon..].starts_with("://") {
            return true;
        }
    }
    if contains_markdown_link_or_image(trimmed) {
        return true;
    }
    false
}

fn contains_markdown_link_or_image(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some(close) = line[i..].find(']') {
                let after = i + close + 1;
                if line.as_bytes().get(after) == Some(&b'(') {
                    return true;
                }
            }
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_front_matter() {
        let (rest, meta) = extract("---\nTitle: Doc\nAuthor: Ash\n---\nBody\n", true);
        assert_eq!(rest, "Body\n");
        assert_eq!(meta.get("title"), Some("Doc"));
        assert_eq!(meta.get("author"), Some("Ash"));
    }

    #[test]
    fn pandoc_title_block() {
        let (rest, meta) = extract("% My Title\n% Jane Doe\n% 2024-01-01\n\nBody\n", true);
        assert_eq!(rest, "\nBody\n");
        assert_eq!(meta.get("title"), Some("My Title"));
        assert_eq!(meta.get("author"), Some("Jane Doe"));
        assert_eq!(meta.get("date"), Some("2024-01-01"));
    }

    #[test]
    fn mmd_metadata() {
        let (rest, meta) = extract("Title: Doc\n\n# [%Title]\n", true);
        assert_eq!(rest, "\n# [%Title]\n");
        assert_eq!(meta.get("Title"), Some("Doc"));
    }

    #[test]
    fn mmd_metadata_disqualified_by_heading() {
        let (rest, meta) = extract("# Header 1\nMore text\n", true);
        assert_eq!(rest, "# Header 1\nMore text\n");
        assert!(meta.is_empty());
    }

    #[test]
    fn mmd_metadata_disqualified_by_url() {
        let (rest, meta) = extract("https://example.com\nBody\n", true);
        assert_eq!(rest, "https://example.com\nBody\n");
        assert!(meta.is_empty());
    }

    #[test]
    fn disabled_is_passthrough() {
        let (rest, meta) = extract("Title: Doc\n\nBody\n", false);
        assert_eq!(rest, "Title: Doc\n\nBody\n");
        assert!(meta.is_empty());
    }

    #[test]
    fn lookup_keeps_first_on_duplicate_keys() {
        let (_, meta) = extract("Title: First\nTitle: Second\n\nBody\n", true);
        assert_eq!(meta.get("title"), Some("First"));
        assert_eq!(meta.iter().count(), 2);
    }
}
