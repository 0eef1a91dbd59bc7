//! S17 of the pipeline: standalone document wrap.
//!
//! Wraps a rendered HTML fragment in `<!DOCTYPE html><html><head>...</head>
//! <body>...</body></html>`, with an optional title and either a linked
//! stylesheet or a small default inline one. A no-op when standalone mode is
//! off, in which case the fragment is returned exactly as given.

/// Where the document's styling comes from when wrapped standalone.
pub enum Stylesheet<'a> {
    /// No stylesheet at all.
    None,
    /// `<link rel="stylesheet" href="...">` to an external path.
    Linked(&'a str),
    /// Default, minimal inline `<style>` block.
    Default,
}

const DEFAULT_STYLE: &str = "body{max-width:40em;margin:2em auto;padding:0 1em;\
font-family:-apple-system,BlinkMacSystemFont,sans-serif;line-height:1.6}\
pre{overflow-x:auto;padding:0.5em;background:#f6f8fa}\
code{background:#f6f8fa;padding:0.1em 0.3em;border-radius:3px}";

/// Runs S17 against rendered `body_html`. A no-op unless `enabled`.
pub fn wrap(body_html: &str, enabled: bool, title: Option<&str>, stylesheet: Stylesheet) -> String {
    if !enabled {
        return body_html.to_string();
    }

    let mut out = String::with_capacity(body_html.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");

    if let Some(title) = title {
        out.push_str("<title>");
        out.push_str(&escape(title));
        out.push_str("</title>\n");
    }

    match stylesheet {
        Stylesheet::None => {}
        Stylesheet::Linked(href) => {
            out.push_str("<link rel=\"stylesheet\" href=\"");
            out.push_str(&escape(href));
            out.push_str("\">\n");
        }
        Stylesheet::Default => {
            out.push_str("<style>\n");
            out.push_str(DEFAULT_STYLE);
            out.push_str("\n</style>\n");
        }
    }

    out.push_str("</head>\n<body>\n");
    out.push_str(body_html);
    out.push_str("\n</body>\n</html>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_passthrough() {
        assert_eq!(wrap("<p>hi</p>", false, Some("Doc"), Stylesheet::None), "<p>hi</p>");
    }

    #[test]
    fn wraps_with_title_and_default_style() {
        let out = wrap("<p>hi</p>", true, Some("My Doc"), Stylesheet::Default);
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>My Doc</title>"));
        assert!(out.contains("<style>"));
        assert!(out.contains("<p>hi</p>"));
    }

    #[test]
    fn wraps_with_linked_stylesheet() {
        let out = wrap("<p>hi</p>", true, None, Stylesheet::Linked("style.css"));
        assert!(out.contains("<link rel=\"stylesheet\" href=\"style.css\">"));
        assert!(!out.contains("<title>"));
    }

    #[test]
    fn no_stylesheet_variant_omits_both() {
        let out = wrap("<p>hi</p>", true, None, Stylesheet::None);
        assert!(!out.contains("<style>"));
        assert!(!out.contains("<link"));
    }
}
