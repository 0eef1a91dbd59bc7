//! S14 of the pipeline: table of contents injection.
//!
//! Scans rendered HTML for a TOC marker (`<!--TOC-->`, `{{TOC}}`, or a
//! depth-bounded `{{TOC:min-max}}`), collects the `<hN id="...">` headings
//! already emitted by the renderer, and replaces the marker with a nested
//! `<ul>` tree. Headings are taken as written; nesting follows level jumps
//! directly rather than re-deriving a canonical hierarchy, matching how the
//! id-bearing headings are already laid out start to end in the document.

struct Heading {
    level: u8,
    id: String,
    text: String,
}

/// Runs S14 against already-rendered `html`. A no-op unless `enabled`, or if
/// no marker is present.
pub fn inject(html: &str, enabled: bool, header_anchors: bool) -> String {
    if !enabled {
        return html.to_string();
    }

    let Some((marker_start, marker_end, min, max)) = find_marker(html) else {
        return html.to_string();
    };

    let headings = collect_headings(html, header_anchors);
    let tree = render_tree(&headings, min, max);

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..marker_start]);
    out.push_str(&tree);
    out.push_str(&html[marker_end..]);
    out
}

fn find_marker(html: &str) -> Option<(usize, usize, u8, u8)> {
    if let Some(pos) = html.find("<!--TOC-->") {
        return Some((pos, pos + "<!--TOC-->".len(), 1, 6));
    }
    if let Some(pos) = html.find("<!--TOC max") {
        if let Some(rel_end) = html[pos..].find("-->") {
            let end = pos + rel_end + 3;
            let spec = &html[pos + "<!--TOC max".len()..pos + rel_end];
            if let Ok(max) = spec.trim().parse() {
                return Some((pos, end, 1, max));
            }
        }
    }
    if let Some(pos) = html.find("{{TOC}}") {
        return Some((pos, pos + "{{TOC}}".len(), 1, 6));
    }
    if let Some(pos) = html.find("{{TOC:") {
        if let Some(rel_end) = html[pos..].find("}}") {
            let end = pos + rel_end + 2;
            let spec = &html[pos + "{{TOC:".len()..pos + rel_end];
            if let Some((min, max)) = spec.split_once('-') {
                if let (Ok(min), Ok(max)) = (min.trim().parse(), max.trim().parse()) {
                    return Some((pos, end, min, max));
                }
            }
        }
    }
    None
}

fn collect_headings(html: &str, header_anchors: bool) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut rest = html;
    let mut base = 0;

    while let Some(rel) = find_heading_open(rest) {
        let abs = base + rel;
        let level = html.as_bytes()[abs + 2] - b'0';
        let tag_end = match html[abs..].find('>') {
            Some(e) => abs + e + 1,
            None => break,
        };
        let open_tag = &html[abs..tag_end];

        let close_tag = format!("</h{level}>");
        let Some(close_rel) = html[tag_end..].find(&close_tag) else {
            base = tag_end;
            rest = &html[base..];
            continue;
        };
        let inner = &html[tag_end..tag_end + close_rel];

        let id = extract_id(open_tag).or_else(|| {
            if header_anchors {
                extract_anchor_id(inner)
            } else {
                None
            }
        });

        if let Some(id) = id {
            headings.push(Heading { level, id, text: strip_tags(inner) });
        }

        base = tag_end + close_rel + close_tag.len();
        rest = &html[base..];
    }

    headings
}

fn find_heading_open(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i + 3 < bytes.len() {
        if bytes[i] == b'<' && bytes[i + 1] == b'h' && bytes[i + 2].is_ascii_digit() {
            let level = bytes[i + 2] - b'0';
            if (1..=6).contains(&level) {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn extract_id(open_tag: &str) -> Option<String> {
    let pos = open_tag.find("id=\"")?;
    let rest = &open_tag[pos + 4..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn extract_anchor_id(inner: &str) -> Option<String> {
    let pos = inner.find("<a ")?;
    extract_id(&inner[pos..])
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn render_tree(headings: &[Heading], min: u8, max: u8) -> String {
    let filtered: Vec<&Heading> = headings.iter().filter(|h| h.level >= min && h.level <= max).collect();
    if filtered.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul class=\"toc\">\n");
    let mut stack: Vec<u8> = vec![filtered[0].level];

    out.push_str(&item_open(filtered[0]));

    for pair in filtered.windows(2) {
        let prev_level = *stack.last().unwrap();
        let level = pair[1].level;
        if level > prev_level {
            out.push_str("<ul>\n");
            stack.push(level);
        } else {
            while stack.len() > 1 && *stack.last().unwrap() > level {
                out.push_str("</li>\n</ul>\n");
                stack.pop();
            }
            out.push_str("</li>\n");
        }
        out.push_str(&item_open(pair[1]));
    }

    out.push_str("</li>\n");
    while stack.len() > 1 {
        out.push_str("</ul>\n");
        stack.pop();
    }
    out.push_str("</ul>");
    out
}

fn item_open(h: &Heading) -> String {
    format!("<li><a href=\"#{}\">{}</a>", h.id, h.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_passthrough() {
        assert_eq!(inject("<!--TOC--><h1 id=\"a\">A</h1>", false, false), "<!--TOC--><h1 id=\"a\">A</h1>");
    }

    #[test]
    fn no_marker_is_passthrough() {
        let html = "<h1 id=\"a\">A</h1>";
        assert_eq!(inject(html, true, false), html);
    }

    #[test]
    fn flat_list() {
        let html = "<!--TOC--><h1 id=\"a\">A</h1><h1 id=\"b\">B</h1>";
        let out = inject(html, true, false);
        assert!(out.contains("<a href=\"#a\">A</a>"));
        assert!(out.contains("<a href=\"#b\">B</a>"));
    }

    #[test]
    fn nested_levels() {
        let html = "{{TOC}}<h1 id=\"a\">A</h1><h2 id=\"a1\">A1</h2><h1 id=\"b\">B</h1>";
        let out = inject(html, true, false);
        assert!(out.matches("<ul").count() >= 2);
    }

    #[test]
    fn html_comment_max_depth_form() {
        let html = "<!--TOC max1--><h1 id=\"a\">A</h1><h2 id=\"a1\">A1</h2>";
        let out = inject(html, true, false);
        assert!(out.contains("#a\""));
        assert!(!out.contains("#a1"));
    }

    #[test]
    fn depth_bound_filters_levels() {
        let html = "{{TOC:1-1}}<h1 id=\"a\">A</h1><h2 id=\"a1\">A1</h2>";
        let out = inject(html, true, false);
        assert!(out.contains("#a"));
        assert!(!out.contains("#a1"));
    }
}
