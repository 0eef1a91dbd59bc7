use super::*;

#[test]
fn disabled_leaves_output_compact() {
    html("- one\n- two\n", "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
}

#[test]
fn indents_nested_block_structure() {
    let mut options = Options::default();
    options.render.pretty = true;
    options.extension.table = true;
    let out = markdown_to_html("> nested\n> > deeper\n", &options);
    assert!(out.contains("<blockquote>\n"));
    assert!(out.contains("  <blockquote>\n") || out.contains("  <p>deeper</p>"));
}

#[test]
fn keeps_inline_emphasis_on_one_line() {
    let mut options = Options::default();
    options.render.pretty = true;
    let out = markdown_to_html("hello *world* and **more**\n", &options);
    assert!(out.contains("<p>hello <em>world</em> and <strong>more</strong></p>"));
}

#[test]
fn leaves_code_block_contents_untouched() {
    let mut options = Options::default();
    options.render.pretty = true;
    let out = markdown_to_html("```\n  weird   spacing\n\n\n```\n", &options);
    assert!(out.contains("  weird   spacing\n\n\n"));
}
