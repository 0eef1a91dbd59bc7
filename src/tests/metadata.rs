use super::*;

#[test]
fn yaml_front_matter_is_stripped_before_rendering() {
    html_opts!(
        [extension.metadata],
        "---\nTitle: Doc\n---\n# Heading\n",
        "<h1>Heading</h1>\n",
    );
}

#[test]
fn pandoc_title_block_is_stripped_before_rendering() {
    html_opts!(
        [extension.metadata],
        "% My Title\n% Jane Doe\n\nBody text.\n",
        "<p>Body text.</p>\n",
    );
}

#[test]
fn mmd_metadata_is_stripped_before_rendering() {
    html_opts!(
        [extension.metadata],
        "Title: Doc\nAuthor: Ash\n\nBody text.\n",
        "<p>Body text.</p>\n",
    );
}

#[test]
fn disabled_leaves_metadata_block_as_markdown() {
    html(
        "Title: Doc\n\nBody text.\n",
        "<p>Title: Doc</p>\n<p>Body text.</p>\n",
    );
}

#[test]
fn title_feeds_standalone_wrap() {
    let mut options = Options::default();
    options.extension.metadata = true;
    options.render.standalone = true;
    let out = markdown_to_html("---\nTitle: My Page\n---\nHello.\n", &options);
    assert!(out.starts_with("<!DOCTYPE html>"));
    assert!(out.contains("<title>My Page</title>"));
    assert!(out.contains("<p>Hello.</p>"));
}
