//! End-to-end scenarios: Markdown in, HTML document and stylesheet out.

use mdforge::{convert, parse_document, ElementType};
use pretty_assertions::assert_eq;

#[test]
fn document_skeleton_is_complete() {
    let document = convert("hello\n", "styles.css").unwrap();
    assert!(document.html.starts_with("<!DOCTYPE html>\n"));
    assert!(document.html.contains("<head>"));
    assert!(document.html.contains("<meta charset=\"utf-8\">"));
    assert!(document
        .html
        .contains("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"));
    assert!(document
        .html
        .contains("<link rel=\"stylesheet\" href=\"styles.css\">"));
    assert!(document.html.contains("<body>"));
    assert!(document.html.trim_end().ends_with("</body>"));
}

#[test]
fn heading_renders_with_classes() {
    let document = convert("# Hello\n", "styles.css").unwrap();
    assert!(document.html.contains("<h1 class=\"Bold FontSize1\">"));
    assert!(document.html.contains("Hello"));
    assert!(document.html.contains("</h1>"));
    assert!(document.stylesheet.contains(".Bold {"));
    assert!(document.stylesheet.contains(".FontSize1 {"));
}

#[test]
fn heading_bound_respects_six_levels() {
    let document = convert("###### deep\n", "styles.css").unwrap();
    assert!(document.html.contains("<h6"));

    let document = convert("####### toodeep\n", "styles.css").unwrap();
    assert!(!document.html.contains("<h1"));
    assert!(document.html.contains("<p>"));
    assert!(document.html.contains("####### toodeep"));
}

#[test]
fn emphasis_spans_render_inside_paragraph() {
    let document = convert("**bold** tail\n", "styles.css").unwrap();
    assert!(document.html.contains("<p>"));
    assert!(document.html.contains("<span class=\"Bold\">"));
    assert!(document.html.contains("bold"));
    assert!(document.html.contains(" tail"));
}

#[test]
fn horizontal_rule_bound() {
    let document = convert("---\n", "styles.css").unwrap();
    assert!(document.html.contains("<hr/>"));

    let document = convert("--\n", "styles.css").unwrap();
    assert!(!document.html.contains("<hr"));
    assert!(document.html.contains("--"));
}

#[test]
fn nested_lists_render_nested_markup() {
    let document = convert("- a\n    - b\n", "styles.css").unwrap();
    let first_ul = document.html.find("<ul>").unwrap();
    let second_ul = document.html[first_ul + 4..].find("<ul>");
    assert!(second_ul.is_some(), "expected a nested <ul>");
    assert!(document.html.contains("<li>"));
}

#[test]
fn code_block_renders_preformatted() {
    let document = convert("```let x = 1;```\n", "styles.css").unwrap();
    assert!(document.html.contains("<code class=\"Block\"><pre>"));
    assert!(document.html.contains("let x = 1;"));
    assert!(document.html.contains("</pre></code>"));
    assert!(document.stylesheet.contains(".Block {"));
}

#[test]
fn image_scenario() {
    let document = convert("![cap](u.png \"t\")\n", "styles.css").unwrap();
    assert!(document
        .html
        .contains("<img src=\"u.png\" alt=\"cap\" title=\"t\" class=\"ImageAttr\"/>"));
    assert!(document.stylesheet.contains(".ImageAttr {"));
    assert!(document.stylesheet.contains("max-width: 100%;"));
}

#[test]
fn hyperlink_scenario() {
    let document = convert("[text](https://example.com \"t\")\n", "styles.css").unwrap();
    assert!(document
        .html
        .contains("<a href=\"https://example.com\" title=\"t\">text</a>"));
}

#[test]
fn table_scenario_renders_full_structure() {
    let document = convert("|A|B|\n|---|---|\n|1|2|\n", "styles.css").unwrap();
    assert!(document.html.contains("<table class=\"TableStyle\">"));
    assert!(document.html.contains("<tr class=\"TableRow\">"));
    assert!(document.html.contains("<th class=\"TableHeader\">"));
    assert!(document.html.contains("<td class=\"TableCell\">"));
    for class in [".TableStyle {", ".TableRow {", ".TableHeader {", ".TableCell {"] {
        assert!(document.stylesheet.contains(class));
    }
}

#[test]
fn failed_table_renders_no_table_markup() {
    let document = convert("|A|B|\n|--|\n", "styles.css").unwrap();
    assert!(!document.html.contains("<table"));
    assert!(document.html.contains("|"));
    assert!(document.html.contains("A"));
    assert!(document.html.contains("B"));
}

#[test]
fn stylesheet_classes_are_unique() {
    let markdown = "# One\n\n# Two\n\n**a** **b**\n";
    let document = convert(markdown, "styles.css").unwrap();
    assert_eq!(document.stylesheet.matches(".Bold {").count(), 1);
    assert_eq!(document.stylesheet.matches(".FontSize1 {").count(), 1);
}

#[test]
fn stylesheet_always_has_default_body_rule() {
    let document = convert("", "styles.css").unwrap();
    assert!(document.stylesheet.starts_with("body {"));
    assert!(document.stylesheet.contains("margin: 2rem auto;"));
    assert!(document.stylesheet.contains("width: 80%;"));
}

#[test]
fn plain_text_content_is_preserved() {
    let input = "no markdown sigils in this sentence at all\n";
    let root = parse_document(input).unwrap();
    assert_eq!(
        root.text_content(),
        "no markdown sigils in this sentence at all"
    );
}

#[test]
fn escapes_render_literal_characters() {
    let document = convert("\\*not emphasis\\*\n", "styles.css").unwrap();
    assert!(!document.html.contains("<span"));
    assert!(document.html.contains("*not emphasis*"));
}

#[test]
fn root_is_always_the_document_start() {
    for input in ["", "# h\n", "|A|\n|---|\n|1|\n", "- x\n", "text\n"] {
        let root = parse_document(input).unwrap();
        assert_eq!(root.element_type(), ElementType::DocStart);
    }
}

#[test]
fn blockquote_renders_styled_span() {
    let document = convert("> quoted\n", "styles.css").unwrap();
    assert!(document.html.contains("<span class=\"BlockQuote\">"));
    assert!(document.stylesheet.contains(".BlockQuote {"));
    assert!(document.stylesheet.contains("border-left: 2px solid purple;"));
}

#[test]
fn mixed_document_end_to_end() {
    let markdown = "\
# Title

Intro with **bold**, *italic*, and `code`.

- first
- second

1. one
2. two

---

|H1|H2|
|---|---|
|a|b|

![img](pic.png)

[site](https://example.com)
";
    let document = convert(markdown, "styles.css").unwrap();

    for fragment in [
        "<h1 class=\"Bold FontSize1\">",
        "<span class=\"Bold\">",
        "<span class=\"Italic\">",
        "<code class=\"Inline\">",
        "<ul>",
        "<ol>",
        "<li>",
        "<hr/>",
        "<table class=\"TableStyle\">",
        "<img src=\"pic.png\"",
        "<a href=\"https://example.com\"",
    ] {
        assert!(
            document.html.contains(fragment),
            "missing fragment {:?} in:\n{}",
            fragment,
            document.html
        );
    }

    // one class block per used attribute
    for class in [".Bold {", ".Italic {", ".Inline {", ".TableStyle {"] {
        assert_eq!(document.stylesheet.matches(class).count(), 1);
    }
}
