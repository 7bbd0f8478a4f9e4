use compiler::compile_document;
use sprig::parser::Parser;

fn compile(source: &str) -> String {
    let program = Parser::new(source.to_string(), false).parse();
    compile_document(&program)
}

// ---------------------------------------------------------------------------
// Document boilerplate
// ---------------------------------------------------------------------------

#[test]
fn empty_program_emits_boilerplate() {
    assert_eq!(
        compile(""),
        "<!--Compiled with sprig.-->\n<!DOCTYPE html>\n<html>\n</html>\n<!--EOF-->"
    );
}

#[test]
fn variable_block_produces_no_output() {
    assert_eq!(compile("$vars { a = 1 }"), compile(""));
}

#[test]
fn document_markers_wrap_content() {
    let html = compile("body {\np: x\n}");
    assert!(html.starts_with("<!--Compiled with sprig.-->\n<!DOCTYPE html>\n<html>\n"));
    assert!(html.ends_with("</html>\n<!--EOF-->"));
}

// ---------------------------------------------------------------------------
// Variables and interpolation
// ---------------------------------------------------------------------------

#[test]
fn variable_reference_resolves() {
    let html = compile("$vars { title = 'My Page' }\nbody { h1: $title }");
    assert!(
        html.contains("<body>\n  <h1>My Page</h1>\n</body>"),
        "got: {}",
        html
    );
}

#[test]
fn missing_variable_left_literal() {
    let html = compile("body { h1: $missing }");
    assert!(html.contains("<h1>$missing</h1>"), "got: {}", html);
}

#[test]
fn reference_sees_most_recent_preceding_assignment() {
    let html = compile(
        "$vars { x = 1 }\nfirst { span: $x }\n$vars { x = 2 }\nsecond { span: $x }",
    );
    assert!(html.contains("<first>\n  <span>1</span>\n</first>"), "got: {}", html);
    assert!(html.contains("<second>\n  <span>2</span>\n</second>"), "got: {}", html);
}

#[test]
fn reference_before_assignment_stays_literal() {
    let html = compile("early { span: $x }\n$vars { x = 1 }");
    assert!(html.contains("<span>$x</span>"), "got: {}", html);
}

#[test]
fn interpolation_in_attribute_values() {
    let html = compile("$vars { url = 'http://x.com' }\nnav { a href=$url: Go }");
    assert!(html.contains("<a href=\"http://x.com\">Go</a>"), "got: {}", html);
}

#[test]
fn adjacent_references_and_bare_dollar() {
    let html = compile("$vars {\na = 1\nb = 2\n}\nbody {\nspan: $a-$b\np: 100$\n}");
    assert!(html.contains("<span>1-2</span>"), "got: {}", html);
    assert!(html.contains("<p>100$</p>"), "got: {}", html);
}

// ---------------------------------------------------------------------------
// Inline colon nesting
// ---------------------------------------------------------------------------

#[test]
fn colon_nesting_two_deep() {
    let html = compile("body { a href=\"x\": span: Text }");
    assert!(
        html.contains("  <a href=\"x\"><span>Text</span></a>\n"),
        "got: {}",
        html
    );
}

#[test]
fn colon_nesting_three_deep() {
    let html = compile("body { div: p: em: deep }");
    assert!(html.contains("<div><p><em>deep</em></p></div>"), "got: {}", html);
}

#[test]
fn colon_inside_quoted_attribute_is_literal() {
    let html = compile("nav { a href=\"http://x.com\": Click here }");
    assert!(
        html.contains("<nav>\n  <a href=\"http://x.com\">Click here</a>\n</nav>"),
        "got: {}",
        html
    );
}

#[test]
fn quoted_trailing_content_is_terminal() {
    let html = compile("body { p: 'a: b' }");
    assert!(html.contains("<p>a: b</p>"), "got: {}", html);
}

#[test]
fn quoted_trailing_content_unescapes() {
    let html = compile("body { p: \"say \\\"hi\\\"\" }");
    assert!(html.contains("<p>say \"hi\"</p>"), "got: {}", html);
}

#[test]
fn quoted_trailing_content_interpolates() {
    let html = compile("$vars { who = 'world' }\nbody { p: 'hello $who' }");
    assert!(html.contains("<p>hello world</p>"), "got: {}", html);
}

#[test]
fn line_without_colon_is_literal_content() {
    let html = compile("body {\njust some text\n}");
    assert!(html.contains("<body>\n  just some text\n</body>"), "got: {}", html);
}

// ---------------------------------------------------------------------------
// Nested bracket blocks
// ---------------------------------------------------------------------------

#[test]
fn nested_bracket_block() {
    let html = compile("body {\ndiv [\np: Hello\n]\n}");
    assert!(
        html.contains("<body>\n<div>\n  <p>Hello</p>\n</div>\n</body>"),
        "got: {}",
        html
    );
}

#[test]
fn nested_bracket_block_two_deep() {
    let html = compile("body {\nsection [\ndiv [\np: deep\n]\n]\n}");
    assert!(
        html.contains("<body>\n<section>\n<div>\n  <p>deep</p>\n</div>\n</section>\n</body>"),
        "got: {}",
        html
    );
}

#[test]
fn content_before_nested_block() {
    let html = compile("body {\nh1: Top\ndiv [\np: In\n]\n}");
    assert!(
        html.contains("<body>\n  <h1>Top</h1>\n<div>\n  <p>In</p>\n</div>\n</body>"),
        "got: {}",
        html
    );
}

#[test]
fn nested_block_header_attributes() {
    let html = compile("body {\ndiv class=\"row\" [\np: x\n]\n}");
    assert!(html.contains("<div class=\"row\">\n  <p>x</p>\n</div>"), "got: {}", html);
}

#[test]
fn unterminated_nested_block_absorbs_remainder() {
    let html = compile("body {\ndiv [\np: a\np: b\n}");
    assert!(
        html.contains("<body>\n<div>\n  <p>a</p>\n  <p>b</p>\n</div>\n</body>"),
        "got: {}",
        html
    );
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

#[test]
fn top_level_block_attributes() {
    let html = compile("div class=\"row\" {\np: x\n}");
    assert!(html.contains("<div class=\"row\">\n  <p>x</p>\n</div>"), "got: {}", html);
}

#[test]
fn attributes_emitted_in_sorted_key_order() {
    let html = compile("body { a id=z class=btn href=x: Hi }");
    assert!(
        html.contains("<a class=\"btn\" href=\"x\" id=\"z\">Hi</a>"),
        "got: {}",
        html
    );
}

#[test]
fn malformed_attribute_tokens_dropped() {
    let html = compile("div class=row stray {\np: x\n}");
    assert!(html.contains("<div class=\"row\">"), "got: {}", html);
    assert!(!html.contains("stray"), "got: {}", html);
}

// ---------------------------------------------------------------------------
// Degradation paths
// ---------------------------------------------------------------------------

#[test]
fn comment_lines_excluded_from_compilation() {
    let html = compile("// $vars { x = 1 }\nbody { p: $x }");
    assert!(html.contains("<p>$x</p>"), "got: {}", html);
}

#[test]
fn mismatched_top_level_delimiters_compile() {
    let html = compile("body [\np: x\n}");
    assert!(html.contains("<body>\n  <p>x</p>\n</body>"), "got: {}", html);
}

#[test]
fn full_page_round_trip() {
    let source = "\
// page metadata
$vars {
title = 'Home'
link = http://example.com
}
head {
title: $title
}
body {
h1: $title
div class=\"content\" [
p: welcome text
a href=$link: visit
]
}
footer {
p: 'contact: $title'
}";
    let html = compile(source);
    assert!(html.contains("<head>\n  <title>Home</title>\n</head>"), "got: {}", html);
    assert!(html.contains("<h1>Home</h1>"), "got: {}", html);
    assert!(
        html.contains("<div class=\"content\">\n  <p>welcome text</p>\n  <a href=\"http://example.com\">visit</a>\n</div>"),
        "got: {}",
        html
    );
    assert!(html.contains("<footer>\n  <p>contact: Home</p>\n</footer>"), "got: {}", html);
}
