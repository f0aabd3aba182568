use blocks::{ExampleBlock, Parser, WarningKind, parse};
use pretty_assertions::assert_eq;

const FENCE: &str = "```";

fn fenced(tag: &str, body: &str) -> String {
    format!("{FENCE}{tag}\n{body}\n{FENCE}\n")
}

#[test]
fn empty_input_yields_nothing() {
    assert_eq!(parse(""), Vec::<ExampleBlock>::new());
    assert!(parse("\n\n   \n\r\n").is_empty());
}

#[test]
fn headings_alone_yield_nothing() {
    assert!(parse("# Page\n## Section\n### Sub\n\n").is_empty());
}

#[test]
fn single_example_with_context() {
    let md = format!(
        "# Page\n## Section\nSome desc\n\n{}",
        fenced("edgerules", "{ x: 2 }")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 1);
    let b = &blocks[0];
    assert_eq!(b.page_title.as_deref(), Some("Page"));
    assert_eq!(b.section_title.as_deref(), Some("Section"));
    assert_eq!(b.section_subtitle, None);
    assert_eq!(b.description, "Some desc");
    assert_eq!(b.code_example, "{ x: 2 }");
    assert_eq!(b.output, None);
}

#[test]
fn three_heading_levels() {
    let md = format!(
        "# Test Page\n## Test Section\n### Test Subtitle\nThis is a short description line.\n\n{}",
        fenced("edgerules", "{\n  a: 1\n}")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 1);
    let b = &blocks[0];
    assert_eq!(b.page_title.as_deref(), Some("Test Page"));
    assert_eq!(b.section_title.as_deref(), Some("Test Section"));
    assert_eq!(b.section_subtitle.as_deref(), Some("Test Subtitle"));
    assert!(b.description.contains("short description"));
    assert!(b.code_example.contains("a: 1"));
    assert!(b.has_content());
}

#[test]
fn heading_inheritance() {
    let md = format!(
        "# A\n## B\n{}## C\n{}",
        fenced("edgerules", "{ one: 1 }"),
        fenced("edgerules", "{ two: 2 }")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].page_title.as_deref(), Some("A"));
    assert_eq!(blocks[0].section_title.as_deref(), Some("B"));
    assert_eq!(blocks[1].page_title.as_deref(), Some("A"));
    assert_eq!(blocks[1].section_title.as_deref(), Some("C"));
    assert_eq!(blocks[0].code_example, "{ one: 1 }");
    assert_eq!(blocks[1].code_example, "{ two: 2 }");
}

#[test]
fn headings_reset_lower_levels() {
    let md = format!(
        "# P1\n## S1\n### T1\n{}## S2\n{}# P2\n{}",
        fenced("edgerules", "a"),
        fenced("edgerules", "b"),
        fenced("edgerules", "c")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].section_subtitle.as_deref(), Some("T1"));
    assert_eq!(blocks[1].section_title.as_deref(), Some("S2"));
    assert_eq!(blocks[1].section_subtitle, None);
    assert_eq!(blocks[2].page_title.as_deref(), Some("P2"));
    assert_eq!(blocks[2].section_title, None);
    assert_eq!(blocks[2].section_subtitle, None);
}

#[test]
fn sibling_sections_in_document_order() {
    let md = format!(
        "## First\nalpha\n{}\n## Second\nbeta\n{}",
        fenced("edgerules", "{ a: 1 }"),
        fenced("edgerules", "{ b: 2 }")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].section_title.as_deref(), Some("First"));
    assert_eq!(blocks[0].description, "alpha");
    assert_eq!(blocks[1].section_title.as_deref(), Some("Second"));
    assert_eq!(blocks[1].description, "beta");
    assert_ne!(blocks[0].code_example, blocks[1].code_example);
}

#[test]
fn n_runnable_fences_give_n_code_records() {
    let mut md = String::from("# Page\nIntro paragraph.\n\n");
    for n in 0..5 {
        md.push_str(&format!("## Section {n}\n\nText {n}\n\n"));
        md.push_str(&fenced("edgerules", &format!("{{ v: {n} }}")));
        md.push('\n');
    }
    let blocks = parse(&md);
    let with_code: Vec<_> = blocks.iter().filter(|b| b.has_code()).collect();
    assert_eq!(with_code.len(), 5);
    // The intro is kept as a description-only record.
    assert_eq!(blocks.len(), 6);
    assert_eq!(blocks[0].description, "Intro paragraph.");
    assert_eq!(blocks[0].code_example, "");
}

#[test]
fn blank_lines_around_code_are_trimmed() {
    let padded = parse(&fenced("edgerules", "\n\n{ a: 1 }\n\n  b\n\n"));
    let plain = parse(&fenced("edgerules", "{ a: 1 }\n\n  b"));
    assert_eq!(padded[0].code_example, plain[0].code_example);
    assert_eq!(plain[0].code_example, "{ a: 1 }\n\n  b");
}

#[test]
fn blank_line_runs_collapse_to_one_paragraph_break() {
    let single = parse("first\n\nsecond\n");
    let many = parse("first\n\n\n\nsecond\n");
    assert_eq!(single[0].description, "first\n\nsecond");
    assert_eq!(many[0].description, single[0].description);
}

#[test]
fn bullets_become_glyph_paragraphs() {
    let blocks = parse("Intro:\n- one\n- two\nafter\n");
    assert_eq!(blocks[0].description, "Intro:\n• one\n\n• two\n\nafter");
}

#[test]
fn empty_bullet_marker_is_plain_text() {
    let blocks = parse("- \n-\n");
    assert_eq!(blocks[0].description, "-\n-");
}

#[test]
fn output_json_fence_attaches_to_snippet() {
    let md = format!(
        "## Sum\n{}\n**Output:**\n\n{}",
        fenced("edgerules", "{ s: sum([1,2]) }"),
        fenced("json", "{\n  \"s\": 3\n}")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code_example, "{ s: sum([1,2]) }");
    assert_eq!(blocks[0].output.as_deref(), Some("{\n  \"s\": 3\n}"));
}

#[test]
fn freeform_output_after_marker() {
    let md = format!(
        "{}output:\n3\n\nNext description\n{}",
        fenced("edgerules", "{ a: 1 + 2 }"),
        fenced("edgerules", "{ b: 1 }")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].output_text(), "3");
    assert_eq!(blocks[1].description, "Next description");
    assert_eq!(blocks[1].output, None);
}

#[test]
fn repeated_marker_discards_previous_output() {
    let md = format!(
        "{}Output:\nstale\nOutput:\n{}",
        fenced("edgerules", "x"),
        fenced("json", "1")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].output.as_deref(), Some("1"));
}

#[test]
fn text_after_snippet_starts_the_next_block() {
    let md = format!(
        "{}\nExplains the second one.\n{}",
        fenced("edgerules", "first"),
        fenced("edgerules", "second")
    );
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].description, "");
    assert_eq!(blocks[1].description, "Explains the second one.");
}

#[test]
fn adjacent_snippets_are_separate_records() {
    let md = format!("{}{}", fenced("edgerules", "a"), fenced("edgerules", "b"));
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].code_example, "a");
    assert_eq!(blocks[1].code_example, "b");
}

#[test]
fn unknown_fence_folds_into_description() {
    let md = format!("Before\n{}{}", fenced("python", "print(1)"), fenced("edgerules", "x"));
    let (blocks, warnings) = Parser::new(md, 3).parse_with_warnings();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].description, "Before\nprint(1)");
    assert_eq!(blocks[0].code_example, "x");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::FoldedFence);
    assert_eq!(warnings[0].file_id, 3);
}

#[test]
fn json_fence_without_marker_is_description() {
    let md = format!("{}{}", fenced("edgerules", "x"), fenced("json", "{}"));
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].output, None);
    assert_eq!(blocks[1].description, "{}");
}

#[test]
fn unterminated_fence_is_closed_at_end() {
    let md = "## Open\n```edgerules\n{ a: 1 }\n\n";
    let (blocks, warnings) = Parser::new(md.to_string(), 0).parse_with_warnings();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code_example, "{ a: 1 }");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::UnterminatedFence);
    assert_eq!(&md[warnings[0].span.clone()], "```edgerules");
}

#[test]
fn unterminated_output_fence_keeps_output() {
    let md = format!("{}output:\n```json\n[1, 2]\n", fenced("edgerules", "x"));
    let blocks = parse(&md);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].output.as_deref(), Some("[1, 2]"));
}

#[test]
fn crlf_input_matches_lf_input() {
    let lf = format!("# P\n## S\nDesc\n\n{}", fenced("edgerules", "{ a: 1 }"));
    let crlf = lf.replace('\n', "\r\n");
    let a = parse(&lf);
    let b = parse(&crlf);
    assert_eq!(a.len(), b.len());
    assert_eq!(a[0].description, b[0].description);
    assert_eq!(a[0].code_example, b[0].code_example);
}

#[test]
fn heading_lines_inside_code_are_code() {
    let blocks = parse(&fenced("edgerules", "# not a heading\n{ a: 1 }"));
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].page_title, None);
    assert_eq!(blocks[0].code_example, "# not a heading\n{ a: 1 }");
}

#[test]
fn parse_is_deterministic() {
    let md = format!("# P\nd\n{}output:\n{}", fenced("edgerules", "a"), fenced("json", "1"));
    assert_eq!(parse(&md), parse(&md));
}

#[test]
fn span_covers_block_source() {
    let md = format!("# P\nDesc\n{}", fenced("edgerules", "{ a: 1 }"));
    let blocks = parse(&md);
    let text = &md[blocks[0].span.clone()];
    assert!(text.starts_with("Desc"));
    assert!(text.ends_with(FENCE));
}

#[test]
fn serializes_with_camel_case_names() {
    let blocks = parse(&format!("# P\n{}", fenced("edgerules", "a")));
    let json = serde_json::to_value(&blocks[0]).unwrap();
    assert_eq!(json["pageTitle"], "P");
    assert_eq!(json["sectionTitle"], serde_json::Value::Null);
    assert_eq!(json["codeExample"], "a");
    assert!(json.get("span").is_none());
}

#[test]
fn context_label_joins_titles() {
    let blocks = parse(&format!("# P\n## S\n{}", fenced("edgerules", "a")));
    assert_eq!(blocks[0].context_label().as_deref(), Some("P / S"));
    let bare = parse(&fenced("edgerules", "a"));
    assert_eq!(bare[0].context_label(), None);
}

#[test]
fn documentation_page_fixture() {
    let markdown = include_str!("fixtures/BASE_EXAMPLES.md");
    let (blocks, warnings) = Parser::new(markdown.to_string(), 0).parse_with_warnings();

    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    // The page introduction plus six examples.
    assert_eq!(blocks.len(), 7);

    let intro = &blocks[0];
    assert_eq!(intro.page_title.as_deref(), Some("Basics"));
    assert!(!intro.has_code());
    assert!(intro.description.starts_with("EdgeRules programs"));

    for block in &blocks[1..] {
        assert!(block.has_code(), "no code in {:?}", block.context_label());
        assert!(
            !block.output_text().is_empty(),
            "no output in {:?}",
            block.context_label()
        );
    }

    let arithmetic = &blocks[1];
    assert_eq!(arithmetic.section_title.as_deref(), Some("Number"));
    assert_eq!(arithmetic.section_subtitle.as_deref(), Some("Arithmetic"));
    assert!(arithmetic.code_example.starts_with("{\n    summing"));
    assert!(arithmetic.output_text().contains("\"power\": 256"));

    let comparisons = &blocks[2];
    assert_eq!(comparisons.section_subtitle.as_deref(), Some("Comparisons"));
    assert_eq!(
        comparisons.description,
        "Numeric comparisons:\n• `<`, `<=`, `>`, `>=`\n\n• `=` and `<>`"
    );

    let boolean = &blocks[3];
    assert_eq!(boolean.section_title.as_deref(), Some("Boolean"));
    assert_eq!(boolean.section_subtitle, None);
    assert_eq!(
        boolean.description,
        "Booleans **true**/**false** and logical operators.\n\nOperators are `not`, `and`, `or`, `xor`."
    );

    let string = &blocks[4];
    assert!(string.code_example.starts_with('{'));
    assert!(string.code_example.ends_with('}'));

    let list = &blocks[5];
    assert_eq!(list.page_title.as_deref(), Some("Collections"));
    assert_eq!(list.section_title.as_deref(), Some("List"));
    assert_eq!(list.description, "");

    let range = &blocks[6];
    assert_eq!(range.section_title.as_deref(), Some("Range"));
    assert_eq!(range.output.as_deref(), Some("{ \"r\": 15 }"));
}
