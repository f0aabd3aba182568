use blocks::description::render_description;
use playground::{Engine, EngineStatus, ExampleRow, Playground};

/// Readable text rendering of a page's examples.
///
/// Once the playground has an engine, each snippet is followed by the
/// engine's result. Before that it is followed by the output recorded in
/// the page.
pub fn render_page<E: Engine>(playground: &Playground<E>) -> String {
    let mut out = String::new();
    for (index, row) in playground.rows().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        render_row(&mut out, row);

        let result = match playground.status() {
            EngineStatus::Loading => row.block.output.clone(),
            _ => playground.output_doc(index),
        };
        if let Some(result) = result.filter(|r| !r.trim().is_empty()) {
            out.push_str("=>\n");
            push_indented(&mut out, &result);
        }
    }
    out
}

fn render_row(out: &mut String, row: &ExampleRow) {
    if let Some(label) = row.block.context_label() {
        out.push_str(&format!("== {} ==\n", label));
    }
    if let Some(subtitle) = &row.block.section_subtitle {
        out.push_str(&format!("-- {} --\n", subtitle));
    }
    for paragraph in render_description(&row.block.description) {
        out.push_str(&paragraph.to_string());
        out.push_str("\n\n");
    }
    if !row.input.trim().is_empty() {
        push_indented(out, &row.input);
    }
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
}
