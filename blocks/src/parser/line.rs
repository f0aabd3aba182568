/// Fence tag marking an evaluable snippet.
pub const RUNNABLE_TAG: &str = "edgerules";

/// Fence tag marking the expected result of the preceding snippet.
pub const OUTPUT_TAG: &str = "json";

/// Heading levels that carry context for example blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// `# Title`
    Page,
    /// `## Title`
    Section,
    /// `### Title`
    Subsection,
}

/// Classification of a single source line outside a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: HeadingLevel, text: &'a str },
    Fence { tag: Option<&'a str> },
    OutputMarker,
    Bullet(&'a str),
    Blank,
    Text(&'a str),
}

/// A line of source text with its byte span. The span excludes the line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    pub span: std::ops::Range<usize>,
}

/// Split source text into lines, accepting both `\n` and `\r\n` endings.
/// A leading byte order mark is skipped but still counted in the spans.
pub fn split_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let (body, mut offset) = match source.strip_prefix('\u{feff}') {
        Some(rest) => (rest, '\u{feff}'.len_utf8()),
        None => (source, 0),
    };

    body.split('\n').map(move |raw| {
        let start = offset;
        offset += raw.len() + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        SourceLine {
            text,
            span: start..start + text.len(),
        }
    })
}

pub fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(tag) = fence_tag(line) {
        return Line::Fence { tag };
    }
    if let Some((level, text)) = heading(line) {
        return Line::Heading { level, text };
    }
    if is_output_marker(line) {
        return Line::OutputMarker;
    }
    // A marker with nothing after it stays plain text.
    if let Some(rest) = line.trim_start().strip_prefix("- ") {
        let rest = rest.trim();
        if !rest.is_empty() {
            return Line::Bullet(rest);
        }
    }
    Line::Text(line.trim_end())
}

/// `Some(tag)` when the line is a fence delimiter. The inner option is the
/// language tag, if the fence carries one.
pub fn fence_tag(line: &str) -> Option<Option<&str>> {
    let rest = line.strip_prefix("```")?.trim();
    if rest.is_empty() {
        return Some(None);
    }
    rest.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '+'))
        .then_some(Some(rest))
}

pub fn is_runnable_tag(tag: Option<&str>) -> bool {
    tag.is_some_and(|t| t.eq_ignore_ascii_case(RUNNABLE_TAG))
}

pub fn is_output_tag(tag: Option<&str>) -> bool {
    tag.is_some_and(|t| t.eq_ignore_ascii_case(OUTPUT_TAG))
}

fn heading(line: &str) -> Option<(HeadingLevel, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    let level = match hashes {
        1 => HeadingLevel::Page,
        2 => HeadingLevel::Section,
        3 => HeadingLevel::Subsection,
        _ => return None,
    };

    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some((level, text))
}

/// `output:` on its own, in any case, optionally wrapped in `*` or `_` emphasis.
fn is_output_marker(line: &str) -> bool {
    let stripped: String = line
        .trim()
        .chars()
        .filter(|c| !matches!(c, '*' | '_'))
        .collect();
    stripped.trim().eq_ignore_ascii_case("output:")
}
