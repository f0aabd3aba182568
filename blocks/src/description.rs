use std::fmt;

use pulldown_cmark::{Event, Options, Parser as CmarkParser, Tag, TagEnd};

/// A paragraph of a rendered description: one entry per non-empty source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub lines: Vec<Vec<InlineNode>>,
}

/// Inline elements that appear within a description line.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Strong(Vec<InlineNode>),
    Emphasis(Vec<InlineNode>),
    Strikethrough(Vec<InlineNode>),
    CodeSpan(String),
    Link {
        dest: String,
        content: Vec<InlineNode>,
    },
}

/// Split a block description into paragraphs of inline-formatted lines.
///
/// Paragraphs are separated by one or more blank lines; lines are trimmed and
/// empty lines dropped.
pub fn render_description(text: &str) -> Vec<Paragraph> {
    split_paragraphs(text)
        .into_iter()
        .map(|paragraph| Paragraph {
            lines: paragraph
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(render_line)
                .collect(),
        })
        .filter(|paragraph| !paragraph.lines.is_empty())
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Render one line of text into inline nodes.
pub fn render_line(line: &str) -> Vec<InlineNode> {
    let events: Vec<Event<'_>> = CmarkParser::new_ext(line, Options::ENABLE_STRIKETHROUGH).collect();
    let mut i = 0;
    let mut inlines = Vec::new();
    while i < events.len() {
        inlines.extend(collect_inlines(&events, &mut i, &|_| false));
    }
    merge_text(inlines)
}

/// Collect inline nodes until a matching End tag. Block-level tags are
/// flattened so that their text is never lost.
fn collect_inlines(
    events: &[Event<'_>],
    i: &mut usize,
    is_end: &dyn Fn(&TagEnd) -> bool,
) -> Vec<InlineNode> {
    let mut inlines = Vec::new();

    while *i < events.len() {
        let ev = &events[*i];
        *i += 1;
        match ev {
            Event::End(tag_end) if is_end(tag_end) => break,
            Event::Text(s) => inlines.push(InlineNode::Text(s.to_string())),
            Event::Code(s) => inlines.push(InlineNode::CodeSpan(s.to_string())),
            Event::SoftBreak | Event::HardBreak => inlines.push(InlineNode::Text(" ".into())),
            Event::Start(Tag::Strong) => {
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                inlines.push(InlineNode::Strong(children));
            }
            Event::Start(Tag::Emphasis) => {
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                inlines.push(InlineNode::Emphasis(children));
            }
            Event::Start(Tag::Strikethrough) => {
                let children =
                    collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                inlines.push(InlineNode::Strikethrough(children));
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                let dest = dest_url.to_string();
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                inlines.push(InlineNode::Link { dest, content });
            }
            // Block constructs swallow their markers; put them back as text.
            Event::Start(Tag::Heading { level, .. }) => {
                inlines.push(InlineNode::Text(format!("{} ", "#".repeat(*level as usize))));
            }
            Event::Start(Tag::List(Some(start))) => {
                inlines.push(InlineNode::Text(format!("{}. ", start)));
            }
            Event::Start(Tag::BlockQuote(_)) => inlines.push(InlineNode::Text("> ".into())),
            _ => {}
        }
    }

    inlines
}

/// Join adjacent text nodes, which pulldown-cmark may split around escapes.
fn merge_text(inlines: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut merged: Vec<InlineNode> = Vec::with_capacity(inlines.len());
    for node in inlines {
        let node = match node {
            InlineNode::Strong(children) => InlineNode::Strong(merge_text(children)),
            InlineNode::Emphasis(children) => InlineNode::Emphasis(merge_text(children)),
            InlineNode::Strikethrough(children) => {
                InlineNode::Strikethrough(merge_text(children))
            }
            InlineNode::Link { dest, content } => InlineNode::Link {
                dest,
                content: merge_text(content),
            },
            other => other,
        };
        if let (Some(InlineNode::Text(prev)), InlineNode::Text(next)) = (merged.last_mut(), &node) {
            prev.push_str(next);
            continue;
        }
        merged.push(node);
    }
    merged
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for inline in line {
                write!(f, "{}", inline)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for InlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineNode::Text(s) => write!(f, "{}", s),
            InlineNode::Strong(children) => {
                write!(f, "**")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "**")
            }
            InlineNode::Emphasis(children) => {
                write!(f, "*")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "*")
            }
            InlineNode::Strikethrough(children) => {
                write!(f, "~~")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "~~")
            }
            InlineNode::CodeSpan(code) => write!(f, "`{}`", code),
            InlineNode::Link { dest, content } => {
                write!(f, "[")?;
                for child in content {
                    write!(f, "{}", child)?;
                }
                write!(f, "]({})", dest)
            }
        }
    }
}
