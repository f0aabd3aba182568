use std::ops::Range;

use log::{debug, trace};

use crate::block::ExampleBlock;
use crate::parser::line::{
    HeadingLevel, Line, SourceLine, classify, fence_tag, is_output_tag, is_runnable_tag,
    split_lines,
};
use crate::parser::warning::{ParseWarning, WarningKind};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Scan Markdown source text into example blocks plus non-fatal warnings.
pub fn scan(source: &str, file_id: usize) -> (Vec<ExampleBlock>, Vec<ParseWarning>) {
    let mut scanner = Scanner::new(file_id);
    let mut state = ScanState::Scanning;
    for line in split_lines(source) {
        state = scanner.step(state, &line);
    }
    scanner.finish(state)
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    InFence(Fence),
    InOutputCapture,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub kind: FenceKind,
    /// Span of the opening delimiter line.
    pub opened_at: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// `edgerules`: lines go to the snippet.
    Runnable,
    /// `json` inside an output section: lines go to the expected output.
    Output,
    /// Any other tag: lines fold into the description.
    Folded,
}

#[derive(Debug, Default)]
struct HeadingContext {
    page_title: Option<String>,
    section_title: Option<String>,
    section_subtitle: Option<String>,
}

impl HeadingContext {
    fn enter(&mut self, level: HeadingLevel, text: &str) {
        let text = Some(text.to_string());
        match level {
            HeadingLevel::Page => {
                self.page_title = text;
                self.section_title = None;
                self.section_subtitle = None;
            }
            HeadingLevel::Section => {
                self.section_title = text;
                self.section_subtitle = None;
            }
            HeadingLevel::Subsection => {
                self.section_subtitle = text;
            }
        }
    }
}

/// Buffers for the block currently being collected.
#[derive(Debug, Default)]
struct Accumulator {
    description: Vec<String>,
    code: Vec<String>,
    output: Vec<String>,
    /// A runnable fence was opened for this block.
    has_code: bool,
    /// The snippet fence is closed and the block waits for an optional output section.
    awaiting_output: bool,
    span: Option<Range<usize>>,
}

impl Accumulator {
    fn touch(&mut self, span: &Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(existing) => existing.start..span.end,
            None => span.clone(),
        });
    }

    fn paragraph_break(&mut self) {
        if self.description.last().is_some_and(|line| !line.is_empty()) {
            self.description.push(String::new());
        }
    }

    fn push_description(&mut self, line: &SourceLine<'_>) {
        if line.text.trim().is_empty() {
            self.paragraph_break();
        } else {
            self.description.push(line.text.trim_end().to_string());
            self.touch(&line.span);
        }
    }

    fn push_bullet(&mut self, text: &str, span: &Range<usize>) {
        self.description.push(format!("• {}", text));
        self.touch(span);
        self.paragraph_break();
    }

    fn into_block(self, context: &HeadingContext) -> Option<ExampleBlock> {
        let span = self.span?;
        let output = trim_blank_lines(&self.output).join("\n");
        Some(ExampleBlock {
            page_title: context.page_title.clone(),
            section_title: context.section_title.clone(),
            section_subtitle: context.section_subtitle.clone(),
            description: self.description.join("\n").trim().to_string(),
            code_example: trim_blank_lines(&self.code).join("\n"),
            output: if output.trim().is_empty() {
                None
            } else {
                Some(output)
            },
            span,
        })
    }
}

struct Scanner {
    file_id: usize,
    context: HeadingContext,
    acc: Accumulator,
    blocks: Vec<ExampleBlock>,
    warnings: Vec<ParseWarning>,
}

impl Scanner {
    fn new(file_id: usize) -> Self {
        Scanner {
            file_id,
            context: HeadingContext::default(),
            acc: Accumulator::default(),
            blocks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Advance the state machine by one line.
    fn step(&mut self, state: ScanState, line: &SourceLine<'_>) -> ScanState {
        match state {
            ScanState::Scanning => self.scan_line(line),
            ScanState::InFence(fence) => self.fence_line(fence, line),
            ScanState::InOutputCapture => self.capture_line(line),
        }
    }

    fn scan_line(&mut self, line: &SourceLine<'_>) -> ScanState {
        match classify(line.text) {
            Line::Heading { level, text } => {
                self.flush();
                self.context.enter(level, text);
            }
            Line::OutputMarker => {
                self.begin_output(line);
                return ScanState::InOutputCapture;
            }
            Line::Fence { tag } => return self.open_fence(tag, line),
            Line::Blank => {
                if !self.acc.awaiting_output {
                    self.acc.paragraph_break();
                }
            }
            Line::Bullet(text) => {
                self.settle();
                self.acc.push_bullet(text, &line.span);
            }
            Line::Text(_) => {
                self.settle();
                self.acc.push_description(line);
            }
        }
        ScanState::Scanning
    }

    fn fence_line(&mut self, fence: Fence, line: &SourceLine<'_>) -> ScanState {
        if fence_tag(line.text).is_some() {
            self.acc.touch(&line.span);
            return self.close_fence(fence.kind);
        }

        match fence.kind {
            FenceKind::Runnable => {
                self.acc.code.push(line.text.to_string());
                self.acc.touch(&line.span);
            }
            FenceKind::Output => {
                self.acc.output.push(line.text.to_string());
                self.acc.touch(&line.span);
            }
            FenceKind::Folded => self.acc.push_description(line),
        }
        ScanState::InFence(fence)
    }

    fn capture_line(&mut self, line: &SourceLine<'_>) -> ScanState {
        match classify(line.text) {
            Line::Heading { level, text } => {
                self.flush();
                self.context.enter(level, text);
                ScanState::Scanning
            }
            Line::OutputMarker => {
                self.begin_output(line);
                ScanState::InOutputCapture
            }
            Line::Fence { tag } if is_output_tag(tag) => {
                self.acc.output.clear();
                self.acc.touch(&line.span);
                ScanState::InFence(Fence {
                    kind: FenceKind::Output,
                    opened_at: line.span.clone(),
                })
            }
            Line::Fence { .. } => {
                self.flush();
                self.scan_line(line)
            }
            Line::Blank => {
                if self.acc.output.is_empty() {
                    ScanState::InOutputCapture
                } else {
                    self.flush();
                    ScanState::Scanning
                }
            }
            Line::Bullet(_) | Line::Text(_) => {
                self.acc.output.push(line.text.trim_end().to_string());
                self.acc.touch(&line.span);
                ScanState::InOutputCapture
            }
        }
    }

    fn begin_output(&mut self, line: &SourceLine<'_>) {
        if !self.acc.has_code {
            self.warnings.push(ParseWarning::new(
                WarningKind::StrayOutputMarker,
                "output marker without a preceding snippet",
                line.span.clone(),
                self.file_id,
            ));
        }
        self.acc.output.clear();
        self.acc.awaiting_output = false;
        self.acc.touch(&line.span);
    }

    fn open_fence(&mut self, tag: Option<&str>, line: &SourceLine<'_>) -> ScanState {
        self.settle();

        let kind = if is_runnable_tag(tag) {
            self.acc.has_code = true;
            self.acc.touch(&line.span);
            FenceKind::Runnable
        } else {
            let note = match tag {
                Some(tag) if is_output_tag(Some(tag)) => {
                    "`json` fences only count as output after an `output:` marker".to_string()
                }
                Some(tag) => format!("`{}` is not a runnable tag", tag),
                None => "fence has no language tag".to_string(),
            };
            self.warnings.push(
                ParseWarning::new(
                    WarningKind::FoldedFence,
                    "fence folded into the description",
                    line.span.clone(),
                    self.file_id,
                )
                .with_note(note),
            );
            FenceKind::Folded
        };

        ScanState::InFence(Fence {
            kind,
            opened_at: line.span.clone(),
        })
    }

    fn close_fence(&mut self, kind: FenceKind) -> ScanState {
        match kind {
            FenceKind::Runnable => {
                self.acc.awaiting_output = true;
            }
            FenceKind::Output => self.flush(),
            FenceKind::Folded => {}
        }
        ScanState::Scanning
    }

    /// Flush a snippet that is still waiting for an output section.
    fn settle(&mut self) {
        if self.acc.awaiting_output {
            self.flush();
        }
    }

    fn flush(&mut self) {
        let acc = std::mem::take(&mut self.acc);
        match acc.into_block(&self.context) {
            Some(block) if block.has_content() => {
                debug!(
                    "example block {} at {:?} ({} code bytes)",
                    self.blocks.len(),
                    block.span,
                    block.code_example.len()
                );
                self.blocks.push(block);
            }
            Some(block) => trace!("dropping empty block at {:?}", block.span),
            None => {}
        }
    }

    fn finish(mut self, state: ScanState) -> (Vec<ExampleBlock>, Vec<ParseWarning>) {
        if let ScanState::InFence(fence) = state {
            self.warnings.push(ParseWarning::new(
                WarningKind::UnterminatedFence,
                "fence is never closed",
                fence.opened_at,
                self.file_id,
            ));
            self.close_fence(fence.kind);
        }
        self.flush();
        (self.blocks, self.warnings)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop whitespace-only lines from both ends.
fn trim_blank_lines(lines: &[String]) -> &[String] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}
