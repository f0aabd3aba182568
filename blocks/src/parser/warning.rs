use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::block::ExampleBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A fence was still open at end of input and was closed implicitly.
    UnterminatedFence,
    /// A fence with an unrecognized (or missing) tag was folded into the description.
    FoldedFence,
    /// An `output:` marker appeared in a block that has no snippet.
    StrayOutputMarker,
    /// A snippet has no expected output. Raised by callers, never by the parser.
    MissingOutput,
}

/// A non-fatal finding with source location information.
#[derive(Debug, Clone)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl ParseWarning {
    pub fn new(
        kind: WarningKind,
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
    ) -> Self {
        ParseWarning {
            kind,
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn missing_output(block: &ExampleBlock, file_id: usize) -> Self {
        let warning = ParseWarning::new(
            WarningKind::MissingOutput,
            "example has no output section",
            block.span.clone(),
            file_id,
        );
        match block.context_label() {
            Some(context) => warning.with_note(format!("in {}", context)),
            None => warning,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let severity = match self.kind {
            WarningKind::MissingOutput => Severity::Error,
            _ => Severity::Warning,
        };
        Diagnostic::new(severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}
