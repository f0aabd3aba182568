pub mod line;
mod scan;
pub mod warning;

pub use scan::{Fence, FenceKind, ScanState};
pub use warning::{ParseWarning, WarningKind};

use crate::block::ExampleBlock;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Extract every example block in document order.
    pub fn parse(&self) -> Vec<ExampleBlock> {
        self.parse_with_warnings().0
    }

    /// Extract example blocks together with non-fatal warnings about the source.
    pub fn parse_with_warnings(&self) -> (Vec<ExampleBlock>, Vec<ParseWarning>) {
        scan::scan(&self.source, self.file_id)
    }
}

/// Extract every example block from `markdown`. Never fails: malformed input
/// degrades to best-effort structure.
pub fn parse(markdown: &str) -> Vec<ExampleBlock> {
    scan::scan(markdown, 0).0
}
