use std::ops::Range;

use serde::{Deserialize, Serialize};

/// One runnable example extracted from a documentation page.
///
/// Heading context is inherited from the nearest preceding headings: a `##`
/// heading clears the subtitle and a `#` heading clears both section fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleBlock {
    /// Nearest `#` heading.
    pub page_title: Option<String>,
    /// Nearest `##` heading since the last `#`.
    pub section_title: Option<String>,
    /// Nearest `###` heading since the last `##`.
    pub section_subtitle: Option<String>,
    /// Free text before the snippet. Paragraphs are separated by one blank line.
    pub description: String,
    /// Contents of one `edgerules` fence with surrounding blank lines removed.
    pub code_example: String,
    /// Expected evaluation result, from a `json` fence or freeform text after `output:`.
    #[serde(default)]
    pub output: Option<String>,
    /// Byte span in source for error reporting.
    #[serde(skip)]
    pub span: Range<usize>,
}

impl ExampleBlock {
    pub fn has_content(&self) -> bool {
        !self.code_example.trim().is_empty()
            || !self.description.trim().is_empty()
            || self.output.as_deref().is_some_and(|o| !o.trim().is_empty())
    }

    pub fn has_code(&self) -> bool {
        !self.code_example.trim().is_empty()
    }

    /// The expected output, or an empty string when the block has none.
    pub fn output_text(&self) -> &str {
        self.output.as_deref().unwrap_or("")
    }

    /// `Page / Section`, or whichever of the two is set.
    pub fn context_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.page_title.as_deref(), self.section_title.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" / "))
        }
    }
}
