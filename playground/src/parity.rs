use std::fmt;

use blocks::ExampleBlock;
use log::debug;

use crate::engine::Engine;
use crate::format::pretty_json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchKind {
    /// The snippet has no recorded output to compare against.
    MissingOutput,
    /// The engine rejected the snippet.
    Execution(String),
    /// The engine's result could not be serialized to JSON.
    Unserializable,
    /// The recorded output is not valid JSON.
    InvalidExpected(String),
    OutputMismatch,
}

/// A block whose evaluation does not match its recorded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Index of the block in the parsed page.
    pub index: usize,
    pub kind: MismatchKind,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl Mismatch {
    fn new(index: usize, kind: MismatchKind) -> Self {
        Mismatch {
            index,
            kind,
            expected: None,
            actual: None,
        }
    }

    fn with_values(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::MissingOutput => write!(f, "missing output section"),
            MismatchKind::Execution(msg) => write!(f, "execution error: {}", msg),
            MismatchKind::Unserializable => write!(f, "unable to serialize evaluation result"),
            MismatchKind::InvalidExpected(msg) => write!(f, "invalid JSON in output block: {}", msg),
            MismatchKind::OutputMismatch => write!(f, "output mismatch"),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(expected) = &self.expected {
            write!(f, "\nexpected:\n{}", expected)?;
        }
        if let Some(actual) = &self.actual {
            write!(f, "\nreceived:\n{}", actual)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParityOutcome {
    Pass,
    Fail(Mismatch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityResult {
    /// `Page / Section` of the block, or `Example N` when it has no headings.
    pub label: String,
    pub outcome: ParityOutcome,
}

/// Outcome of checking every runnable block of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParityReport {
    pub results: Vec<ParityResult>,
}

impl ParityReport {
    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == ParityOutcome::Pass)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_ok(&self) -> bool {
        self.failed() == 0
    }

    pub fn mismatches(&self) -> impl Iterator<Item = (&str, &Mismatch)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            ParityOutcome::Fail(mismatch) => Some((r.label.as_str(), mismatch)),
            ParityOutcome::Pass => None,
        })
    }
}

/// Evaluate every block that has a snippet and compare the result with the
/// block's recorded output. Blocks without a snippet are skipped.
pub fn check_parity<E: Engine + ?Sized>(blocks: &[ExampleBlock], engine: &mut E) -> ParityReport {
    let mut report = ParityReport::default();

    for (index, block) in blocks.iter().enumerate() {
        if !block.has_code() {
            continue;
        }
        let label = block
            .context_label()
            .unwrap_or_else(|| format!("Example {}", index + 1));
        let outcome = match check_block(index, block, engine) {
            None => ParityOutcome::Pass,
            Some(mismatch) => {
                debug!("{}: {}", label, mismatch.kind);
                ParityOutcome::Fail(mismatch)
            }
        };
        report.results.push(ParityResult { label, outcome });
    }

    report
}

fn check_block<E: Engine + ?Sized>(
    index: usize,
    block: &ExampleBlock,
    engine: &mut E,
) -> Option<Mismatch> {
    let expected = block.output_text().trim();
    if expected.is_empty() {
        return Some(Mismatch::new(index, MismatchKind::MissingOutput));
    }

    let evaluation = match engine.evaluate(&block.code_example) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            return Some(Mismatch::new(
                index,
                MismatchKind::Execution(err.to_string()),
            ));
        }
    };

    let Some(json) = evaluation.json else {
        return Some(
            Mismatch::new(index, MismatchKind::Unserializable)
                .with_values(expected, evaluation.formatted.trim()),
        );
    };

    let expected_normalized = match serde_json::from_str::<serde_json::Value>(expected) {
        Ok(value) => format!("{:#}", value),
        Err(err) => {
            return Some(Mismatch::new(
                index,
                MismatchKind::InvalidExpected(err.to_string()),
            ));
        }
    };

    let actual_normalized = pretty_json(&json).unwrap_or_else(|| json.trim().to_string());
    if actual_normalized == expected_normalized {
        None
    } else {
        Some(
            Mismatch::new(index, MismatchKind::OutputMismatch)
                .with_values(expected_normalized, actual_normalized),
        )
    }
}
