use blocks::ExampleBlock;
use log::debug;

use crate::engine::Engine;
use crate::format::{EngineStatus, build_output_doc};

/// One editable example: the parsed block plus the user's current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRow {
    pub block: ExampleBlock,
    /// Current editor contents, seeded from the block's snippet.
    pub input: String,
    pub output: String,
    pub error: Option<String>,
}

impl ExampleRow {
    fn new(block: ExampleBlock) -> Self {
        let input = block.code_example.clone();
        ExampleRow {
            block,
            input,
            output: String::new(),
            error: None,
        }
    }
}

/// The rows of a documentation page and the engine that evaluates them.
///
/// Rows are evaluated once an engine is attached and again whenever their
/// input is edited.
pub struct Playground<E> {
    rows: Vec<ExampleRow>,
    engine: Option<E>,
    status: EngineStatus,
}

impl<E: Engine> Playground<E> {
    pub fn new(blocks: Vec<ExampleBlock>) -> Self {
        Playground {
            rows: blocks.into_iter().map(ExampleRow::new).collect(),
            engine: None,
            status: EngineStatus::Loading,
        }
    }

    /// Attach a loaded engine and evaluate every row.
    pub fn attach(&mut self, engine: E) {
        self.engine = Some(engine);
        self.status = EngineStatus::Ready;
        for index in 0..self.rows.len() {
            self.evaluate_row(index);
        }
    }

    /// Record that the engine could not be loaded.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.engine = None;
        self.status = EngineStatus::Failed(message.into());
    }

    /// Replace a row's input. Returns false when `index` is out of range.
    pub fn edit(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(row) = self.rows.get_mut(index) else {
            return false;
        };
        row.input = value.into();
        self.evaluate_row(index);
        true
    }

    pub fn rows(&self) -> &[ExampleRow] {
        &self.rows
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    /// Text for the output pane of a row.
    pub fn output_doc(&self, index: usize) -> Option<String> {
        let row = self.rows.get(index)?;
        Some(build_output_doc(
            &self.status,
            row.error.as_deref(),
            &row.output,
        ))
    }

    fn evaluate_row(&mut self, index: usize) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let row = &mut self.rows[index];
        match engine.evaluate(&row.input) {
            Ok(evaluation) => {
                row.output = evaluation.formatted;
                row.error = None;
            }
            Err(err) => {
                debug!("row {} failed to evaluate: {}", index, err);
                row.output.clear();
                row.error = Some(err.to_string());
            }
        }
    }
}
