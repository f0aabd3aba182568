use crate::error::EngineError;
use crate::format::pretty_json;

/// The result of evaluating one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Display text as produced by the engine.
    pub formatted: String,
    /// Two-space indented JSON, when the result serializes to JSON.
    pub json: Option<String>,
}

impl Evaluation {
    /// Build an evaluation from raw engine output. JSON output is normalized.
    pub fn from_output(raw: &str) -> Self {
        Evaluation {
            formatted: raw.trim().to_string(),
            json: pretty_json(raw),
        }
    }
}

/// The evaluation engine as seen by the documentation site.
///
/// The engine itself is an external artifact; anything that evaluates an
/// example's snippet receives an implementation of this trait explicitly.
pub trait Engine {
    fn evaluate(&mut self, code: &str) -> Result<Evaluation, EngineError>;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn evaluate(&mut self, code: &str) -> Result<Evaluation, EngineError> {
        (**self).evaluate(code)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn evaluate(&mut self, code: &str) -> Result<Evaluation, EngineError> {
        (**self).evaluate(code)
    }
}
