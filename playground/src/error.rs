use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No engine is attached yet, or it failed to load.
    Unavailable,
    Spawn { program: String, message: String },
    Io(String),
    /// The engine ran and rejected the snippet.
    Evaluation(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Unavailable => write!(f, "evaluation engine is not available"),
            EngineError::Spawn { program, message } => {
                write!(f, "cannot start engine '{}': {}", program, message)
            }
            EngineError::Io(msg) => write!(f, "I/O error: {}", msg),
            EngineError::Evaluation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Io(error.to_string())
    }
}
