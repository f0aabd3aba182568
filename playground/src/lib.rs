pub mod engine;
pub mod error;
pub mod format;
pub mod parity;
pub mod process;
pub mod session;

pub use engine::{Engine, Evaluation};
pub use error::EngineError;
pub use format::{EngineStatus, build_output_doc, format_json_like};
pub use parity::{Mismatch, MismatchKind, ParityOutcome, ParityReport, ParityResult, check_parity};
pub use process::ProcessEngine;
pub use session::{ExampleRow, Playground};
