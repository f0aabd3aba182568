use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::engine::{Engine, Evaluation};
use crate::error::EngineError;

/// Evaluates snippets by running an external command once per snippet.
///
/// The snippet is written to the command's stdin. A zero exit status means
/// success and stdout is the result; otherwise stderr is the error message.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ProcessEngine {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Engine for ProcessEngine {
    fn evaluate(&mut self, code: &str) -> Result<Evaluation, EngineError> {
        debug!("evaluating {} bytes with '{}'", code.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        // Stdin is fed from its own thread while stdout and stderr are drained.
        // The handle drops when the thread ends, closing the pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = code.as_bytes().to_vec();
            thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output()?;
        let written = match writer.map(|handle| handle.join()) {
            None | Some(Ok(Ok(()))) => Ok(()),
            // The engine stopped reading early; its exit status decides.
            Some(Ok(Err(e))) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("engine closed stdin before reading the whole snippet");
                Ok(())
            }
            Some(Ok(Err(e))) => Err(EngineError::from(e)),
            Some(Err(_)) => Err(EngineError::Io("stdin writer panicked".to_string())),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("engine exited with {}", output.status)
            } else {
                stderr
            };
            debug!("engine rejected snippet: {}", message);
            return Err(EngineError::Evaluation(message));
        }
        written?;

        Ok(Evaluation::from_output(&String::from_utf8_lossy(&output.stdout)))
    }
}
