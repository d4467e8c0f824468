use std::process::{Command, Output, Stdio};

use crate::errors::FreezeError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting the program and its arguments.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The command line as a single string, for log messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and return its output.
    ///
    /// The child gets no stdin; stdout and stderr are captured.
    pub fn exec(&self) -> Result<Output, FreezeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        tracing::debug!("calling: {}", self.command_line());
        cmd.output().map_err(FreezeError::from)
    }

    /// Execute the command and return its stdout, failing on a non-zero exit.
    pub fn exec_checked(&self) -> Result<Vec<u8>, FreezeError> {
        let output = self.exec().map_err(|e| FreezeError::Resolution {
            message: format!("could not run `{}`: {e}", self.program),
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FreezeError::Resolution {
                message: format!(
                    "`{}` exited with {}: {}",
                    self.command_line(),
                    output.status,
                    stderr.trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}
