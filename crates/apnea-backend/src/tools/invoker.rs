//! Running external programs

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use super::ToolCommand;

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// stdout followed by stderr, lossily decoded
    pub combined: String,
}

/// Why an invocation failed
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("'{program}' exited with {}", describe_exit(.exit_code))]
    Failed {
        program: String,
        exit_code: Option<i32>,
        output: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl ToolError {
    /// Whatever the program printed before failing
    pub fn output(&self) -> &str {
        match self {
            ToolError::Spawn { .. } => "",
            ToolError::Failed { output, .. } => output,
        }
    }
}

/// Executes external commands.
///
/// The pipeline only talks to tools through this trait so tests can swap in
/// scripted doubles.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the command to completion
    async fn invoke(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError>;
}

/// Runs commands as child processes.
///
/// No timeout and no output limit: a hung tool holds its job in
/// `processing` until the process ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolInvoker for ProcessInvoker {
    async fn invoke(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        tracing::debug!("Running: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|source| ToolError::Spawn {
            program: command.program.clone(),
            source,
        })?;

        let mut bytes = output.stdout;
        bytes.extend_from_slice(&output.stderr);
        let combined = String::from_utf8_lossy(&bytes).into_owned();

        if !output.status.success() {
            return Err(ToolError::Failed {
                program: command.program.clone(),
                exit_code: output.status.code(),
                output: combined,
            });
        }

        Ok(ToolOutput { combined })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: None,
        }
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let out = ProcessInvoker::new()
            .invoke(&sh("echo mean; echo warn 1>&2"))
            .await
            .unwrap();
        assert_eq!(out.combined, "mean\nwarn\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_output() {
        let err = ProcessInvoker::new()
            .invoke(&sh("echo bad header; exit 3"))
            .await
            .unwrap_err();
        match &err {
            ToolError::Failed { exit_code, .. } => assert_eq!(*exit_code, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.output(), "bad header\n");
        assert_eq!(err.to_string(), "'sh' exited with status 3");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cmd = ToolCommand {
            program: "definitely-not-a-real-tool-4f1c".to_string(),
            args: vec![],
            working_dir: None,
        };
        let err = ProcessInvoker::new().invoke(&cmd).await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_working_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = sh("pwd");
        cmd.working_dir = Some(dir.path().to_path_buf());

        let out = ProcessInvoker::new().invoke(&cmd).await.unwrap();
        let reported = std::path::PathBuf::from(out.combined.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
