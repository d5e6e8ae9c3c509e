//! Stage command templates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configured command line for one stage.
///
/// Arguments may contain `{input}`, `{output}` and `{channel}`; they are
/// substituted per job by [`StageCommand::render`]. A placeholder may be
/// embedded in a longer argument (`--out={output}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCommand {
    /// Program to execute (looked up on `PATH` when not a path)
    pub program: String,
    /// Argument template
    #[serde(default)]
    pub args: Vec<String>,
}

impl StageCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitute placeholders and produce a runnable command
    pub fn render(&self, values: &Placeholders<'_>, working_dir: Option<&Path>) -> ToolCommand {
        let input = values.input.to_string_lossy();
        let output = values
            .output
            .map(|p| p.to_string_lossy())
            .unwrap_or_default();
        let channel = values.channel.to_string();

        let args = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{channel}", &channel)
            })
            .collect();

        ToolCommand {
            program: self.program.clone(),
            args,
            working_dir: working_dir.map(Path::to_path_buf),
        }
    }
}

/// Per-job values substituted into a [`StageCommand`]
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub channel: i32,
}

/// Fully rendered invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
