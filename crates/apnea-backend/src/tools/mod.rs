//! External tool invocation
//!
//! Every stage of the pipeline shells out to an opaque program (a bash
//! header-repair script, a Python converter, a Python analyser). This module
//! renders the configured command line for a job and runs it.

mod command;
mod invoker;

pub use command::{Placeholders, StageCommand, ToolCommand};
pub use invoker::{ProcessInvoker, ToolError, ToolInvoker, ToolOutput};
