//! Command execution handler: run a shell command as a step.

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::process::Stdio;
use strata_application::{HandlerError, StepHandler};
use strata_domain::util::truncate_head_tail;
use strata_domain::{Step, StepOutput};
use tokio::process::Command;
use tracing::debug;

/// Step kind this handler is conventionally registered under.
pub const COMMAND_KIND: &str = "command";

/// Maximum captured output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Runs a shell command described by the step's parameters.
///
/// Parameters:
/// - `command` (string, required): the command line to execute
/// - `working_dir` (string, optional): working directory
///
/// The step's timeout is enforced by the scheduler, not here.
#[derive(Debug, Clone, Default)]
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepHandler for CommandHandler {
    async fn execute(&self, step: &Step) -> Result<StepOutput, HandlerError> {
        let command_str = step
            .parameters
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::invalid_parameters("'command' is required"))?;

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command_str]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command_str]);
            c
        };

        if let Some(dir) = step.parameters.get("working_dir").and_then(|v| v.as_str()) {
            let path = Path::new(dir);
            if !path.is_dir() {
                return Err(HandlerError::invalid_parameters(format!(
                    "'{dir}' is not a directory"
                )));
            }
            cmd.current_dir(path);
        }

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        debug!(step = %step.id, command = command_str, "running command");

        let output = cmd.output().await.map_err(|e| {
            HandlerError::execution_failed(format!("failed to spawn command: {e}"))
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(HandlerError::execution_failed(format!(
                "command exited with code {exit_code}: {}",
                truncate_head_tail(stderr.trim(), 2_000)
            )));
        }

        let mut content = truncate_head_tail(&stdout, MAX_OUTPUT_SIZE);
        if content.is_empty() && !stderr.is_empty() {
            content = truncate_head_tail(&stderr, MAX_OUTPUT_SIZE);
        }

        Ok(StepOutput::text(content).with_data(json!({ "exit_code": exit_code })))
    }
}
