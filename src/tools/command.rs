use async_trait::async_trait;
use tokio::process::Command;

use crate::{error::ToolError, tools::{LooperTool, ToolContext}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCommand {
    pub command: String,
}

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl LooperTool for RunCommand {
    fn activity(&self) -> &'static str {
        "executing command"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        tracing::info!(command = %self.command, cwd = %ctx.workspace.cwd().display(), "running shell command");

        let out = shell(&self.command)
            .current_dir(ctx.workspace.cwd())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        let stderr = String::from_utf8_lossy(&out.stderr);

        let mut report = format!("Command: {}\n", self.command);
        if !stdout.is_empty() {
            report.push_str(&format!("Output: {stdout}\n"));
        }
        if !stderr.is_empty() {
            report.push_str(&format!("Error: {stderr}\n"));
        }
        match out.status.code() {
            Some(code) => report.push_str(&format!("Return code: {code}")),
            None => report.push_str("Return code: terminated by signal"),
        }
        Ok(report)
    }
}
