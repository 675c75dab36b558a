use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{error::ToolError, tools::{LooperTool, ToolContext}};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFile {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
    Unsupported(String),
}

impl WriteMode {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "w" => WriteMode::Overwrite,
            "a" => WriteMode::Append,
            other => WriteMode::Unsupported(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteToFile {
    pub path: String,
    pub content: String,
    pub mode: WriteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFile {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFile {
    pub path: String,
}

async fn ensure_parent(path: &Path) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl LooperTool for CreateFile {
    fn activity(&self) -> &'static str {
        "creating file"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let target = ctx.workspace.resolve(&self.path);
        ensure_parent(&target).await?;
        tokio::fs::write(&target, &self.content).await?;
        Ok(format!("✅ File '{}' created successfully.", self.path))
    }
}

#[async_trait]
impl LooperTool for ReadFile {
    fn activity(&self) -> &'static str {
        "reading file"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let content = tokio::fs::read_to_string(ctx.workspace.resolve(&self.path)).await?;
        let rule = "-".repeat(RULE_WIDTH);
        Ok(format!("📄 Contents of '{}':\n{rule}\n{content}\n{rule}", self.path))
    }
}

#[async_trait]
impl LooperTool for WriteToFile {
    fn activity(&self) -> &'static str {
        "writing to file"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let target = ctx.workspace.resolve(&self.path);
        let action = match &self.mode {
            WriteMode::Overwrite => {
                tokio::fs::write(&target, &self.content).await?;
                "written to"
            }
            WriteMode::Append => {
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&target)
                    .await?;
                file.write_all(self.content.as_bytes()).await?;
                file.flush().await?;
                "appended to"
            }
            WriteMode::Unsupported(flag) => return Err(ToolError::WriteMode(flag.clone())),
        };
        Ok(format!("✅ Content {action} '{}' successfully.", self.path))
    }
}

#[async_trait]
impl LooperTool for CopyFile {
    fn activity(&self) -> &'static str {
        "copying file"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let destination = ctx.workspace.resolve(&self.destination);
        ensure_parent(&destination).await?;
        tokio::fs::copy(ctx.workspace.resolve(&self.source), &destination).await?;
        Ok(format!("✅ File copied from '{}' to '{}'", self.source, self.destination))
    }
}

#[async_trait]
impl LooperTool for DeleteFile {
    fn activity(&self) -> &'static str {
        "deleting file"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        tokio::fs::remove_file(ctx.workspace.resolve(&self.path)).await?;
        Ok(format!("🗑️  File '{}' deleted successfully.", self.path))
    }
}
