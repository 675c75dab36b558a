use async_trait::async_trait;
use walkdir::{DirEntry, WalkDir};

use crate::{error::ToolError, tools::{LooperTool, ToolContext}};

/// Dot-entries that still show up in a project overview.
const VISIBLE_DOTFILES: [&str; 2] = [".gitignore", ".env.example"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDirectory {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDirectory {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadProjectStructure {
    pub base: String,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCurrentDirectory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDirectory {
    pub path: String,
}

#[async_trait]
impl LooperTool for CreateDirectory {
    fn activity(&self) -> &'static str {
        "creating directory"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        tokio::fs::create_dir_all(ctx.workspace.resolve(&self.path)).await?;
        Ok(format!("📁 Directory '{}' created successfully.", self.path))
    }
}

#[async_trait]
impl LooperTool for ListDirectory {
    fn activity(&self) -> &'static str {
        "listing directory"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let shown = if self.path.is_empty() { "." } else { self.path.as_str() };
        let mut entries = tokio::fs::read_dir(ctx.workspace.resolve(&self.path)).await?;

        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_dir = tokio::fs::metadata(entry.path()).await.map(|m| m.is_dir()).unwrap_or(false);
            items.push((name, is_dir));
        }
        items.sort();

        let lines: Vec<String> = items
            .into_iter()
            .map(|(name, is_dir)| if is_dir { format!("📁 {name}/") } else { format!("📄 {name}") })
            .collect();
        Ok(format!("📂 Contents of '{shown}':\n{}", lines.join("\n")))
    }
}

fn is_listed(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    !name.starts_with('.') || VISIBLE_DOTFILES.iter().any(|keep| *keep == name)
}

fn size_label(bytes: u64) -> String {
    if bytes < 1024 {
        format!(" ({bytes} bytes)")
    } else {
        format!(" ({}KB)", bytes / 1024)
    }
}

#[async_trait]
impl LooperTool for ReadProjectStructure {
    fn activity(&self) -> &'static str {
        "reading project structure"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let root = ctx.workspace.resolve(&self.base);
        if !tokio::fs::metadata(&root).await?.is_dir() {
            return Err(ToolError::NotADirectory(self.base.clone()));
        }

        // Levels 0..=max_depth below the root; unreadable directories drop out.
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(self.max_depth.saturating_add(1))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_listed)
            .filter_map(Result::ok);

        let mut structure = Vec::new();
        for entry in walker {
            let indent = "  ".repeat(entry.depth() - 1);
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() {
                structure.push(format!("{indent}📁 {name}/"));
            } else {
                let size = entry.metadata().map(|m| size_label(m.len())).unwrap_or_default();
                structure.push(format!("{indent}📄 {name}{size}"));
            }
        }

        Ok(format!("🗂️  Project structure for '{}':\n{}", self.base, structure.join("\n")))
    }
}

#[async_trait]
impl LooperTool for GetCurrentDirectory {
    fn activity(&self) -> &'static str {
        "getting current directory"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        Ok(format!("📍 Current directory: {}", ctx.workspace.cwd().display()))
    }
}

#[async_trait]
impl LooperTool for ChangeDirectory {
    fn activity(&self) -> &'static str {
        "changing directory"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        let target = tokio::fs::canonicalize(ctx.workspace.resolve(&self.path)).await?;
        if !tokio::fs::metadata(&target).await?.is_dir() {
            return Err(ToolError::NotADirectory(self.path.clone()));
        }

        tracing::info!(cwd = %target.display(), "session directory changed");
        ctx.workspace.set_cwd(target);
        Ok(format!("📍 Changed directory to: {}", ctx.workspace.cwd().display()))
    }
}
