use std::path::Path;

use async_trait::async_trait;
use globset::GlobBuilder;
use walkdir::WalkDir;

use crate::{error::ToolError, tools::{LooperTool, ToolContext}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindFiles {
    pub pattern: String,
    pub base: String,
}

#[async_trait]
impl LooperTool for FindFiles {
    fn activity(&self) -> &'static str {
        "finding files"
    }

    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        // Same shape as `<base>/**/<pattern>`: the pattern may match at any depth.
        let matcher = GlobBuilder::new(&format!("**/{}", self.pattern))
            .literal_separator(true)
            .build()?
            .compile_matcher();

        let root = ctx.workspace.resolve(&self.base);
        let shown_base = Path::new(&self.base);

        let matches: Vec<String> = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&root).ok()?;
                matcher
                    .is_match(relative)
                    .then(|| shown_base.join(relative).display().to_string())
            })
            .collect();

        tracing::debug!(pattern = %self.pattern, base = %self.base, hits = matches.len(), "find_files");

        if matches.is_empty() {
            Ok(format!("🔍 No files found matching '{}'", self.pattern))
        } else {
            Ok(format!("🔍 Found files matching '{}':\n{}", self.pattern, matches.join("\n")))
        }
    }
}
