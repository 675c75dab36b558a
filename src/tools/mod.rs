pub mod command;
pub mod directories;
pub mod files;
pub mod input;
pub mod search;
pub mod weather;

pub use command::*;
pub use directories::*;
pub use files::*;
pub use input::*;
pub use search::*;
pub use weather::*;

use async_trait::async_trait;

use crate::{
    error::{ToolError, UnknownCapability},
    workspace::Workspace,
};

/// Everything a capability may touch while it runs.
pub struct ToolContext {
    pub workspace: Workspace,
    pub http: reqwest::Client,
    pub weather_url: String,
}

impl ToolContext {
    pub fn new(workspace: Workspace, weather_url: impl Into<String>) -> Self {
        ToolContext {
            workspace,
            http: reqwest::Client::new(),
            weather_url: weather_url.into(),
        }
    }
}

#[async_trait]
pub trait LooperTool: Send + Sync {
    /// What the tool is doing, used to phrase failures ("reading file").
    fn activity(&self) -> &'static str;
    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError>;
}

/// Name-level identity of a capability, used for lookup and the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    GetWeather,
    RunCommand,
    CreateFile,
    ReadFile,
    CreateDirectory,
    ListDirectory,
    WriteToFile,
    ReadProjectStructure,
    FindFiles,
    CopyFile,
    DeleteFile,
    GetCurrentDirectory,
    ChangeDirectory,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 13] = [
        CapabilityKind::GetWeather,
        CapabilityKind::RunCommand,
        CapabilityKind::CreateFile,
        CapabilityKind::ReadFile,
        CapabilityKind::CreateDirectory,
        CapabilityKind::ListDirectory,
        CapabilityKind::WriteToFile,
        CapabilityKind::ReadProjectStructure,
        CapabilityKind::FindFiles,
        CapabilityKind::CopyFile,
        CapabilityKind::DeleteFile,
        CapabilityKind::GetCurrentDirectory,
        CapabilityKind::ChangeDirectory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CapabilityKind::GetWeather => "get_weather",
            CapabilityKind::RunCommand => "run_command",
            CapabilityKind::CreateFile => "create_file",
            CapabilityKind::ReadFile => "read_file",
            CapabilityKind::CreateDirectory => "create_directory",
            CapabilityKind::ListDirectory => "list_directory",
            CapabilityKind::WriteToFile => "write_to_file",
            CapabilityKind::ReadProjectStructure => "read_project_structure",
            CapabilityKind::FindFiles => "find_files",
            CapabilityKind::CopyFile => "copy_file",
            CapabilityKind::DeleteFile => "delete_file",
            CapabilityKind::GetCurrentDirectory => "get_current_directory",
            CapabilityKind::ChangeDirectory => "change_directory",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, UnknownCapability> {
        CapabilityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownCapability(name.to_string()))
    }

    /// One catalogue line for the system directive.
    pub fn usage(self) -> String {
        let (summary, params) = match self {
            CapabilityKind::GetWeather => ("Get current weather", "city"),
            CapabilityKind::RunCommand => ("Execute terminal commands", "command"),
            CapabilityKind::CreateFile => ("Create new file with content", "file_path|content"),
            CapabilityKind::ReadFile => ("Read file contents", "file_path"),
            CapabilityKind::CreateDirectory => ("Create directory structure", "dir_path"),
            CapabilityKind::ListDirectory => ("List directory contents", "dir_path"),
            CapabilityKind::WriteToFile => ("Write/append to file", "file_path|content|mode"),
            CapabilityKind::ReadProjectStructure => ("Get project overview", "base_path|max_depth"),
            CapabilityKind::FindFiles => ("Find files by pattern", "pattern|base_path"),
            CapabilityKind::CopyFile => ("Copy file", "source|destination"),
            CapabilityKind::DeleteFile => ("Delete file", "file_path"),
            CapabilityKind::GetCurrentDirectory => ("Get current working directory", ""),
            CapabilityKind::ChangeDirectory => ("Change working directory", "dir_path"),
        };

        if params.is_empty() {
            format!("- \"{}\": {}", self.name(), summary)
        } else {
            format!("- \"{}\": {} ({})", self.name(), summary, params)
        }
    }
}

/// A fully parsed capability call, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    GetWeather(GetWeather),
    RunCommand(RunCommand),
    CreateFile(CreateFile),
    ReadFile(ReadFile),
    CreateDirectory(CreateDirectory),
    ListDirectory(ListDirectory),
    WriteToFile(WriteToFile),
    ReadProjectStructure(ReadProjectStructure),
    FindFiles(FindFiles),
    CopyFile(CopyFile),
    DeleteFile(DeleteFile),
    GetCurrentDirectory(GetCurrentDirectory),
    ChangeDirectory(ChangeDirectory),
}

impl Capability {
    /// Resolve a capability name and its delimited input into a typed call.
    pub fn parse(name: &str, raw_input: &str) -> Result<Self, UnknownCapability> {
        let kind = CapabilityKind::from_name(name)?;
        Ok(parse_input(kind, raw_input))
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::GetWeather(_) => CapabilityKind::GetWeather,
            Capability::RunCommand(_) => CapabilityKind::RunCommand,
            Capability::CreateFile(_) => CapabilityKind::CreateFile,
            Capability::ReadFile(_) => CapabilityKind::ReadFile,
            Capability::CreateDirectory(_) => CapabilityKind::CreateDirectory,
            Capability::ListDirectory(_) => CapabilityKind::ListDirectory,
            Capability::WriteToFile(_) => CapabilityKind::WriteToFile,
            Capability::ReadProjectStructure(_) => CapabilityKind::ReadProjectStructure,
            Capability::FindFiles(_) => CapabilityKind::FindFiles,
            Capability::CopyFile(_) => CapabilityKind::CopyFile,
            Capability::DeleteFile(_) => CapabilityKind::DeleteFile,
            Capability::GetCurrentDirectory(_) => CapabilityKind::GetCurrentDirectory,
            Capability::ChangeDirectory(_) => CapabilityKind::ChangeDirectory,
        }
    }

    fn tool(&self) -> &dyn LooperTool {
        match self {
            Capability::GetWeather(t) => t,
            Capability::RunCommand(t) => t,
            Capability::CreateFile(t) => t,
            Capability::ReadFile(t) => t,
            Capability::CreateDirectory(t) => t,
            Capability::ListDirectory(t) => t,
            Capability::WriteToFile(t) => t,
            Capability::ReadProjectStructure(t) => t,
            Capability::FindFiles(t) => t,
            Capability::CopyFile(t) => t,
            Capability::DeleteFile(t) => t,
            Capability::GetCurrentDirectory(t) => t,
            Capability::ChangeDirectory(t) => t,
        }
    }

    /// Run the capability. Failures come back as a descriptive string,
    /// never as an error.
    pub async fn run(&self, ctx: &mut ToolContext) -> String {
        let tool = self.tool();
        match tool.execute(ctx).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(capability = self.kind().name(), error = %e, "capability failed");
                format!("❌ Error {}: {}", tool.activity(), e)
            }
        }
    }
}

/// Catalogue section of the system directive, one line per capability.
pub fn catalogue() -> String {
    CapabilityKind::ALL
        .into_iter()
        .map(CapabilityKind::usage)
        .collect::<Vec<_>>()
        .join("\n")
}
