//! Turns the single `|`-delimited `input` string of an action turn into the
//! typed arguments of the capability it names. Pure: no I/O happens here.

use super::{
    Capability, CapabilityKind, ChangeDirectory, CopyFile, CreateDirectory, CreateFile, DeleteFile,
    FindFiles, GetCurrentDirectory, GetWeather, ListDirectory, ReadFile, ReadProjectStructure,
    RunCommand, WriteMode, WriteToFile,
};

pub const DELIMITER: char = '|';
pub const DEFAULT_STRUCTURE_DEPTH: usize = 3;

pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split(DELIMITER).map(|field| field.trim().to_string()).collect()
}

pub fn parse_input(kind: CapabilityKind, raw: &str) -> Capability {
    let fields = split_fields(raw);
    let field = |i: usize| fields.get(i).cloned();
    let first = field(0).unwrap_or_default();

    match kind {
        CapabilityKind::CreateFile => Capability::CreateFile(CreateFile {
            path: first,
            content: field(1).unwrap_or_default(),
        }),
        CapabilityKind::WriteToFile => Capability::WriteToFile(WriteToFile {
            path: first,
            content: field(1).unwrap_or_default(),
            mode: field(2).map(|m| WriteMode::from_flag(&m)).unwrap_or_default(),
        }),
        CapabilityKind::CopyFile => {
            let destination = field(1).unwrap_or_else(|| format!("{first}_copy"));
            Capability::CopyFile(CopyFile { source: first, destination })
        }
        CapabilityKind::ReadProjectStructure => {
            let base = if first.is_empty() { ".".to_string() } else { first };
            let max_depth = field(1).map_or(DEFAULT_STRUCTURE_DEPTH, |d| parse_depth(&d));
            Capability::ReadProjectStructure(ReadProjectStructure { base, max_depth })
        }
        CapabilityKind::FindFiles => Capability::FindFiles(FindFiles {
            pattern: first,
            base: field(1).unwrap_or_else(|| ".".to_string()),
        }),
        CapabilityKind::GetWeather => Capability::GetWeather(GetWeather { city: first }),
        CapabilityKind::RunCommand => Capability::RunCommand(RunCommand { command: first }),
        CapabilityKind::ReadFile => Capability::ReadFile(ReadFile { path: first }),
        CapabilityKind::CreateDirectory => {
            Capability::CreateDirectory(CreateDirectory { path: first })
        }
        CapabilityKind::ListDirectory => Capability::ListDirectory(ListDirectory { path: first }),
        CapabilityKind::DeleteFile => Capability::DeleteFile(DeleteFile { path: first }),
        CapabilityKind::GetCurrentDirectory => {
            Capability::GetCurrentDirectory(GetCurrentDirectory)
        }
        CapabilityKind::ChangeDirectory => {
            Capability::ChangeDirectory(ChangeDirectory { path: first })
        }
    }
}

// Digits only, otherwise the default depth.
fn parse_depth(field: &str) -> usize {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return DEFAULT_STRUCTURE_DEPTH;
    }
    field.parse().unwrap_or(DEFAULT_STRUCTURE_DEPTH)
}
