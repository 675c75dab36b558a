use std::path::{Path, PathBuf};

/// Working directory of one agent session.
///
/// Capabilities resolve relative paths against this instead of the process
/// cwd, so `change_directory` only affects the session that issued it.
#[derive(Debug, Clone)]
pub struct Workspace {
    cwd: PathBuf,
}

impl Workspace {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Workspace { cwd: cwd.into() }
    }

    pub fn current_process_dir() -> std::io::Result<Self> {
        Ok(Workspace::new(std::env::current_dir()?))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub(crate) fn set_cwd(&mut self, cwd: PathBuf) {
        self.cwd = cwd;
    }
}
