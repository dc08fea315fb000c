use gachasim_core::{HistoryEntry, HistoryError, HistoryStore, HISTORY_KEY};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// History persisted as a JSON array in one file named after the storage key.
/// Clearing deletes the file.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{HISTORY_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_history_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("GACHASIM_HISTORY") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(format!(".{HISTORY_KEY}.json")))
}

impl HistoryStore for FileHistoryStore {
    fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(storage_error(&self.path, err)),
        };
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|err| HistoryError::Format(format!("{}: {err}", self.path.display())))
    }

    fn replace(&mut self, entries: Vec<HistoryEntry>) -> Result<(), HistoryError> {
        let body = serde_json::to_string(&entries)
            .map_err(|err| HistoryError::Format(err.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| storage_error(parent, err))?;
        }
        fs::write(&self.path, body).map_err(|err| storage_error(&self.path, err))
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(&self.path, err)),
        }
    }
}

fn storage_error(path: &Path, err: std::io::Error) -> HistoryError {
    HistoryError::Storage(format!("{}: {err}", path.display()))
}
