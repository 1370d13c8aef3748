//! local identity cache
//! single key on disk, read at startup, written once when a token is minted

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::error::{TerminalClientError, ClientErrorCode};

pub struct IdCache {
    file_path: PathBuf,
}

impl IdCache {
    pub fn new(file_path: &str) -> Self {
        IdCache {
            file_path: PathBuf::from(file_path),
        }
    }

    /// read the cached token, Ok(None) when nothing has been minted yet
    pub fn load(&self) -> Result<Option<String>, TerminalClientError> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) => {
                let token = content.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TerminalClientError {
                code: ClientErrorCode::IdCacheError,
                msg: format!("cannot read identity cache {}: {}", self.file_path.display(), e),
            }),
        }
    }

    pub fn store(&self, token: &str) -> Result<(), TerminalClientError> {
        if let Some(parent) = self.file_path.parent() {
            if parent != Path::new("") {
                fs::create_dir_all(parent).map_err(|e| TerminalClientError {
                    code: ClientErrorCode::IdCacheError,
                    msg: format!("cannot create cache dir {}: {}", parent.display(), e),
                })?;
            }
        }
        fs::write(&self.file_path, token).map_err(|e| TerminalClientError {
            code: ClientErrorCode::IdCacheError,
            msg: format!("cannot write identity cache {}: {}", self.file_path.display(), e),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IdCache::new(dir.path().join("terminal_id").to_str().unwrap());
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = IdCache::new(dir.path().join("nested/terminal_id").to_str().unwrap());
        cache.store("TERM-A1B2C3").unwrap();
        assert_eq!(cache.load().unwrap().as_deref(), Some("TERM-A1B2C3"));
    }

    #[test]
    fn test_whitespace_only_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal_id");
        fs::write(&path, "  \n").unwrap();
        let cache = IdCache::new(path.to_str().unwrap());
        assert!(cache.load().unwrap().is_none());
    }
}
