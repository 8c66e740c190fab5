//! Log artifact access.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{LogError, LogResult};

/// Fully resolved location of a solver log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogPath(PathBuf);

impl LogPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// `media_root / case_dir / log_file`, with any leading `/` on `case_dir`
    /// dropped so it stays relative to the media root.
    pub fn resolve(media_root: &Path, case_dir: &str, log_file: &str) -> Self {
        Self(
            media_root
                .join(case_dir.trim_start_matches('/'))
                .join(log_file),
        )
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for LogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Source of raw log lines and their freshness.
pub trait LogReader: Send + Sync {
    /// Read the whole log as lines, terminators stripped.
    fn read_lines(&self, path: &LogPath) -> LogResult<Vec<String>>;

    /// Modification time of the log, without parsing it.
    fn last_modified(&self, path: &LogPath) -> LogResult<DateTime<Utc>>;
}

/// Reads logs straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLogReader;

fn io_error(path: &LogPath, err: io::Error) -> LogError {
    match err.kind() {
        io::ErrorKind::NotFound => LogError::NotFound {
            path: path.as_path().to_path_buf(),
        },
        _ => LogError::Access {
            path: path.as_path().to_path_buf(),
            source: err,
        },
    }
}

impl LogReader for FsLogReader {
    fn read_lines(&self, path: &LogPath) -> LogResult<Vec<String>> {
        let bytes = fs::read(path.as_path()).map_err(|e| io_error(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().map(str::to_string).collect())
    }

    fn last_modified(&self, path: &LogPath) -> LogResult<DateTime<Utc>> {
        let meta = fs::metadata(path.as_path()).map_err(|e| io_error(path, e))?;
        let modified = meta.modified().map_err(|e| io_error(path, e))?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_strips_leading_slash() {
        let path = LogPath::resolve(Path::new("/srv/media"), "/runs/wing", "log.pisoFoam");
        assert_eq!(path.as_path(), Path::new("/srv/media/runs/wing/log.pisoFoam"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = LogPath::new(std::env::temp_dir().join("pv_log_reader_missing.log"));
        let _ = fs::remove_file(path.as_path());

        let err = FsLogReader.read_lines(&path).unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));

        let err = FsLogReader.last_modified(&path).unwrap_err();
        assert!(matches!(err, LogError::NotFound { .. }));
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let path = LogPath::new(std::env::temp_dir().join("pv_log_reader_crlf.log"));
        fs::write(path.as_path(), "Time = 1\r\nend\r\n").unwrap();

        let lines = FsLogReader.read_lines(&path).unwrap();
        assert_eq!(lines, vec!["Time = 1".to_string(), "end".to_string()]);
    }
}
