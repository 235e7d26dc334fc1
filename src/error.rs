use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    // Traversal
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Per-file indexing
    #[error("unreadable file: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file size unavailable: {}", .path.display())]
    SizeUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Runtime
    #[error("indexing worker {0} panicked")]
    WorkerPanicked(usize),

    // Third-party extensibility
    #[error("source error: {0}")]
    Source(String),
}

impl IndexError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. }
            | Self::Unreadable { path: p, .. }
            | Self::SizeUnavailable { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether an indexing run can continue past this error.
    ///
    /// Recoverable errors concern a single file or directory entry. Under
    /// [`FailurePolicy::Skip`](crate::FailurePolicy::Skip) they are collected
    /// into [`IndexResult::skipped`](crate::IndexResult::skipped) and the run
    /// keeps going.
    ///
    /// Fatal errors (missing root, worker panic, source failure) always end the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::SymlinkLoop(_)
                | Self::Io { .. }
                | Self::Unreadable { .. }
                | Self::SizeUnavailable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn per_file_errors_are_recoverable() {
        let unreadable = IndexError::Unreadable {
            path: "a.txt".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let vanished = IndexError::SizeUnavailable {
            path: "b.txt".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };

        assert!(unreadable.is_recoverable());
        assert!(vanished.is_recoverable());
        assert_eq!(vanished.path(), Some(&PathBuf::from("b.txt")));
    }

    #[test]
    fn run_level_errors_are_fatal() {
        assert!(!IndexError::NotFound("/missing".into()).is_recoverable());
        assert!(!IndexError::WorkerPanicked(2).is_recoverable());
        assert!(!IndexError::Source("backend offline".into()).is_recoverable());
        assert_eq!(IndexError::WorkerPanicked(2).path(), None);
    }

    #[test]
    fn display_names_the_path() {
        let err = IndexError::NotFound("/data/corpus".into());
        assert_eq!(err.to_string(), "path not found: /data/corpus");
    }
}
