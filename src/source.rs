use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::IndexError;
use crate::traits::{FileSource, SizeOracle};

// ---------------------------------------------------------------------------
// DirectorySource
// ---------------------------------------------------------------------------

/// The default [`FileSource`]: every regular file below a directory.
///
/// No filtering: hidden files are included and ignore files are not
/// honoured. Symlinked directories are not descended into; a symlink that
/// resolves to a regular file is listed under its link path. Entries are
/// sorted by file name within each directory so repeated runs see the same
/// order.
#[derive(Debug, Default, Clone)]
pub struct DirectorySource {
    max_depth: Option<usize>,
}

impl DirectorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit traversal depth. `1` means the root's direct children only.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

impl FileSource for DirectorySource {
    fn files(&self, root: &Path) -> Box<dyn Iterator<Item = Result<PathBuf, IndexError>>> {
        if !root.exists() {
            return Box::new(std::iter::once(Err(IndexError::NotFound(root.to_path_buf()))));
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .ignore(false)
            .parents(false)
            .hidden(false)
            .follow_links(false)
            .same_file_system(false)
            .max_depth(self.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b));

        let files = builder.build().filter_map(|res| match res {
            Ok(entry) => {
                let ft = entry.file_type()?;
                let is_file = ft.is_file()
                    || (ft.is_symlink()
                        && std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file()));
                is_file.then(|| Ok(entry.into_path()))
            }
            Err(e) => Some(Err(map_ignore_error(e))),
        });

        Box::new(files)
    }
}

// ---------------------------------------------------------------------------
// FsSizeOracle
// ---------------------------------------------------------------------------

/// The default [`SizeOracle`]: file metadata length.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSizeOracle;

impl SizeOracle for FsSizeOracle {
    fn size(&self, path: &Path) -> io::Result<u64> {
        std::fs::metadata(path).map(|m| m.len())
    }
}

// ---------------------------------------------------------------------------
// Map ignore::Error to IndexError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> IndexError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => match io_err.kind() {
                io::ErrorKind::PermissionDenied => IndexError::PermissionDenied(path),
                _ => IndexError::Io { path, source: io_err },
            },
            other => IndexError::Source(other.to_string()),
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Loop { child, .. } => IndexError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => IndexError::Io {
            path: PathBuf::new(),
            source: io_err,
        },
        other => IndexError::Source(other.to_string()),
    }
}
