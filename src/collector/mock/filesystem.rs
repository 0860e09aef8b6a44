//! In-memory mock filesystem for testing the reader without real `/proc`.

use crate::collector::traits::FileSystem;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Each path holds a queue of contents. Every read consumes the front entry
/// until only one remains; the last entry is then returned on every read.
/// This models a pseudo-file whose counters move between two samples.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: RefCell<HashMap<PathBuf, VecDeque<String>>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the content of a file, replacing any queued contents.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .get_mut()
            .insert(path.as_ref().to_path_buf(), VecDeque::from([content.into()]));
    }

    /// Queues another content for a file, returned after the earlier ones.
    pub fn push_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .get_mut()
            .entry(path.as_ref().to_path_buf())
            .or_default()
            .push_back(content.into());
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let mut files = self.files.borrow_mut();
        let queue = files.get_mut(path).filter(|q| !q.is_empty()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })?;

        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or_default())
        } else {
            Ok(queue.front().cloned().unwrap_or_default())
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .get(path)
            .is_some_and(|q| !q.is_empty())
    }
}
