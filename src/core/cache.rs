//! Bounded, recency-ordered cache of semantic compilation contexts.
//!
//! Building a [`CompilationContext`] parses the companion file and everything
//! it links to, while one analysis pass usually visits the same companion
//! once per registration. Entries are keyed by path and only reused while the
//! file text is unchanged.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::debug;

use crate::core::semantic::CompilationContext;
use crate::core::shape::ExtractError;

/// Default number of contexts kept alive.
pub const MAX_CACHE_SIZE: usize = 16;

/// LRU cache of compilation contexts. Least recently used entries come first.
///
/// The lookup → build → insert sequence is not atomic as a whole: two workers
/// missing on the same path may both build, and the later insert wins. Each
/// path still maps to at most one live entry.
pub struct CompilationCache {
    capacity: usize,
    entries: Mutex<IndexMap<PathBuf, Arc<CompilationContext>>>,
}

impl Default for CompilationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_SIZE)
    }

    /// A cache holding at most `capacity` contexts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    /// Return the context for `file_path`, building it if it is missing or was
    /// built from different text.
    pub fn get_or_build(
        &self,
        file_path: &Path,
        source_text: &str,
    ) -> Result<Arc<CompilationContext>, ExtractError> {
        if let Some(context) = self.lookup(file_path, source_text) {
            debug!(path = %file_path.display(), "compilation cache hit");
            return Ok(context);
        }

        debug!(path = %file_path.display(), "building compilation context");
        let context = Arc::new(CompilationContext::build(file_path, source_text)?);
        self.insert(file_path, Arc::clone(&context));
        Ok(context)
    }

    /// Whether a context for `file_path` is cached. Does not affect recency.
    pub fn contains(&self, file_path: &Path) -> bool {
        self.entries().contains_key(file_path)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lookup(&self, file_path: &Path, source_text: &str) -> Option<Arc<CompilationContext>> {
        let mut entries = self.entries();
        let context = entries.shift_remove(file_path)?;
        if context.source_text != source_text {
            debug!(path = %file_path.display(), "companion file changed, dropping cached context");
            return None;
        }
        // Re-inserting moves the entry to the most recently used end.
        entries.insert(file_path.to_path_buf(), Arc::clone(&context));
        Some(context)
    }

    fn insert(&self, file_path: &Path, context: Arc<CompilationContext>) {
        let mut entries = self.entries();
        entries.shift_remove(file_path);
        entries.insert(file_path.to_path_buf(), context);

        while entries.len() > self.capacity {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                debug!(path = %evicted.display(), "evicting compilation context");
            }
        }
    }

    fn entries(&self) -> MutexGuard<'_, IndexMap<PathBuf, Arc<CompilationContext>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
