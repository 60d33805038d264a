use crate::loader::{load_titles, LoadError, LoadReport};
use crate::types::TitleTable;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

struct Entry {
    table: Arc<TitleTable>,
    report: LoadReport,
    modified: Option<SystemTime>,
}

/// Memoized normalized table for one source file.
///
/// The slot lock is held for the whole load, so concurrent callers never
/// parse the same file twice and never see a half-built table.
pub struct TableCache {
    path: PathBuf,
    slot: Mutex<Option<Entry>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached table, loading it first if nothing is cached or the source
    /// file changed since the last load.
    ///
    /// Once a table is cached, a source that can no longer be read keeps
    /// serving the cached table; only the first load can fail.
    pub fn get(&self) -> Result<Arc<TitleTable>, LoadError> {
        let mut slot = self.lock();
        let modified = match source_modified(&self.path) {
            Ok(modified) => modified,
            Err(e) => return cached_or(slot.as_ref(), e),
        };
        if let Some(entry) = slot.as_ref() {
            if entry.modified == modified {
                debug!("Table cache hit for {}", self.path.display());
                return Ok(Arc::clone(&entry.table));
            }
            debug!("Source {} changed, reloading", self.path.display());
        }

        let (table, report) = match load_titles(&self.path) {
            Ok(loaded) => loaded,
            Err(e) => return cached_or(slot.as_ref(), e),
        };
        let table = Arc::new(table);
        *slot = Some(Entry {
            table: Arc::clone(&table),
            report,
            modified,
        });
        Ok(table)
    }

    /// Drop the cached table; the next [`get`](Self::get) reloads.
    pub fn invalidate(&self) {
        debug!("Invalidating table cache for {}", self.path.display());
        *self.lock() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    /// Diagnostics from the most recent successful load.
    pub fn last_report(&self) -> Option<LoadReport> {
        self.lock().as_ref().map(|e| e.report.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Entry>> {
        // The slot is only ever replaced wholesale, so a poisoned lock still
        // holds a consistent value.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fall back to an already cached table when the source cannot be read.
fn cached_or(entry: Option<&Entry>, err: LoadError) -> Result<Arc<TitleTable>, LoadError> {
    match entry {
        Some(entry) => {
            warn!("{}; serving the cached table", err);
            Ok(Arc::clone(&entry.table))
        }
        None => Err(err),
    }
}

fn source_modified(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let meta = fs::metadata(path).map_err(|e| LoadError::unavailable(path, e))?;
    // Platforms without mtime support fall back to "never changed".
    Ok(meta.modified().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::write_csv;
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn repeated_get_returns_the_same_table() {
        let file = write_csv("s1,Movie,A,,,USA,,2001,R,,,\n");
        let cache = TableCache::new(file.path());
        assert!(!cache.is_loaded());
        let a = cache.get().unwrap();
        let b = cache.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.last_report().unwrap().loaded_rows, 1);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let file = write_csv("s1,Movie,A,,,USA,,2001,R,,,\n");
        let cache = TableCache::new(file.path());
        let a = cache.get().unwrap();
        cache.invalidate();
        assert!(!cache.is_loaded());
        let b = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn source_change_is_picked_up() {
        let mut file = write_csv("s1,Movie,A,,,USA,,2001,R,,,\n");
        let cache = TableCache::new(file.path());
        assert_eq!(cache.get().unwrap().len(), 1);

        // Coarse mtime clocks need a moment to tick over.
        thread::sleep(Duration::from_millis(1100));
        writeln!(file, "s2,TV Show,B,,,India,,2010,TV-MA,,,").unwrap();
        file.flush().unwrap();

        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn removed_source_keeps_serving_the_cached_table() {
        let file = write_csv("s1,Movie,A,,,USA,,2001,R,,,\n");
        let path = file.path().to_path_buf();
        let cache = TableCache::new(&path);
        let a = cache.get().unwrap();

        std::fs::remove_file(&path).unwrap();
        let b = cache.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.is_loaded());

        cache.invalidate();
        assert!(matches!(cache.get(), Err(LoadError::DataUnavailable { .. })));
    }

    #[test]
    fn missing_source_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TableCache::new(dir.path().join("missing.csv"));
        assert!(matches!(cache.get(), Err(LoadError::DataUnavailable { .. })));
        assert!(cache.last_report().is_none());
    }

    #[test]
    fn concurrent_readers_share_one_table() {
        let file = write_csv("s1,Movie,A,,,USA,,2001,R,,,\n");
        let cache = Arc::new(TableCache::new(file.path()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get().unwrap())
            })
            .collect();
        let tables: Vec<Arc<TitleTable>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
