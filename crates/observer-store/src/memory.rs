//! In-memory object store with S3-style delimiter and paging semantics

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use walkdir::WalkDir;

use crate::error::StoreError;
use crate::filters::SyncFilters;
use crate::types::{ListPage, ObjectStore, ObjectSummary};

const DEFAULT_PAGE_SIZE: usize = 1000;

enum Entry {
    Object(ObjectSummary),
    Prefix(String),
}

/// Object store kept in a sorted map
///
/// `page_size` bounds the number of entries (objects plus common prefixes)
/// per page, which lets tests force multi-page listings.
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    page_size: usize,
    writes: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
            writes: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Seed an object without counting it as a write
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.lock().insert(key.into(), data.into());
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    /// Objects written through `sync_up`
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `list_page` calls served
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn entries(&self, prefix: &str, delimiter: Option<&str>) -> Vec<Entry> {
        let objects = self.lock();
        let mut entries = Vec::new();
        let mut last_prefix: Option<String> = None;

        for (key, data) in objects.range(prefix.to_string()..) {
            let Some(rest) = key.strip_prefix(prefix) else {
                break;
            };

            let common = delimiter.and_then(|d| {
                rest.find(d)
                    .map(|idx| format!("{}{}", prefix, &rest[..idx + d.len()]))
            });

            match common {
                Some(common) => {
                    // Keys are sorted, so equal prefixes are adjacent.
                    if last_prefix.as_deref() != Some(common.as_str()) {
                        last_prefix = Some(common.clone());
                        entries.push(Entry::Prefix(common));
                    }
                }
                None => entries.push(Entry::Object(ObjectSummary {
                    key: key.clone(),
                    size: data.len() as u64,
                })),
            }
        }

        entries
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryStore {
    fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let offset = match continuation {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::NotFound(format!("continuation token {}", token)))?,
            None => 0,
        };

        let entries = self.entries(prefix, delimiter);
        let total = entries.len();
        let end = (offset + self.page_size).min(total);
        let mut page = ListPage::default();

        for entry in entries.into_iter().take(end).skip(offset) {
            match entry {
                Entry::Object(obj) => page.objects.push(obj),
                Entry::Prefix(p) => page.common_prefixes.push(p),
            }
        }

        if end < total {
            page.next_continuation = Some(end.to_string());
        }

        Ok(page)
    }

    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn sync_down(&self, remote_prefix: &str, local_dir: &Path) -> Result<(), StoreError> {
        let objects: Vec<(String, Vec<u8>)> = self
            .lock()
            .range(remote_prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(remote_prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, data) in objects {
            let relative = &key[remote_prefix.len()..];
            if relative.is_empty() || relative.ends_with('/') {
                continue;
            }
            let dest = local_dir.join(relative);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            std::fs::write(&dest, data).map_err(|e| StoreError::io(&dest, e))?;
        }
        Ok(())
    }

    fn sync_up(
        &self,
        local_dir: &Path,
        remote_prefix: &str,
        filters: &SyncFilters,
    ) -> Result<(), StoreError> {
        for entry in WalkDir::new(local_dir).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(local_dir).to_path_buf();
                StoreError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(local_dir) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !filters.matches(&relative) {
                continue;
            }

            let data = std::fs::read(entry.path()).map_err(|e| StoreError::io(entry.path(), e))?;
            self.lock()
                .insert(format!("{}{}", remote_prefix, relative), data);
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
