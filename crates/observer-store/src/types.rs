//! Object store trait and listing types

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::filters::SyncFilters;

/// One object returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    #[serde(default)]
    pub size: u64,
}

/// One page of a prefix listing
///
/// `common_prefixes` are only populated for delimited listings and always
/// end with the delimiter. `next_continuation` is `Some` while more pages
/// remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
    pub next_continuation: Option<String>,
}

/// Blocking access to a hierarchical object store
///
/// Implementations own transport, retries and auth. Errors are surfaced
/// as-is; callers do not retry.
pub trait ObjectStore: Send + Sync {
    /// List a single page of keys under `prefix`
    fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError>;

    /// Fetch an object's full contents
    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Mirror every object under `remote_prefix` into `local_dir`
    fn sync_down(&self, remote_prefix: &str, local_dir: &Path) -> Result<(), StoreError>;

    /// Mirror files from `local_dir` that pass `filters` to `remote_prefix`
    fn sync_up(
        &self,
        local_dir: &Path,
        remote_prefix: &str,
        filters: &SyncFilters,
    ) -> Result<(), StoreError>;

    /// List every page under `prefix`, following continuation tokens until
    /// the store reports none remain
    ///
    /// A token handed back a second time fails with `StalledPagination`.
    fn list_all(&self, prefix: &str, delimiter: Option<&str>) -> Result<ListPage, StoreError> {
        let mut listing = ListPage::default();
        let mut token: Option<String> = None;
        let mut seen: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self.list_page(prefix, delimiter, token.as_deref())?;
            pages += 1;
            debug!(
                prefix,
                page = pages,
                objects = page.objects.len(),
                common_prefixes = page.common_prefixes.len(),
                "listed page"
            );

            listing.objects.extend(page.objects);
            listing.common_prefixes.extend(page.common_prefixes);

            match page.next_continuation {
                Some(next) => {
                    if !seen.insert(next.clone()) {
                        return Err(StoreError::StalledPagination {
                            prefix: prefix.to_string(),
                            token: next,
                        });
                    }
                    token = Some(next);
                }
                None => break,
            }
        }

        Ok(listing)
    }
}

/// Shared handles forward to the inner store
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        (**self).list_page(prefix, delimiter, continuation)
    }

    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).download(key)
    }

    fn sync_down(&self, remote_prefix: &str, local_dir: &Path) -> Result<(), StoreError> {
        (**self).sync_down(remote_prefix, local_dir)
    }

    fn sync_up(
        &self,
        local_dir: &Path,
        remote_prefix: &str,
        filters: &SyncFilters,
    ) -> Result<(), StoreError> {
        (**self).sync_up(local_dir, remote_prefix, filters)
    }
}
