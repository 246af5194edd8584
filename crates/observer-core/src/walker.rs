//! Discovery of session containers and sessions by delimited listing

use observer_naming::SESSION_PREFIX_MARKER;
use observer_store::ObjectStore;
use tracing::debug;

use crate::error::{RegistryError, Result};

/// Levels between the schema root and a container prefix
pub const CONTAINER_DEPTH: usize = 3;

const DELIMITER: &str = "/";

pub struct PrefixWalker<'a> {
    store: &'a dyn ObjectStore,
    schema_root: String,
}

impl<'a> PrefixWalker<'a> {
    pub fn new(store: &'a dyn ObjectStore, schema_root: impl Into<String>) -> Self {
        Self {
            store,
            schema_root: schema_root.into(),
        }
    }

    /// Container prefixes, each ending in `/`, found three levels below the
    /// schema root
    pub fn discover_containers(&self) -> Result<Vec<String>> {
        let mut frontier = vec![self.schema_root.clone()];

        for level in 0..CONTAINER_DEPTH {
            let mut next = Vec::new();
            for parent in &frontier {
                let listing = self
                    .store
                    .list_all(parent, Some(DELIMITER))
                    .map_err(RegistryError::store("list containers", parent))?;

                // An empty intermediate segment shows up as `parent//`.
                next.extend(
                    listing
                        .common_prefixes
                        .into_iter()
                        .filter(|p| !p.ends_with("//")),
                );
            }
            debug!(level, found = next.len(), "expanded prefix frontier");
            frontier = next;
        }

        Ok(frontier)
    }

    /// Session prefixes directly under `container`, relative to it
    pub fn discover_sessions(&self, container: &str) -> Result<Vec<String>> {
        let listing = self
            .store
            .list_all(container, Some(DELIMITER))
            .map_err(RegistryError::store("list sessions", container))?;

        Ok(listing
            .common_prefixes
            .iter()
            .filter_map(|p| p.strip_prefix(container))
            .filter(|rel| rel.starts_with(SESSION_PREFIX_MARKER))
            .map(str::to_string)
            .collect())
    }
}
