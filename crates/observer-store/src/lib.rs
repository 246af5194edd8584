//! Object store capability used by the session registry

mod aws;
mod error;
mod filters;
mod memory;
mod types;

pub use aws::S3Store;
pub use error::StoreError;
pub use filters::{FilterRule, SyncFilters};
pub use memory::MemoryStore;
pub use types::{ListPage, ObjectStore, ObjectSummary};
