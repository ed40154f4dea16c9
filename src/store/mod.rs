//! Post storage.
//!
//! [`PostStore`] is the whole contract the HTTP layer relies on. Every
//! operation is atomic: a concurrent caller never observes a half-applied
//! create or delete, and ids are issued exactly once.
//!
//! [`MemoryStore`] is the only implementation. A durable backend would
//! implement the same trait and lean on its own transactions for atomicity.

mod memory;

use thiserror::Error;

use crate::post::{Post, PostId};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The id does not exist. Not transient; retrying will not help.
    #[error("post {0} not found")]
    NotFound(PostId),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// CRUD access to posts.
///
/// Returned posts are copies. Mutating them does not touch stored state.
pub trait PostStore: Send + Sync + 'static {
    /// Snapshot of every stored post, in no particular order.
    fn get_all(&self) -> Result<Vec<Post>, StoreError>;

    fn get(&self, id: PostId) -> Result<Post, StoreError>;

    /// Store `post`, assigning its id and timestamps in place. Whatever the
    /// caller put in those fields is overwritten.
    fn create(&self, post: &mut Post) -> Result<(), StoreError>;

    fn delete(&self, id: PostId) -> Result<(), StoreError>;
}
