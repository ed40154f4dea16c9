//! In-memory post store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use super::{PostStore, StoreError};
use crate::post::{Post, PostId};

struct Shelf {
    posts: HashMap<PostId, Post>,
    next_id: PostId,
}

/// Posts held in a `HashMap` behind one exclusive lock.
///
/// Reads take the same lock as writes. Every operation is short and never
/// awaits, so a blocking `std` mutex is fine inside async handlers and no
/// lock is ever held across a network boundary. Contents are lost when the
/// store is dropped.
pub struct MemoryStore {
    shelf: Mutex<Shelf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shelf: Mutex::new(Shelf { posts: HashMap::new(), next_id: 1 }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shelf>, StoreError> {
        self.shelf
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_owned()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<Post>, StoreError> {
        let shelf = self.lock()?;
        Ok(shelf.posts.values().cloned().collect())
    }

    fn get(&self, id: PostId) -> Result<Post, StoreError> {
        let shelf = self.lock()?;
        shelf.posts.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn create(&self, post: &mut Post) -> Result<(), StoreError> {
        let mut shelf = self.lock()?;

        post.id = shelf.next_id;
        post.created_at = Utc::now();
        post.updated_at = post.created_at;

        shelf.posts.insert(post.id, post.clone());
        shelf.next_id += 1;

        debug!(id = post.id, "post created");
        Ok(())
    }

    fn delete(&self, id: PostId) -> Result<(), StoreError> {
        let mut shelf = self.lock()?;
        match shelf.posts.remove(&id) {
            Some(_) => {
                debug!(id, "post deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}
