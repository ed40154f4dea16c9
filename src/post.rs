//! The post record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned post identifier. Starts at 1, never reused.
pub type PostId = u64;

/// One post.
///
/// Deserialising is lenient about the fields the store owns: `id`,
/// `created_at` and `updated_at` may be omitted and are overwritten on
/// create anyway. A missing `content` reads as empty, which create rejects.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Post {
    #[serde(default)]
    pub id: PostId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// A post with only its content filled in, ready to be created.
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Self::default() }
    }
}
