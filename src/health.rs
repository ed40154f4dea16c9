//! Health check handler.
//!
//! ```text
//! GET /health  →  200 {"status":"healthy"}
//! ```
//!
//! Any other method on `/health` is a `405` from the router.

use serde::Serialize;

use crate::request::Request;
use crate::response::Json;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Always healthy. If the process can answer HTTP at all it is up; the
/// in-memory store has nothing else to check.
pub async fn check(_req: Request) -> Json<Health> {
    Json(Health { status: "healthy" })
}
