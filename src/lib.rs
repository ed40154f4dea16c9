//! # scribe
//!
//! A small JSON service for one resource, the post, built on hyper, tokio
//! and a radix-tree router.
//!
//! ## Layout
//!
//! - [`store`] — the [`PostStore`] contract and the lock-protected
//!   [`MemoryStore`]. The only shared mutable state in the process.
//! - [`posts`] — maps method + path onto store calls, validates input, and
//!   translates failures into `{"error", "message"}` JSON bodies.
//! - [`middleware`] — request logging, default content type, bearer gate.
//! - [`Router`] / [`Server`] — routing, connection handling, graceful
//!   shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use scribe::{MemoryStore, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scribe::Error> {
//!     let router = app::build(Arc::new(MemoryStore::new()), None);
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).serve(router).await
//! }
//! ```
//!
//! ```text
//! curl -X POST localhost:8080/posts -d '{"content":"hello"}'
//! → 201 {"id":1,"content":"hello","created_at":"…","updated_at":"…"}
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod middleware;
pub mod post;
pub mod posts;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::{BoxFuture, Handler, WithState, with_state};
pub use method::Method;
pub use post::{Post, PostId};
pub use request::{BodyError, Request};
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, method_not_allowed};
pub use server::Server;
pub use status::Status;
pub use store::{MemoryStore, PostStore, StoreError};
