//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the place for
//! cross-cutting concerns. Each layer either passes the request on with
//! [`Next::run`] or short-circuits by returning a response of its own, in
//! which case nothing further down the chain runs.
//!
//! Built-in layers:
//! - [`Trace`] — per-request span with method and path, status and latency
//! - [`JsonContentType`] — default `content-type: application/json`
//! - [`RequireBearer`] — bearer-token gate backed by an [`Authenticator`]
//!
//! Ad-hoc layers can be written as async closures with [`from_fn`]:
//!
//! ```rust,no_run
//! use scribe::middleware::{from_fn, Next};
//! use scribe::{Request, Router};
//!
//! let app = Router::new().layer(from_fn(|req: Request, next: Next| async move {
//!     tracing::debug!(path = req.path(), "incoming");
//!     next.run(req).await
//! }));
//! ```

mod auth;
mod content_type;
mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

pub use auth::{Authenticator, RequireBearer, StaticToken};
pub use content_type::JsonContentType;
pub use trace::Trace;

/// A request wrapper in the router's chain.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The rest of the chain after the current layer.
pub struct Next {
    router: Arc<Router>,
    depth: usize,
}

impl Next {
    pub(crate) fn new(router: Arc<Router>) -> Self {
        Self { router, depth: 0 }
    }

    /// Hand the request to the next layer, or to the route once every layer
    /// has run.
    pub fn run(self, req: Request) -> BoxFuture {
        match self.router.layers.get(self.depth) {
            Some(layer) => {
                let layer = Arc::clone(layer);
                let next = Self { router: self.router, depth: self.depth + 1 };
                layer.call(req, next)
            }
            None => self.router.route(req),
        }
    }
}

/// Adapt an async closure into a [`Middleware`].
pub fn from_fn<F, Fut>(f: F) -> FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    FromFn(f)
}

/// Middleware built by [`from_fn`].
pub struct FromFn<F>(F);

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self.0)(req, next))
    }
}
