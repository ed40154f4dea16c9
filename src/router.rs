//! Radix-tree request router.
//!
//! One tree keyed by path. Every path owns a small table of handlers keyed by
//! method, so a request for a known path with an unregistered method is a
//! `405` carrying an `Allow` header, and an unknown path is a `404`. A path
//! registered with [`Router::any`] takes every method and decides for itself.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use http::header::{ALLOW, HeaderValue};
use matchit::Router as MatchitRouter;

use crate::error::ApiError;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Handlers registered on one path.
#[derive(Default)]
struct MethodTable {
    by_method: BTreeMap<Method, BoxedHandler>,
    any: Option<BoxedHandler>,
}

/// The application router.
///
/// Build it once at startup, wrap it in an `Arc`, and hand it to
/// [`Server::serve`](crate::Server::serve). Each builder call returns `self`
/// so registrations chain naturally.
pub struct Router {
    tree: MatchitRouter<usize>,
    tables: Vec<MethodTable>,
    patterns: HashMap<String, usize>,
    pub(crate) layers: Vec<BoxedMiddleware>,
}

pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self {
            tree: MatchitRouter::new(),
            tables: Vec::new(),
            patterns: HashMap::new(),
            layers: Vec::new(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `{*name}` captures the rest of
    /// the path, slashes included.
    ///
    /// ```rust,no_run
    /// # use scribe::{Method, Request, Router, Status};
    /// # async fn get_post(_: Request) -> Status { Status::Ok }
    /// # async fn delete_post(_: Request) -> Status { Status::NoContent }
    /// Router::new()
    ///     .on(Method::Get,    "/posts/{*id}", get_post)
    ///     .on(Method::Delete, "/posts/{*id}", delete_post);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting path pattern. Routes are fixed at
    /// startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let slot = self.slot(path);
        self.tables[slot].by_method.insert(method, handler.into_boxed_handler());
        self
    }

    /// Register a handler for every method on `path` that has no handler of
    /// its own from [`on`](Router::on). The handler answers unsupported
    /// methods itself, usually with [`method_not_allowed`].
    ///
    /// # Panics
    ///
    /// Same as [`on`](Router::on).
    pub fn any(mut self, path: &str, handler: impl Handler) -> Self {
        let slot = self.slot(path);
        self.tables[slot].any = Some(handler.into_boxed_handler());
        self
    }

    fn slot(&mut self, path: &str) -> usize {
        if let Some(&slot) = self.patterns.get(path) {
            return slot;
        }
        let slot = self.tables.len();
        self.tree
            .insert(path, slot)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.tables.push(MethodTable::default());
        self.patterns.insert(path.to_owned(), slot);
        slot
    }

    /// Wrap every request in `middleware`.
    ///
    /// Layers run in registration order: the first one added is the
    /// outermost and sees the request first and the response last.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Run `req` through the middleware chain and the matching route.
    pub fn handle(self: &Arc<Self>, req: Request) -> BoxFuture {
        Next::new(Arc::clone(self)).run(req)
    }

    pub(crate) fn lookup(&self, method: &http::Method, path: &str) -> Lookup {
        let Ok(matched) = self.tree.at(path) else {
            return Lookup::NotFound;
        };
        let table = &self.tables[*matched.value];

        let handler = Method::try_from(method)
            .ok()
            .and_then(|m| table.by_method.get(&m))
            .or(table.any.as_ref());
        match handler {
            Some(handler) => {
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                Lookup::Found(Arc::clone(handler), params)
            }
            None => Lookup::MethodNotAllowed(table.by_method.keys().copied().collect()),
        }
    }

    /// The innermost step of the chain: find the route and call it.
    pub(crate) fn route(&self, mut req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.path()) {
            Lookup::Found(handler, params) => {
                req.set_params(params);
                handler.call(req)
            }
            Lookup::MethodNotAllowed(allowed) => {
                Box::pin(std::future::ready(method_not_allowed(&allowed)))
            }
            Lookup::NotFound => {
                Box::pin(std::future::ready(ApiError::NotFound("Route not found").into_response()))
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// The `405` response, with `allowed` listed in the `Allow` header.
pub fn method_not_allowed(allowed: &[Method]) -> Response {
    let mut res = ApiError::MethodNotAllowed.into_response();
    let allow = allowed.iter().map(Method::to_string).collect::<Vec<_>>().join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        res.headers_mut().insert(ALLOW, value);
    }
    res
}
