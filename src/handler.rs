//! Route handlers and how the router stores them.
//!
//! Two shapes of handler are accepted:
//!
//! ```text
//! async fn check(req: Request) -> impl IntoResponse                 ← stateless
//! async fn list(store: Arc<dyn PostStore>, req: Request) -> …       ← via with_state
//! ```
//!
//! Either way the router only ever sees an `Arc<dyn ErasedHandler>`: one
//! vtable call per request, plus one clone of the state for stateful
//! handlers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed, `Send` future resolving to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Anything the router accepts as a route handler.
///
/// Satisfied by `Fn(Request) -> impl Future<Output = impl IntoResponse>` and
/// by [`with_state`]. Sealed: nothing else can implement it.
pub trait Handler: sealed::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod sealed {
    pub trait Sealed {}
}

fn boxed<Fut, R>(fut: Fut) -> BoxFuture
where
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Box::pin(async move { fut.await.into_response() })
}

// ── Stateless ─────────────────────────────────────────────────────────────────

struct Stateless<F>(F);

impl<F, Fut, R> sealed::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(Stateless(self))
    }
}

impl<F, Fut, R> ErasedHandler for Stateless<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> BoxFuture {
        boxed((self.0)(req))
    }
}

// ── Stateful ──────────────────────────────────────────────────────────────────

/// Pair a handler with shared state. The state is cloned into every call,
/// so it is typically an `Arc`.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use scribe::{MemoryStore, Method, PostStore, Request, Router, Status, with_state};
///
/// async fn count(store: Arc<dyn PostStore>, _req: Request) -> Status {
///     match store.get_all() {
///         Ok(_) => Status::Ok,
///         Err(_) => Status::InternalServerError,
///     }
/// }
///
/// let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new());
/// Router::new().on(Method::Get, "/count", with_state(store, count));
/// ```
pub fn with_state<S, F>(state: S, f: F) -> WithState<S, F> {
    WithState { state, f }
}

/// A handler built by [`with_state`].
pub struct WithState<S, F> {
    state: S,
    f: F,
}

impl<S, F, Fut, R> sealed::Sealed for WithState<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<S, F, Fut, R> Handler for WithState<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl<S, F, Fut, R> ErasedHandler for WithState<S, F>
where
    S: Clone,
    F: Fn(S, Request) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> BoxFuture {
        boxed((self.f)(self.state.clone(), req))
    }
}
