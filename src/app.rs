//! Wiring: store, routes and middleware in one [`Router`].

use std::sync::Arc;

use crate::health;
use crate::method::Method;
use crate::middleware::{Authenticator, JsonContentType, RequireBearer, Trace};
use crate::posts;
use crate::router::Router;
use crate::store::PostStore;

/// The complete service.
///
/// Layers, outermost first: request logging, default JSON content type, and
/// the bearer gate when an `authenticator` is given. `/health` is always
/// reachable without a token.
pub fn build(store: Arc<dyn PostStore>, authenticator: Option<Arc<dyn Authenticator>>) -> Router {
    let mut router = Router::new()
        .on(Method::Get, "/health", health::check)
        .layer(Trace)
        .layer(JsonContentType);

    if let Some(authenticator) = authenticator {
        router = router.layer(RequireBearer::from_arc(authenticator).allow("/health"));
    }

    posts::routes(router, store)
}
