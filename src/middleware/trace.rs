//! Request logging.

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Logs one line per request once the inner chain has produced a response.
///
/// The line is emitted inside a `request` span carrying the method and path,
/// so anything logged further down (store calls, auth rejections) is
/// attributed to the request that caused it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!("request", method = %req.method(), path = %req.path());

        Box::pin(
            async move {
                let started = Instant::now();
                let res = next.run(req).await;
                info!(
                    status = res.status().code(),
                    latency = ?started.elapsed(),
                    "request completed"
                );
                res
            }
            .instrument(span),
        )
    }
}
