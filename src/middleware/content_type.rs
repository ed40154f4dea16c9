//! Default response media type.

use http::header::{CONTENT_TYPE, HeaderValue};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::APPLICATION_JSON;

/// Marks responses as `application/json` unless the handler already chose a
/// content type.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonContentType;

impl Middleware for JsonContentType {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin(async move {
            let mut res = next.run(req).await;
            res.headers_mut()
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(APPLICATION_JSON));
            res
        })
    }
}
