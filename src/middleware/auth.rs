//! Bearer-token gate.
//!
//! The gate only extracts the credential and enforces the decision. Whether
//! a token is good is up to an [`Authenticator`].

use std::sync::Arc;

use http::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE};
use tracing::debug;

use super::{Middleware, Next};
use crate::error::ApiError;
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::IntoResponse;

/// Decides whether a bearer token is acceptable.
pub trait Authenticator: Send + Sync + 'static {
    fn verify(&self, token: &str) -> bool;
}

impl<F> Authenticator for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn verify(&self, token: &str) -> bool {
        self(token)
    }
}

/// Accepts exactly one shared secret.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Authenticator for StaticToken {
    fn verify(&self, token: &str) -> bool {
        // Length leaks, contents do not.
        let (a, b) = (self.0.as_bytes(), token.as_bytes());
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

/// Rejects requests without an acceptable `Authorization: Bearer <token>`
/// header with `401 Unauthorized`.
///
/// Paths listed with [`RequireBearer::allow`] pass through untouched.
pub struct RequireBearer {
    authenticator: Arc<dyn Authenticator>,
    public: Vec<String>,
}

impl RequireBearer {
    pub fn new(authenticator: impl Authenticator) -> Self {
        Self { authenticator: Arc::new(authenticator), public: Vec::new() }
    }

    pub fn from_arc(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator, public: Vec::new() }
    }

    /// Exempt an exact path from the gate.
    pub fn allow(mut self, path: impl Into<String>) -> Self {
        self.public.push(path.into());
        self
    }

    fn check(&self, req: &Request) -> Result<(), ApiError> {
        let header = req.header(AUTHORIZATION.as_str())
            .ok_or(ApiError::Unauthorized("Missing auth token"))?;
        let token = header.strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized("Invalid token"))?;

        if self.authenticator.verify(token) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("Invalid token"))
        }
    }
}

impl Middleware for RequireBearer {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        if self.public.iter().any(|p| p == req.path()) {
            return next.run(req);
        }

        match self.check(&req) {
            Ok(()) => next.run(req),
            Err(e) => {
                debug!(path = req.path(), reason = %e, "rejected unauthenticated request");
                let mut res = e.into_response();
                res.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                Box::pin(std::future::ready(res))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::method::Method;
    use crate::router::Router;
    use crate::status::Status;

    fn app() -> Arc<Router> {
        Arc::new(
            Router::new()
                .on(Method::Get, "/posts", |_req: Request| async { Status::Ok })
                .on(Method::Get, "/health", |_req: Request| async { Status::Ok })
                .layer(RequireBearer::new(StaticToken::new("s3cret")).allow("/health")),
        )
    }

    fn get(path: &str, auth: Option<&str>) -> Request {
        let mut b = http::Request::builder().uri(path);
        if let Some(v) = auth {
            b = b.header(AUTHORIZATION, v);
        }
        b.body(Bytes::new()).unwrap().into()
    }

    fn message(res: crate::Response) -> String {
        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        json["message"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let res = app().handle(get("/posts", None)).await;
        assert_eq!(res.status(), Status::Unauthorized);
        assert_eq!(res.headers()[WWW_AUTHENTICATE], "Bearer");
        assert_eq!(message(res), "Missing auth token");
    }

    #[tokio::test]
    async fn wrong_token_or_scheme_is_401() {
        for auth in ["Bearer nope", "Basic czNjcmV0", "s3cret", "Bearer "] {
            let res = app().handle(get("/posts", Some(auth))).await;
            assert_eq!(res.status(), Status::Unauthorized, "{auth}");
            assert_eq!(message(res), "Invalid token");
        }
    }

    #[tokio::test]
    async fn valid_token_passes() {
        let res = app().handle(get("/posts", Some("Bearer s3cret"))).await;
        assert_eq!(res.status(), Status::Ok);
    }

    #[tokio::test]
    async fn public_path_skips_gate() {
        let res = app().handle(get("/health", None)).await;
        assert_eq!(res.status(), Status::Ok);
    }

    #[test]
    fn closures_are_authenticators() {
        let auth = |t: &str| t.starts_with("ok-");
        assert!(auth.verify("ok-1"));
        assert!(!auth.verify("bad"));
    }
}
