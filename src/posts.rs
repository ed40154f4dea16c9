//! The posts API: maps method + path onto [`PostStore`] calls.
//!
//! | Method | Path          | Success                    | Failure        |
//! |--------|---------------|----------------------------|----------------|
//! | GET    | `/posts`      | 200, array of posts        |                |
//! | POST   | `/posts`      | 201, the created post      | 400            |
//! | GET    | `/posts/{id}` | 200, the post              | 400, 404       |
//! | DELETE | `/posts/{id}` | 204, empty                 | 400, 404       |
//!
//! Everything after `/posts/` is the id, so `/posts/1/2` is an invalid id
//! rather than an unknown route, and so is the empty id of `/posts/`. The id
//! is validated before the method: `PUT /posts/abc` is a 400, while
//! `PUT /posts/1` is a 405.

use std::sync::Arc;

use tracing::debug;

use crate::error::ApiError;
use crate::handler::with_state;
use crate::method::Method;
use crate::post::{Post, PostId};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::{Router, method_not_allowed};
use crate::status::Status;
use crate::store::PostStore;

/// Register the posts routes on `router`, all backed by `store`.
pub fn routes(router: Router, store: Arc<dyn PostStore>) -> Router {
    router
        .on(Method::Get,  "/posts", with_state(Arc::clone(&store), list))
        .on(Method::Post, "/posts", with_state(Arc::clone(&store), create))
        .any("/posts/",             with_state(Arc::clone(&store), one))
        .any("/posts/{*id}",        with_state(store, one))
}

async fn list(store: Arc<dyn PostStore>, _req: Request) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(store.get_all()?))
}

async fn create(store: Arc<dyn PostStore>, req: Request) -> Result<(Status, Json<Post>), ApiError> {
    let body = req.body().map_err(|e| {
        debug!(error = %e, "create: unreadable body");
        ApiError::BadRequest("Error reading body")
    })?;

    let mut post: Post = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "create: rejected payload");
        ApiError::BadRequest("Invalid JSON")
    })?;

    if post.content.is_empty() {
        return Err(ApiError::BadRequest("Body cannot be empty"));
    }

    store.create(&mut post)?;
    Ok((Status::Created, Json(post)))
}

/// `/posts/{id}` for every method.
async fn one(store: Arc<dyn PostStore>, req: Request) -> Result<Response, ApiError> {
    let id = post_id(&req)?;
    match Method::try_from(req.method()) {
        Ok(Method::Get) => Ok(Json(store.get(id)?).into_response()),
        Ok(Method::Delete) => {
            store.delete(id)?;
            Ok(Status::NoContent.into_response())
        }
        _ => Ok(method_not_allowed(&[Method::Delete, Method::Get])),
    }
}

fn post_id(req: &Request) -> Result<PostId, ApiError> {
    req.param("id")
        .and_then(|raw| raw.parse().ok())
        .ok_or(ApiError::BadRequest("Invalid post ID"))
}
