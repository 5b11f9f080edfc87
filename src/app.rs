//! Composition root: the blog routes behind the fixed stage order
//! error boundary → auth gate → access log.

use std::future::Future;
use std::sync::Arc;

use crate::blogs;
use crate::error::Error;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::{access_log, auth_gate, error_boundary};
use crate::request::Request;
use crate::response::IntoResponse;
use crate::router::Router;
use crate::store::BlogStore;

/// Builds the full application router over `store`.
///
/// ```rust
/// use std::sync::Arc;
/// use quill::{BlogStore, app};
///
/// let service = app::router(Arc::new(BlogStore::seeded())).into_service();
/// # drop(service);
/// ```
pub fn router(store: Arc<BlogStore>) -> Router {
    Router::new()
        .wrap(error_boundary)
        .wrap(auth_gate)
        .wrap(access_log)
        .on(Method::Get,    "/blogs",      with_store(&store, blogs::list))
        .on(Method::Post,   "/blogs",      with_store(&store, blogs::create))
        .on(Method::Get,    "/blogs/{id}", with_store(&store, blogs::get))
        .on(Method::Put,    "/blogs/{id}", with_store(&store, blogs::update))
        .on(Method::Delete, "/blogs/{id}", with_store(&store, blogs::delete))
}

/// Binds the shared store into a `(store, request)` handler.
fn with_store<F, Fut, R>(store: &Arc<BlogStore>, handler: F) -> impl Handler + use<F, Fut, R>
where
    F: Fn(Arc<BlogStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let store = Arc::clone(store);
    move |req: Request| handler(Arc::clone(&store), req)
}
