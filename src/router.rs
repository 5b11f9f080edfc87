//! Radix-tree request router and the frozen [`Service`] it turns into.
//!
//! One tree per HTTP method, O(path-length) lookup. Middleware stages are
//! registered on the router alongside the routes and run around every
//! dispatch, matched or not.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::error;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Request bodies larger than this are refused with 413 unless the router
/// sets its own limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or freeze it with [`Router::into_service`]. Each builder call returns
/// `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    stages: Vec<BoxedMiddleware>,
    max_body_bytes: usize,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            stages: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware stage. The first stage wrapped is the outermost.
    pub fn wrap(mut self, stage: impl Middleware) -> Self {
        self.stages.push(stage.into_boxed_middleware());
        self
    }

    /// Largest request body the server reads for this router. Anything
    /// bigger is answered with 413 before any stage runs.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Freeze routes and stages into a cheaply clonable [`Service`].
    pub fn into_service(self) -> Service {
        Service {
            routes: Arc::new(self.routes),
            stages: Arc::from(self.stages),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// A frozen router: what the server runs for every request.
///
/// Cloning is two atomic reference-count increments.
#[derive(Clone)]
pub struct Service {
    routes: Arc<HashMap<Method, MatchitRouter<BoxedHandler>>>,
    stages: Arc<[BoxedMiddleware]>,
    max_body_bytes: usize,
}

enum Route {
    Found(BoxedHandler, HashMap<String, String>),
    WrongMethod,
    Missing,
}

impl Service {
    /// Runs `req` through every stage and the matched handler.
    ///
    /// An error that no stage contains is logged and answered with a bare
    /// 500; it never reaches the transport.
    pub async fn call(&self, req: Request) -> Response {
        let method = req.method();
        let path = req.path().to_owned();

        match Next::new(self.clone()).run(req).await {
            Ok(response) => response,
            Err(e) => {
                error!(%method, %path, "unhandled error: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }

    pub(crate) fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub(crate) fn stage(&self, position: usize) -> Option<BoxedMiddleware> {
        self.stages.get(position).cloned()
    }

    pub(crate) async fn dispatch(&self, mut req: Request) -> Result<Response, Error> {
        match self.lookup(req.method(), req.path()) {
            Route::Found(handler, params) => {
                req.set_params(params);
                handler.call(req).await
            }
            Route::WrongMethod => Ok(Response::status(Status::MethodNotAllowed)),
            Route::Missing => Ok(Response::status(Status::NotFound)),
        }
    }

    fn lookup(&self, method: Method, path: &str) -> Route {
        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Route::Found(Arc::clone(matched.value), params);
        }

        if self.routes.values().any(|tree| tree.at(path).is_ok()) {
            Route::WrongMethod
        } else {
            Route::Missing
        }
    }
}
