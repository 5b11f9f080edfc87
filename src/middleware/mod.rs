//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: fault containment, authentication-header
//! inspection, access logging.
//!
//! A stage is any async function taking the request and a [`Next`] handle:
//!
//! ```text
//! async fn stage(req: Request, next: Next) -> Result<Response, Error>
//! ```
//!
//! It either answers on its own (short-circuit) or calls `next.run(req)` to
//! hand the request to the rest of the chain, and may inspect the outcome on
//! the way back. Stages run in the order they were passed to
//! [`Router::wrap`](crate::Router::wrap): the first one is the outermost.
//!
//! Built-in stages:
//! - [`error_boundary`]: turns any fault below it into a generic 500
//! - [`auth_gate`]: rejects requests without a `Bearer` authorization header
//! - [`access_log`]: one line per request with method, path and final status

mod access_log;
mod auth;
mod boundary;

use std::future::Future;
use std::sync::Arc;

use crate::error::Error;
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;
use crate::router::Service;

pub use access_log::access_log;
pub use auth::auth_gate;
pub use boundary::error_boundary;

// ── Next ──────────────────────────────────────────────────────────────────────

/// Handle to the remainder of the chain, given to every stage.
///
/// Consumed by [`Next::run`], so a stage can delegate at most once.
pub struct Next {
    service: Service,
    position: usize,
}

impl Next {
    pub(crate) fn new(service: Service) -> Self {
        Self { service, position: 0 }
    }

    /// Runs the next stage, or the matched route handler once every stage
    /// has been passed.
    pub fn run(self, req: Request) -> BoxFuture {
        let Some(stage) = self.service.stage(self.position) else {
            return Box::pin(async move { self.service.dispatch(req).await });
        };
        let next = Next { service: self.service, position: self.position + 1 };
        stage.call(req, next)
    }
}

// ── Type erasure ──────────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware stage.
///
/// Sealed like [`Handler`](crate::Handler): any
/// `Fn(Request, Next) -> impl Future<Output = Result<Response, Error>>`
/// qualifies, nothing else does.
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self.0)(req, next))
    }
}
