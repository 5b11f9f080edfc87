//! # quill
//!
//! A minimal blog API: create, read, update and delete posts held in memory,
//! behind a bearer-format gate, with access logging and a fault boundary.
//!
//! ## The pipeline
//!
//! Every request runs through the same three stages before it reaches a
//! route handler:
//!
//! 1. [`middleware::error_boundary`]: any error or panic below it becomes
//!    `500 {"error":"Internal server error."}`; details stay in the log.
//! 2. [`middleware::auth_gate`]: no `Authorization: Bearer …` header, no
//!    entry (`401`). The token itself is not verified.
//! 3. [`middleware::access_log`]: `HTTP <METHOD> <PATH> - Response: <STATUS>`.
//!
//! ## Routes
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/blogs` | 200, all posts |
//! | GET | `/blogs/{id}` | 200, one post |
//! | POST | `/blogs` | 201, `location: /blogs/{id}` |
//! | PUT | `/blogs/{id}` | 200, the replaced post |
//! | DELETE | `/blogs/{id}` | 204 |
//!
//! Ids are positions: deleting a post shifts every later id down by one.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quill::{BlogStore, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quill::Error> {
//!     let store = Arc::new(BlogStore::seeded());
//!     Server::bind("0.0.0.0:3000".parse().unwrap())
//!         .serve(app::router(store))
//!         .await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod app;
pub mod blogs;
pub mod config;
pub mod middleware;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use middleware::{Middleware, Next};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, Service};
pub use server::{Server, serve_with_shutdown};
pub use status::Status;
pub use store::{Blog, BlogStore, NotFound};
