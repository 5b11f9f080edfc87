//! Fault containment.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::error;

use super::Next;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const INTERNAL_ERROR: &str = "Internal server error.";

/// Contains every fault raised below it.
///
/// Both an `Err` returned by a later stage or handler and a panic while
/// polling one are logged with their message and answered with
/// `500 {"error":"Internal server error."}`. The client never sees the
/// underlying message. Always returns `Ok`.
pub async fn error_boundary(req: Request, next: Next) -> Result<Response, Error> {
    let outcome = AssertUnwindSafe(async move { next.run(req).await })
        .catch_unwind()
        .await;

    let fault = match outcome {
        Ok(Ok(response)) => return Ok(response),
        Ok(Err(e)) => e.to_string(),
        Err(panic) => panic_message(panic.as_ref()),
    };

    error!(stage = "error_boundary", "unhandled fault: {fault}");
    Ok(Response::error(Status::InternalServerError, INTERNAL_ERROR))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}
