use tracing::info;

use super::Next;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Logs `HTTP <METHOD> <PATH> - Response: <STATUS>` once the rest of the
/// chain has produced its final response.
///
/// An `Err` from downstream is passed up untouched and not logged here.
pub async fn access_log(req: Request, next: Next) -> Result<Response, Error> {
    let method = req.method();
    let path = req.path().to_owned();

    let response = next.run(req).await?;

    info!(stage = "access_log", "HTTP {method} {path} - Response: {}", response.status_code());
    Ok(response)
}
