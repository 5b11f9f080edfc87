//! Bearer-format gate.
//!
//! Only the *shape* of the `Authorization` header is checked: the token after
//! `Bearer ` is never looked up or verified. This keeps anonymous traffic out
//! of the handlers; it is not authentication.

use tracing::{info, warn};

use super::Next;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const BEARER: &str = "Bearer ";
const MISSING_TOKEN: &str = "Unauthorized: Missing token.";
const INVALID_FORMAT: &str = "Unauthorized: Invalid token format.";

#[derive(Debug, PartialEq)]
enum Credentials {
    Missing,
    Malformed,
    Bearer,
}

fn inspect(authorization: Option<&str>) -> Credentials {
    match authorization {
        None => Credentials::Missing,
        Some(value) if has_bearer_prefix(value) => Credentials::Bearer,
        Some(_) => Credentials::Malformed,
    }
}

/// ASCII case-insensitive match on `"Bearer "`.
fn has_bearer_prefix(value: &str) -> bool {
    value.as_bytes()
        .get(..BEARER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BEARER.as_bytes()))
}

/// Rejects requests whose `Authorization` header is absent or not of the
/// form `Bearer <token>` with `401 {"error": ...}`. Anything else goes
/// downstream and its response is returned unchanged.
pub async fn auth_gate(req: Request, next: Next) -> Result<Response, Error> {
    match inspect(req.header("authorization")) {
        Credentials::Missing => {
            warn!(stage = "auth_gate", path = req.path(), "missing token");
            Ok(Response::error(Status::Unauthorized, MISSING_TOKEN))
        }
        Credentials::Malformed => {
            warn!(stage = "auth_gate", path = req.path(), "invalid token format");
            Ok(Response::error(Status::Unauthorized, INVALID_FORMAT))
        }
        Credentials::Bearer => {
            info!(stage = "auth_gate", "valid token provided");
            next.run(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::test_support::capture_logs;
    use crate::{Method, Router, Service};

    use super::*;

    fn gated(hits: &Arc<AtomicUsize>) -> Service {
        let hits = Arc::clone(hits);
        Router::new()
            .wrap(auth_gate)
            .on(Method::Get, "/blogs", move |_req: Request| {
                hits.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Error>(Status::Ok) }
            })
            .into_service()
    }

    fn error_message(res: &Response) -> String {
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        body["error"].as_str().unwrap().to_owned()
    }

    #[test]
    fn prefix_check_ignores_ascii_case() {
        assert_eq!(inspect(Some("Bearer abc")), Credentials::Bearer);
        assert_eq!(inspect(Some("bearer abc")), Credentials::Bearer);
        assert_eq!(inspect(Some("BEARER abc")), Credentials::Bearer);
        assert_eq!(inspect(Some("Bearer ")), Credentials::Bearer);
    }

    #[test]
    fn other_schemes_and_short_values_are_malformed() {
        assert_eq!(inspect(Some("Basic dXNlcjpwYXNz")), Credentials::Malformed);
        assert_eq!(inspect(Some("Bearer")), Credentials::Malformed);
        assert_eq!(inspect(Some("Bearerabc")), Credentials::Malformed);
        assert_eq!(inspect(Some("")), Credentials::Malformed);
        assert_eq!(inspect(Some("Béarer x")), Credentials::Malformed);
        assert_eq!(inspect(None), Credentials::Missing);
    }

    #[tokio::test]
    async fn missing_header_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (logs, _guard) = capture_logs();

        let res = gated(&hits).call(Request::new(Method::Get, "/blogs")).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(error_message(&res), MISSING_TOKEN);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(logs.contents().contains("WARN"));
        assert!(logs.contents().contains("missing token"));
    }

    #[tokio::test]
    async fn wrong_scheme_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let req = Request::new(Method::Get, "/blogs").with_header("Authorization", "Token abc");

        let res = gated(&hits).call(req).await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(error_message(&res), INVALID_FORMAT);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn any_bearer_token_is_let_through() {
        let hits = Arc::new(AtomicUsize::new(0));
        let (logs, _guard) = capture_logs();
        let req = Request::new(Method::Get, "/blogs").with_header("authorization", "bearer not-a-real-token");

        let res = gated(&hits).call(req).await;

        assert_eq!(res.status_code(), 200);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(logs.contents().contains("valid token provided"));
    }
}
