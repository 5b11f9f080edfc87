//! `/blogs` resource handlers.
//!
//! Each handler takes the shared store alongside the request; the
//! composition root binds the store in (see [`crate::app`]). An `{id}` that
//! is not a canonical decimal integer (`abc`, `+1`, `01`, `-0`) is treated
//! like one that is out of range, so each record has exactly one path.

use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;
use crate::store::{Blog, BlogStore};

fn blog_id(req: &Request) -> Option<i64> {
    let raw = req.param("id")?;
    let id: i64 = raw.parse().ok()?;
    (id.to_string() == raw).then_some(id)
}

/// `GET /blogs`
pub async fn list(store: Arc<BlogStore>, _req: Request) -> Result<Json<Vec<Blog>>, Error> {
    Ok(Json(store.list()))
}

/// `GET /blogs/{id}`
pub async fn get(store: Arc<BlogStore>, req: Request) -> Result<Response, Error> {
    let found = blog_id(&req).and_then(|id| store.get(id).ok());
    Ok(match found {
        Some(blog) => Json(blog).into_response(),
        None => Response::status(Status::NotFound),
    })
}

/// `POST /blogs`, answering `201` with a `location` header naming the new id.
pub async fn create(store: Arc<BlogStore>, req: Request) -> Result<Response, Error> {
    let blog: Blog = req.json()?;
    let (id, blog) = store.create(blog);

    Ok(Response::builder()
        .status(Status::Created)
        .header("location", &format!("/blogs/{id}"))
        .serialize(&blog))
}

/// `PUT /blogs/{id}`
pub async fn update(store: Arc<BlogStore>, req: Request) -> Result<Response, Error> {
    let Some(id) = blog_id(&req) else {
        return Ok(Response::status(Status::NotFound));
    };
    let blog: Blog = req.json()?;

    Ok(match store.update(id, blog) {
        Ok(blog) => Json(blog).into_response(),
        Err(_) => Response::status(Status::NotFound),
    })
}

/// `DELETE /blogs/{id}`, answering `204` on success.
pub async fn delete(store: Arc<BlogStore>, req: Request) -> Result<Status, Error> {
    let deleted = blog_id(&req).and_then(|id| store.delete(id).ok());
    Ok(match deleted {
        Some(_) => Status::NoContent,
        None => Status::NotFound,
    })
}
