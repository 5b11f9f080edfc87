//! In-memory blog storage.
//!
//! Records are identified by their current position, so removing one shifts
//! the id of every later record down by one.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A blog post. Both fields are required on input.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blog {
    pub title: String,
    pub body: String,
}

impl Blog {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// No record currently lives at the requested id.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("no blog at id {0}")]
pub struct NotFound(pub i64);

/// Ordered blog collection shared by every request.
///
/// Each operation takes the lock once for its whole check-and-mutate step,
/// so readers never see a half-applied write and concurrent deletes cannot
/// remove the wrong record.
#[derive(Debug, Default)]
pub struct BlogStore {
    blogs: RwLock<Vec<Blog>>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two records the service starts with.
    pub fn seeded() -> Self {
        Self::from_blogs(vec![
            Blog::new("First", "Blog 1"),
            Blog::new("Second", "Blog 2"),
        ])
    }

    pub fn from_blogs(blogs: Vec<Blog>) -> Self {
        Self { blogs: RwLock::new(blogs) }
    }

    pub fn len(&self) -> usize {
        self.blogs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blogs.read().is_empty()
    }

    pub fn list(&self) -> Vec<Blog> {
        self.blogs.read().clone()
    }

    pub fn get(&self, id: i64) -> Result<Blog, NotFound> {
        let blogs = self.blogs.read();
        let index = position(id, blogs.len())?;
        Ok(blogs[index].clone())
    }

    /// Appends `blog` and returns its id.
    pub fn create(&self, blog: Blog) -> (usize, Blog) {
        let mut blogs = self.blogs.write();
        blogs.push(blog.clone());
        (blogs.len() - 1, blog)
    }

    pub fn update(&self, id: i64, blog: Blog) -> Result<Blog, NotFound> {
        let mut blogs = self.blogs.write();
        let index = position(id, blogs.len())?;
        blogs[index] = blog.clone();
        Ok(blog)
    }

    /// Removes the record at `id`, shifting every later record down by one.
    ///
    /// Accepts exactly the ids `get` and `update` accept, index 0 included.
    pub fn delete(&self, id: i64) -> Result<Blog, NotFound> {
        let mut blogs = self.blogs.write();
        let index = position(id, blogs.len())?;
        Ok(blogs.remove(index))
    }
}

/// Maps an id onto `0..len`.
fn position(id: i64, len: usize) -> Result<usize, NotFound> {
    usize::try_from(id)
        .ok()
        .filter(|&index| index < len)
        .ok_or(NotFound(id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn seeded_store_lists_in_insertion_order() {
        let store = BlogStore::seeded();
        assert_eq!(store.list(), vec![Blog::new("First", "Blog 1"), Blog::new("Second", "Blog 2")]);
    }

    #[test]
    fn get_is_bounded_by_current_length() {
        let store = BlogStore::seeded();
        assert_eq!(store.get(0), Ok(Blog::new("First", "Blog 1")));
        assert_eq!(store.get(1), Ok(Blog::new("Second", "Blog 2")));
        assert_eq!(store.get(2), Err(NotFound(2)));
        assert_eq!(store.get(-1), Err(NotFound(-1)));
        assert_eq!(BlogStore::new().get(0), Err(NotFound(0)));
    }

    #[test]
    fn create_appends_and_returns_last_index() {
        let store = BlogStore::seeded();
        let (id, blog) = store.create(Blog::new("T", "B"));
        assert_eq!(id, 2);
        assert_eq!(blog, Blog::new("T", "B"));
        assert_eq!(store.get(2), Ok(blog));
    }

    #[test]
    fn update_replaces_only_the_target() {
        let store = BlogStore::seeded();
        assert_eq!(store.update(1, Blog::new("New", "Text")), Ok(Blog::new("New", "Text")));
        assert_eq!(store.get(0), Ok(Blog::new("First", "Blog 1")));
        assert_eq!(store.get(1), Ok(Blog::new("New", "Text")));

        assert_eq!(store.update(2, Blog::new("X", "Y")), Err(NotFound(2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_accepts_the_same_range_as_get() {
        let store = BlogStore::seeded();
        assert_eq!(store.delete(2), Err(NotFound(2)));
        assert_eq!(store.delete(-1), Err(NotFound(-1)));
        assert_eq!(store.len(), 2);

        assert_eq!(store.delete(0), Ok(Blog::new("First", "Blog 1")));
        assert_eq!(store.get(0), Ok(Blog::new("Second", "Blog 2")), "later ids shift down");
        assert_eq!(store.delete(0), Ok(Blog::new("Second", "Blog 2")));
        assert!(store.is_empty());
        assert_eq!(store.delete(0), Err(NotFound(0)));
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(BlogStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(Blog::new(format!("{t}-{i}"), "b")).0)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<usize> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..400).collect::<Vec<_>>());
        assert_eq!(store.len(), 400);
    }

    fn numbered(n: usize) -> Blog {
        Blog::new(n.to_string(), "original")
    }

    /// Every snapshot is a run of consecutive originals, except that the
    /// head may have been overwritten.
    fn assert_consistent(blogs: &[Blog]) {
        let Some(second) = blogs.get(1) else { return };
        let first: usize = second.title.parse().expect("tail is never overwritten");
        for (offset, blog) in blogs[1..].iter().enumerate() {
            assert_eq!(*blog, numbered(first + offset));
        }
        assert!(blogs[0] == Blog::new("head", "edited") || blogs[0] == numbered(first - 1));
    }

    #[test]
    fn concurrent_deletes_and_updates_keep_readers_consistent() {
        let store = Arc::new(BlogStore::from_blogs((0..100).map(numbered).collect()));

        let deleters: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..10 {
                        assert!(store.delete(0).is_ok());
                    }
                })
            })
            .collect();
        let updaters: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        assert!(store.update(0, Blog::new("head", "edited")).is_ok());
                    }
                })
            })
            .collect();
        let readers: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let blogs = store.list();
                        assert!((60..=100).contains(&blogs.len()));
                        assert_consistent(&blogs);
                        assert!(store.get(59).is_ok());
                    }
                })
            })
            .collect();

        for handle in deleters.into_iter().chain(updaters).chain(readers) {
            handle.join().unwrap();
        }

        let blogs = store.list();
        assert_eq!(blogs.len(), 60);
        assert_consistent(&blogs);
        assert_eq!(blogs[1..].to_vec(), (41..100).map(numbered).collect::<Vec<_>>());
    }
}
