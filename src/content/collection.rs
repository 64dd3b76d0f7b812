//! Read-only snapshot of every loaded post

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::{ContentError, Post};

/// A file that was left out of the collection, and why
#[derive(Debug)]
pub struct Skipped {
    pub path: PathBuf,
    pub error: ContentError,
}

/// Posts ordered newest first, plus a slug index.
///
/// Built once by [`PostCollection::from_posts`] and never mutated; share it
/// behind an `Arc` and replace the whole value to pick up new content.
#[derive(Debug, Default)]
pub struct PostCollection {
    posts: Vec<Arc<Post>>,
    by_slug: HashMap<String, Arc<Post>>,
    skipped: Vec<Skipped>,
}

impl PostCollection {
    /// An empty collection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a collection from posts in load order.
    ///
    /// A later post with an already-seen slug replaces the earlier one in
    /// both the list and the index. Posts are then ordered by date, newest
    /// first, with undated posts last; ties keep load order.
    pub fn from_posts(posts: impl IntoIterator<Item = Post>, skipped: Vec<Skipped>) -> Self {
        let mut ordered: Vec<Arc<Post>> = Vec::new();
        let mut by_slug: HashMap<String, Arc<Post>> = HashMap::new();

        for post in posts {
            let post = Arc::new(post);
            if let Some(previous) = by_slug.insert(post.slug.clone(), Arc::clone(&post)) {
                tracing::warn!(
                    "Duplicate slug {:?}: {:?} replaces {:?}",
                    post.slug,
                    post.source,
                    previous.source
                );
                ordered.retain(|p| !Arc::ptr_eq(p, &previous));
            }
            ordered.push(post);
        }

        ordered.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        Self {
            posts: ordered,
            by_slug,
            skipped,
        }
    }

    /// All posts, newest first
    pub fn all(&self) -> &[Arc<Post>] {
        &self.posts
    }

    /// Look up a post by slug
    pub fn get(&self, slug: &str) -> Option<&Arc<Post>> {
        self.by_slug.get(slug)
    }

    /// Posts carrying a tag, newest first
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Arc<Post>> + 'a {
        self.posts.iter().filter(move |p| p.has_tag(tag))
    }

    /// Tags with their post counts, most used first, then by name
    pub fn tag_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in &self.posts {
            for tag in &post.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts
    }

    /// Files that failed to load
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
