//! Post model

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::{reading_time, FrontMatter};

/// A blog post, fully rendered at load time
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Lookup key and URL segment
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date, `None` when undated
    pub published_at: Option<DateTime<Utc>>,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Short summary from front-matter
    pub excerpt: String,

    /// Raw markdown body
    #[serde(skip)]
    pub raw: String,

    /// Rendered, trusted HTML body
    pub content: String,

    /// Estimated reading time in minutes (at least 1)
    pub reading_time: u32,

    /// Source file path
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Assemble a post from its parsed parts
    pub fn new(fm: FrontMatter, raw: &str, content: String, source: PathBuf) -> Self {
        Self {
            published_at: fm.parse_date(),
            slug: fm.slug.unwrap_or_default(),
            title: fm.title.unwrap_or_default(),
            tags: fm.tags,
            excerpt: fm.excerpt.unwrap_or_default(),
            reading_time: reading_time(raw),
            raw: raw.to_string(),
            content,
            source,
        }
    }

    /// Whether the post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Listing view of a post, without the body
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: &'a [String],
    pub excerpt: &'a str,
    pub reading_time: u32,
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            published_at: post.published_at,
            tags: &post.tags,
            excerpt: &post.excerpt,
            reading_time: post.reading_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_from_frontmatter() {
        let fm = FrontMatter {
            title: Some("Hello".to_string()),
            date: Some("2024-03-01".to_string()),
            tags: vec!["rust".to_string()],
            excerpt: Some("Short.".to_string()),
            slug: Some("hello".to_string()),
        };
        let post = Post::new(fm, "one two three", "<p>one two three</p>".to_string(), "hello.md".into());

        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(
            post.published_at.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2024-03-01".to_string())
        );
        assert_eq!(post.reading_time, 1);
        assert!(post.has_tag("rust"));
        assert!(!post.has_tag("go"));
    }

    #[test]
    fn test_null_title_is_empty() {
        let (fm, body) = FrontMatter::parse("---\ntitle: ~\nexcerpt: ~\n---\nbody").unwrap();
        let post = Post::new(fm, body, String::new(), "a.md".into());
        assert_eq!(post.title, "");
        assert_eq!(post.excerpt, "");
    }

    #[test]
    fn test_summary_omits_body() {
        let post = Post::new(FrontMatter::default(), "body", "<p>body</p>".to_string(), "a.md".into());
        let json = serde_json::to_value(PostSummary::from(&post)).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["reading_time"], 1);
    }
}
