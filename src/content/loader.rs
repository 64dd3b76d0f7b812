//! Content loader - loads posts from the content directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ContentError, FrontMatter, MarkdownRenderer, Post, PostCollection, Skipped};
use crate::Site;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.markdown.raw_html,
        );
        Self { site, renderer }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load every post in the content directory.
    ///
    /// A missing directory yields an empty collection. Files that fail to
    /// parse are logged and recorded in [`PostCollection::skipped`]; only a
    /// failure to list the directory itself is an error.
    pub fn load_posts(&self) -> Result<PostCollection, ContentError> {
        let posts_dir = &self.site.content_dir;
        let paths = match list_markdown_files(posts_dir) {
            Ok(paths) => paths,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Content directory {:?} does not exist", posts_dir);
                return Ok(PostCollection::empty());
            }
            Err(source) => {
                return Err(ContentError::DirectoryRead {
                    path: posts_dir.clone(),
                    source,
                })
            }
        };

        let mut posts = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            match self.load_post(&path) {
                Ok(post) => posts.push(post),
                Err(error) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, error);
                    skipped.push(Skipped { path, error });
                }
            }
        }

        let collection = PostCollection::from_posts(posts, skipped);
        tracing::info!(
            "Loaded {} posts ({} skipped)",
            collection.len(),
            collection.skipped().len()
        );
        Ok(collection)
    }

    /// Load a single post from a file.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
    /// failing the whole post.
    pub fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let bytes = fs::read(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let (mut fm, body) = FrontMatter::parse(&content)?;

        if fm.slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
            fm.slug = Some(slug_from_path(path));
        }

        let content_html = self.renderer.render(body);
        Ok(Post::new(fm, body, content_html, path.to_path_buf()))
    }
}

/// Markdown files directly inside `dir`, sorted by file name
fn list_markdown_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() || !is_markdown_file(&path) {
            continue;
        }
        paths.push(path);
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Slug derived from the file name, for posts that do not declare one
fn slug_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slug::slugify)
        .unwrap_or_default();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}
