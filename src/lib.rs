//! folio: a personal homepage with a file-backed markdown blog
//!
//! Posts are markdown files with YAML front-matter. They are parsed,
//! rendered and syntax-highlighted once at startup into an immutable
//! [`content::PostCollection`] that request handlers only read.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The main site handle
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Directory holding the blog posts
    pub content_dir: std::path::PathBuf,
    /// Directory served under /static
    pub static_dir: std::path::PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            content_dir,
            static_dir,
        })
    }

    /// Load and render every post
    pub fn load_posts(&self) -> Result<content::PostCollection, content::ContentError> {
        content::loader::ContentLoader::new(self).load_posts()
    }
}
