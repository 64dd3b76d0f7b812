//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            author: String::new(),
            url: "http://localhost:4000".to_string(),

            content_dir: "content/blog".to_string(),
            static_dir: "ui/static".to_string(),

            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Name of the color theme used for the generated stylesheet
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: crate::content::DEFAULT_THEME.to_string(),
        }
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass raw HTML in posts through instead of escaping it
    pub raw_html: bool,
}
