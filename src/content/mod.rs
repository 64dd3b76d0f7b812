//! Content module - turns markdown files into rendered posts

mod collection;
mod error;
mod frontmatter;
mod highlight;
pub mod loader;
mod markdown;
mod post;
mod reading_time;

pub use collection::{PostCollection, Skipped};
pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use highlight::{Highlight, Highlighter, DEFAULT_THEME};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostSummary};
pub use reading_time::{reading_time, WORDS_PER_MINUTE};
