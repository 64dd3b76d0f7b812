//! List site content

use anyhow::Result;
use std::sync::Arc;

use crate::content::{Post, PostCollection};
use crate::Site;

/// List site content by type, optionally only posts carrying `tag`
pub fn run(site: &Site, content_type: &str, tag: Option<&str>) -> Result<()> {
    let posts = site.load_posts()?;

    match content_type {
        "post" | "posts" => {
            let selected = select_posts(&posts, tag);
            match tag {
                Some(tag) => println!(
                    "{} posts tagged {} ({}):",
                    site.config.title,
                    tag,
                    selected.len()
                ),
                None => println!("{} posts ({}):", site.config.title, selected.len()),
            }
            for post in selected {
                let date = post
                    .published_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "undated   ".to_string());
                println!(
                    "  {} - {} [{}] ({} min)",
                    date, post.title, post.slug, post.reading_time
                );
            }
        }
        "tag" | "tags" => {
            let tags = posts.tag_counts();
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

fn select_posts<'a>(posts: &'a PostCollection, tag: Option<&'a str>) -> Vec<&'a Arc<Post>> {
    match tag {
        Some(tag) => posts.with_tag(tag).collect(),
        None => posts.all().iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("a.md"),
            "---\nslug: a\ndate: 2024-01-01\ntags: rust\n---\nA.",
        )
        .unwrap();
        fs::write(
            site.content_dir.join("b.md"),
            "---\nslug: b\ndate: 2024-02-01\ntags: [rust, web]\n---\nB.",
        )
        .unwrap();
        (dir, site)
    }

    fn slugs(posts: &PostCollection, tag: Option<&str>) -> Vec<String> {
        select_posts(posts, tag).iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_select_posts_by_tag() {
        let (_dir, site) = site();
        let posts = site.load_posts().unwrap();

        assert_eq!(slugs(&posts, None), vec!["b", "a"]);
        assert_eq!(slugs(&posts, Some("rust")), vec!["b", "a"]);
        assert_eq!(slugs(&posts, Some("web")), vec!["b"]);
        assert!(slugs(&posts, Some("go")).is_empty());
    }

    #[test]
    fn test_run_with_tag_filter() {
        let (_dir, site) = site();
        assert!(run(&site, "post", Some("web")).is_ok());
        assert!(run(&site, "tag", None).is_ok());
        assert!(run(&site, "page", None).is_err());
    }
}
