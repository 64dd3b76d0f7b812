//! Validate every post without serving

use anyhow::Result;

use crate::Site;

/// Load all posts and fail if any file was skipped
pub fn run(site: &Site) -> Result<()> {
    let posts = site.load_posts()?;

    for skipped in posts.skipped() {
        println!("  {}: {}", skipped.path.display(), skipped.error);
    }

    if !posts.skipped().is_empty() {
        anyhow::bail!(
            "{} of {} files failed to load",
            posts.skipped().len(),
            posts.len() + posts.skipped().len()
        );
    }

    println!("{} posts OK", posts.len());
    Ok(())
}
