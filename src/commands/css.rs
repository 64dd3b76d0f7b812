//! Print the code highlighting stylesheet

use anyhow::Result;

use crate::content::Highlighter;
use crate::Site;

/// Write the stylesheet for the configured theme to stdout
pub fn run(site: &Site) -> Result<()> {
    let highlighter = Highlighter::with_theme(&site.config.highlight.theme);
    print!("{}", highlighter.stylesheet()?);
    Ok(())
}
