//! Syntax highlighting for fenced code blocks

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::ContentError;

/// Dark theme used when the configured one is unavailable
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Turns a code block into highlighted HTML.
pub trait Highlight {
    fn highlight(&self, code: &str, lang: &str) -> Result<String, ContentError>;
}

/// Class-based highlighter backed by syntect's bundled grammars and themes.
///
/// Token spans carry CSS classes rather than inline colors, so the theme
/// only matters for [`Highlighter::stylesheet`].
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Highlighter {
    /// Create a highlighter using the default dark theme
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create a highlighter using the named theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Grammar for a language hint, falling back to plain text
    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        let Some(token) = language_token(lang) else {
            return self.syntax_set.find_syntax_plain_text();
        };

        self.syntax_set
            .find_syntax_by_token(token)
            .or_else(|| self.syntax_set.find_syntax_by_extension(token))
            .or_else(|| {
                let lower = token.to_ascii_lowercase();
                self.syntax_set
                    .find_syntax_by_token(&lower)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(&lower))
            })
            .unwrap_or_else(|| {
                tracing::debug!("No grammar for language {:?}, using plain text", token);
                self.syntax_set.find_syntax_plain_text()
            })
    }

    /// The configured theme, else the default dark theme, else any theme
    pub fn theme(&self) -> Option<&Theme> {
        let themes = &self.theme_set.themes;
        themes
            .get(&self.theme_name)
            .or_else(|| {
                tracing::debug!("Theme {:?} not found, using {}", self.theme_name, DEFAULT_THEME);
                themes.get(DEFAULT_THEME)
            })
            .or_else(|| themes.values().next())
    }

    /// CSS for the token classes emitted by [`Highlight::highlight`]
    pub fn stylesheet(&self) -> Result<String, ContentError> {
        match self.theme() {
            Some(theme) => Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?),
            None => Ok(String::new()),
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlight for Highlighter {
    fn highlight(&self, code: &str, lang: &str) -> Result<String, ContentError> {
        let syntax = self.find_syntax(lang);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(format!(
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            html_escape(language_class(lang)),
            generator.finalize()
        ))
    }
}

/// First word of an info string such as `rust,ignore` or `py title="x"`
fn language_token(lang: &str) -> Option<&str> {
    lang.split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| !token.is_empty())
}

/// Name used in the `language-*` class
fn language_class(lang: &str) -> &str {
    language_token(lang).unwrap_or("text")
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_known_language() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("fn main() {}\n", "rust").unwrap();
        assert!(html.starts_with(r#"<pre class="highlight"><code class="language-rust">"#));
        assert!(html.contains("<span class=\""));
        assert!(html.contains("main"));
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_language_lookup_ignores_case_and_extra_words() {
        let highlighter = Highlighter::new();
        assert_eq!(highlighter.find_syntax("Rust").name, "Rust");
        assert_eq!(highlighter.find_syntax("rs ignore").name, "Rust");
        assert_eq!(highlighter.find_syntax("rust,no_run").name, "Rust");
        assert_eq!(highlighter.find_syntax("py").name, "Python");
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let highlighter = Highlighter::new();
        assert_eq!(highlighter.find_syntax("klingon").name, "Plain Text");

        let html = highlighter.highlight("a < b && c\n", "klingon").unwrap();
        assert!(html.contains(r#"class="language-klingon""#));
        assert!(html.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn test_empty_language_uses_plain_text() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("plain\n", "").unwrap();
        assert!(html.contains(r#"class="language-text""#));
        assert!(html.contains("plain"));
    }

    #[test]
    fn test_language_hint_is_escaped() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("x\n", r#""><script>"#).unwrap();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_missing_theme_falls_back_to_default() {
        let highlighter = Highlighter::with_theme("no-such-theme");
        let fallback = Highlighter::new();
        assert_eq!(
            highlighter.theme().map(|t| t.name.clone()),
            fallback.theme().map(|t| t.name.clone())
        );
        assert!(!highlighter.stylesheet().unwrap().is_empty());
    }

    #[test]
    fn test_stylesheet_targets_token_classes() {
        let css = Highlighter::new().stylesheet().unwrap();
        assert!(css.contains('{'));
        assert!(css.contains("color"));
    }
}
