//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::ContentError;

/// Line that opens and closes the front-matter block
const DELIMITER: &str = "---";

/// `tags: rust` or `tags: [rust, web]`
#[derive(Deserialize)]
#[serde(untagged)]
enum Tags {
    One(String),
    Many(Vec<String>),
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        match tags {
            Tags::One(tag) => vec![tag],
            Tags::Many(tags) => tags,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Tags>::deserialize(deserializer)?
        .map(Vec::from)
        .unwrap_or_default())
}

/// Header fields of a post. Missing or null keys are `None`; nothing
/// here is required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.trim_start_matches('\u{feff}');
        let (yaml_content, body) =
            split_document(content).ok_or(ContentError::MalformedDocument)?;

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, body))
    }

    /// Parse the date string into a DateTime. `None` means undated.
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?;
        let parsed = parse_date_string(raw);
        if parsed.is_none() {
            tracing::debug!("Unrecognized date {:?}, treating post as undated", raw);
        }
        parsed
    }
}

/// Split a document into its front-matter block and body.
///
/// Both delimiters must sit on a line of their own. Anything before the
/// opening delimiter is dropped; the body is everything after the line
/// holding the closing one, untouched.
fn split_document(content: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut yaml_start = None;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim_end() != DELIMITER {
            continue;
        }
        match yaml_start {
            None => yaml_start = Some(offset),
            Some(start) => return Some((&content[start..line_start], &content[offset..])),
        }
    }

    None
}

/// Parse a date string in various formats. Values without an offset are
/// taken as UTC.
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - blog
excerpt: A first post.
slug: hello-world
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.excerpt.as_deref(), Some("A first post."));
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let (fm, body) = FrontMatter::parse("---\ntitle: Only a title\n---\nbody").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Only a title"));
        assert_eq!(fm.date, None);
        assert!(fm.tags.is_empty());
        assert_eq!(fm.excerpt, None);
        assert_eq!(fm.slug, None);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_null_fields_are_absent() {
        let content = "---\ntitle: ~\nslug: ~\nexcerpt: null\ntags: ~\ndate:\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nJust text.").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Just text.");
    }

    #[test]
    fn test_single_delimiter_is_malformed() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nNo closing line.").unwrap_err();
        assert!(matches!(err, ContentError::MalformedDocument));
    }

    #[test]
    fn test_no_delimiter_is_malformed() {
        let err = FrontMatter::parse("# Just markdown").unwrap_err();
        assert!(matches!(err, ContentError::MalformedDocument));
    }

    #[test]
    fn test_broken_yaml_is_invalid_metadata() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, ContentError::InvalidMetadata(_)));
    }

    #[test]
    fn test_scalar_yaml_is_invalid_metadata() {
        let err = FrontMatter::parse("---\njust a sentence\n---\nbody").unwrap_err();
        assert!(matches!(err, ContentError::InvalidMetadata(_)));
    }

    #[test]
    fn test_body_keeps_later_rules() {
        let content = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Rules"));
        assert_eq!(body, "above\n\n---\n\nbelow\n");
    }

    #[test]
    fn test_dashes_inside_values_are_not_delimiters() {
        let content = "---\ntitle: before---after\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("before---after"));
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let (fm, _) = FrontMatter::parse("---\ntags: Notes\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);

        let (fm, _) = FrontMatter::parse("---\ntags: [a, b]\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date_string("2024-01-15").is_some());
        assert!(parse_date_string("2024/01/15").is_some());
        assert!(parse_date_string("2024-01-15T10:30:00").is_some());

        let rfc = parse_date_string("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(rfc.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn test_unparsable_date_is_undated() {
        let fm = FrontMatter {
            date: Some("last tuesday".to_string()),
            ..Default::default()
        };
        assert_eq!(fm.parse_date(), None);
        assert_eq!(FrontMatter::default().parse_date(), None);
    }
}
