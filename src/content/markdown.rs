//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashSet;

use super::highlight::{Highlight, Highlighter};

/// URL schemes never emitted as link or image targets
const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Markdown renderer with syntax highlighting
///
/// Output is trusted HTML: raw HTML in the source is escaped unless
/// explicitly allowed, and script-bearing URLs are neutralized.
pub struct MarkdownRenderer<H = Highlighter> {
    highlighter: H,
    raw_html: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_highlighter(Highlighter::new())
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, raw_html: bool) -> Self {
        Self::with_highlighter(Highlighter::with_theme(theme)).raw_html(raw_html)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Highlight> MarkdownRenderer<H> {
    pub fn with_highlighter(highlighter: H) -> Self {
        Self {
            highlighter,
            raw_html: false,
        }
    }

    /// Pass raw HTML through instead of escaping it
    pub fn raw_html(mut self, allow: bool) -> Self {
        self.raw_html = allow;
        self
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options).map(|event| self.sanitize(event));

        let events = self.highlight_code_blocks(parser);
        let events = assign_heading_ids(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn sanitize<'a>(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::Html(raw) | Event::InlineHtml(raw) if !self.raw_html => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Link {
                link_type,
                dest_url: CowStr::Borrowed("#"),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Image {
                link_type,
                dest_url: CowStr::Borrowed("#"),
                title,
                id,
            }),
            other => other,
        }
    }

    /// Replace each fenced code block with highlighted HTML. A block whose
    /// highlighting fails keeps its original events and renders plainly.
    fn highlight_code_blocks<'a>(&self, events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut output = Vec::new();
        let mut block: Option<FencedBlock<'a>> = None;

        for event in events {
            if let Some(current) = block.as_mut() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(done) = block.take() {
                            self.finish_block(done, event, &mut output);
                        }
                    }
                    Event::Text(text) => {
                        current.code.push_str(&text);
                        current.events.push(Event::Text(text));
                    }
                    other => current.events.push(other),
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang))) => {
                    block = Some(FencedBlock {
                        lang: lang.to_string(),
                        code: String::new(),
                        events: vec![event],
                    });
                }
                other => output.push(other),
            }
        }

        output
    }

    fn finish_block<'a>(&self, block: FencedBlock<'a>, end: Event<'a>, output: &mut Vec<Event<'a>>) {
        match self.highlighter.highlight(&block.code, &block.lang) {
            Ok(highlighted) => output.push(Event::Html(CowStr::from(highlighted))),
            Err(e) => {
                tracing::warn!("Highlighting {:?} block failed, rendering plain: {}", block.lang, e);
                output.extend(block.events);
                output.push(end);
            }
        }
    }
}

/// A fenced code block being collected
struct FencedBlock<'a> {
    lang: String,
    code: String,
    events: Vec<Event<'a>>,
}

fn is_unsafe_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    UNSAFE_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Give every heading an `id` for deep links. Explicit `{#id}` attributes
/// are kept as written and reserved up front, so a generated id never
/// takes one, even for an earlier heading. Generated ids are slugs of the
/// heading text, suffixed `-1`, `-2`, ... when already taken.
fn assign_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    let mut used: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();
    let mut iter = events.into_iter();

    while let Some(event) = iter.next() {
        let (level, id, classes, attrs) = match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => (level, id, classes, attrs),
            other => {
                output.push(other);
                continue;
            }
        };

        let mut inner = Vec::new();
        let mut text = String::new();
        for inner_event in iter.by_ref() {
            let is_end = matches!(inner_event, Event::End(TagEnd::Heading(_)));
            if let Event::Text(t) | Event::Code(t) = &inner_event {
                text.push_str(t);
            }
            inner.push(inner_event);
            if is_end {
                break;
            }
        }

        let id = match id {
            Some(explicit) => explicit,
            None => CowStr::from(unique_id(&mut used, &text)),
        };

        output.push(Event::Start(Tag::Heading {
            level,
            id: Some(id),
            classes,
            attrs,
        }));
        output.extend(inner);
    }

    output
}

fn unique_id(used: &mut HashSet<String>, text: &str) -> String {
    let base = match slug::slugify(text) {
        s if s.is_empty() => "section".to_string(),
        s => s,
    };

    let mut candidate = base.clone();
    let mut n = 0;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
    used.insert(candidate.clone());
    candidate
}
