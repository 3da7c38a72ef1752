//! Markdown to HTML conversion on top of pulldown-cmark.
//!
//! The parser output is rewritten in a few passes before HTML is produced:
//! task items get a single disabled checkbox, soft breaks become hard breaks,
//! bare URLs become links, and headings get slug ids.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use pulldown_cmark::{
    html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;

use crate::error::Result;

use super::{MarkdownConverter, RenderOptions};

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:https?://|www\.)[^\s<>"]*[^\s<>"'.,:;!?)\]]"#).expect("Invalid regex")
});

static RAW_CHECKBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<input[^>]*type\s*=\s*["']?checkbox["']?[^>]*>"#).expect("Invalid regex")
});

static RAW_ANCHOR_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<a(?:\s|>)").expect("Invalid regex"));

static RAW_ANCHOR_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</a\s*>").expect("Invalid regex"));

const TASK_ITEM_OPEN: &str = r#"<li class="task-list-item">"#;
const CHECKED_BOX: &str =
    r#"<input type="checkbox" checked disabled class="task-list-item-checkbox"> "#;
const UNCHECKED_BOX: &str = r#"<input type="checkbox" disabled class="task-list-item-checkbox"> "#;

/// GitHub-flavored converter backed by `pulldown-cmark`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownConverter {
    options: RenderOptions,
}

impl PulldownConverter {
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.options.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.options.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.options.task_lists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }
}

impl MarkdownConverter for PulldownConverter {
    fn convert(&self, raw_text: &str) -> Result<String> {
        let parser = Parser::new_ext(raw_text, self.parser_options());
        let mut events: Vec<Event<'_>> = TextMergeStream::new(parser).collect();

        if self.options.task_lists {
            events = rewrite_task_items(events);
        }
        if self.options.hard_breaks {
            for event in &mut events {
                if matches!(event, Event::SoftBreak) {
                    *event = Event::HardBreak;
                }
            }
        }
        if self.options.autolinks {
            events = link_bare_urls(events);
        }
        if self.options.heading_ids {
            assign_heading_ids(&mut events);
        }

        let mut output = String::with_capacity(raw_text.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        Ok(output)
    }
}

/// Replace task markers with one disabled checkbox per task item.
fn rewrite_task_items(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let task_starts: HashSet<usize> = events
        .iter()
        .enumerate()
        .filter(|(index, event)| {
            matches!(event, Event::Start(Tag::Item)) && task_marker_follows(&events, *index)
        })
        .map(|(index, _)| index)
        .collect();

    let mut item_stack: Vec<bool> = Vec::new();
    let mut rewritten = Vec::with_capacity(events.len());

    for (index, event) in events.into_iter().enumerate() {
        let in_task_item = item_stack.last() == Some(&true);
        match event {
            Event::Start(Tag::Item) => {
                let is_task = task_starts.contains(&index);
                item_stack.push(is_task);
                if is_task {
                    rewritten.push(Event::Html(CowStr::Borrowed(TASK_ITEM_OPEN)));
                } else {
                    rewritten.push(Event::Start(Tag::Item));
                }
            }
            Event::End(TagEnd::Item) => {
                item_stack.pop();
                rewritten.push(Event::End(TagEnd::Item));
            }
            Event::TaskListMarker(checked) => {
                let checkbox = if checked { CHECKED_BOX } else { UNCHECKED_BOX };
                rewritten.push(Event::Html(CowStr::Borrowed(checkbox)));
            }
            Event::InlineHtml(raw) if in_task_item => {
                let cleaned = RAW_CHECKBOX.replace_all(&raw, "");
                if !cleaned.trim().is_empty() {
                    rewritten.push(Event::InlineHtml(CowStr::from(cleaned.into_owned())));
                }
            }
            Event::Html(raw) if in_task_item => {
                let cleaned = RAW_CHECKBOX.replace_all(&raw, "");
                if !cleaned.trim().is_empty() {
                    rewritten.push(Event::Html(CowStr::from(cleaned.into_owned())));
                }
            }
            other => rewritten.push(other),
        }
    }

    rewritten
}

/// Tight items put the marker right after the item start; loose items wrap
/// it in a paragraph first.
fn task_marker_follows(events: &[Event<'_>], item_index: usize) -> bool {
    match events.get(item_index + 1) {
        Some(Event::TaskListMarker(_)) => true,
        Some(Event::Start(Tag::Paragraph)) => {
            matches!(events.get(item_index + 2), Some(Event::TaskListMarker(_)))
        }
        _ => false,
    }
}

/// Turn bare `http(s)://` and `www.` URLs in plain text into links.
fn link_bare_urls(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut rewritten = Vec::with_capacity(events.len());
    // Links (parsed or raw `<a>`), images and code blocks keep their text verbatim.
    let mut opaque_depth = 0_usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                opaque_depth += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque_depth = opaque_depth.saturating_sub(1);
            }
            Event::InlineHtml(raw) if RAW_ANCHOR_OPEN.is_match(raw) => opaque_depth += 1,
            Event::InlineHtml(raw) if RAW_ANCHOR_CLOSE.is_match(raw) => {
                opaque_depth = opaque_depth.saturating_sub(1);
            }
            _ => {}
        }

        match event {
            Event::Text(text) if opaque_depth == 0 && BARE_URL.is_match(&text) => {
                push_linked_text(&mut rewritten, &text);
            }
            other => rewritten.push(other),
        }
    }

    rewritten
}

fn push_linked_text<'a>(output: &mut Vec<Event<'a>>, text: &str) {
    let mut last = 0;
    for found in BARE_URL.find_iter(text) {
        if found.start() > last {
            output.push(Event::Text(CowStr::from(text[last..found.start()].to_string())));
        }

        let url = found.as_str();
        let dest_url = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        output.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(dest_url),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        output.push(Event::Text(CowStr::from(url.to_string())));
        output.push(Event::End(TagEnd::Link));

        last = found.end();
    }

    if last < text.len() {
        output.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Give every heading a unique slug id (`intro`, `intro-1`, ...).
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for index in 0..events.len() {
        if !matches!(&events[index], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let base = slugify(&heading_text(&events[index + 1..]));
        if base.is_empty() {
            continue;
        }

        let count = seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[index] {
            *id = Some(CowStr::from(slug));
        }
    }
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(content) | Event::Code(content) => text.push_str(content),
            _ => {}
        }
    }
    text
}

fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
