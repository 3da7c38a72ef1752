//! Markdown rendering pipeline.
//!
//! `render` turns a note's raw markdown into an HTML fragment that is safe to
//! hand to the display layer. It runs in three steps: conversion with
//! GitHub-flavored extensions, task-list rewriting (part of conversion), and
//! allow-list sanitization. Rendering never fails: if the converter errors or
//! panics, the raw text is escaped line by line instead.

mod markdown;
mod sanitize;

use std::panic::{self, AssertUnwindSafe};

pub use markdown::PulldownConverter;
pub use sanitize::{
    AllowList, AllowListSanitizer, ALLOWED_ATTRIBUTES, ALLOWED_TAGS, ALLOWED_URL_SCHEMES,
    STRIPPED_CONTENT_TAGS,
};

use crate::error::{Error, Result};

/// Converts markdown source into (unsanitized) HTML.
pub trait MarkdownConverter: Send + Sync {
    fn convert(&self, raw_text: &str) -> Result<String>;
}

/// Filters HTML down to an allow-list.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Converter settings, fixed when the pipeline is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// GFM pipe tables
    pub tables: bool,
    /// `~~strikethrough~~`
    pub strikethrough: bool,
    /// `- [ ]` / `- [x]` items rendered as disabled checkboxes
    pub task_lists: bool,
    /// Bare URLs become links
    pub autolinks: bool,
    /// Single newlines inside a paragraph become `<br>`
    pub hard_breaks: bool,
    /// Headings get slug `id`s
    pub heading_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            task_lists: true,
            autolinks: true,
            hard_breaks: true,
            heading_ids: true,
        }
    }
}

/// Result of a render, with the degradation flag exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    /// True when conversion failed and the plain-text fallback was used
    pub degraded: bool,
}

/// Converter plus sanitizer, configured once at startup.
pub struct RenderPipeline {
    converter: Box<dyn MarkdownConverter>,
    sanitizer: Box<dyn Sanitizer>,
}

impl RenderPipeline {
    /// Build the standard pipeline with the given converter options
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self::with_parts(
            Box::new(PulldownConverter::new(options)),
            Box::new(AllowListSanitizer::default()),
        )
    }

    /// Build a pipeline from custom parts
    #[must_use]
    pub fn with_parts(converter: Box<dyn MarkdownConverter>, sanitizer: Box<dyn Sanitizer>) -> Self {
        Self {
            converter,
            sanitizer,
        }
    }

    /// Render markdown to sanitized HTML
    #[must_use]
    pub fn render(&self, raw_text: &str) -> String {
        self.render_detailed(raw_text).html
    }

    /// Render markdown to sanitized HTML, reporting whether it degraded
    #[must_use]
    pub fn render_detailed(&self, raw_text: &str) -> RenderOutput {
        if raw_text.is_empty() {
            return RenderOutput {
                html: String::new(),
                degraded: false,
            };
        }

        let converted = panic::catch_unwind(AssertUnwindSafe(|| self.converter.convert(raw_text)))
            .unwrap_or_else(|_| {
                Err(Error::RenderDegraded(
                    "markdown converter panicked".to_string(),
                ))
            });

        let (html, degraded) = match converted {
            Ok(html) => (html, false),
            Err(error) => {
                tracing::warn!("Falling back to plain-text preview: {}", error);
                (plain_text_html(raw_text), true)
            }
        };

        RenderOutput {
            html: self.sanitizer.sanitize(&html),
            degraded,
        }
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Escape each line and join lines with `<br>`.
fn plain_text_html(raw_text: &str) -> String {
    raw_text
        .split('\n')
        .map(|line| ammonia::clean_text(line.trim_end_matches('\r')))
        .collect::<Vec<_>>()
        .join("<br>")
}
