//! Built-in note content.

/// Seeded as the only note on first launch, or when saved state is unusable.
pub const WELCOME_NOTE: &str = r#"# Welcome to Jotdown

Tabbed markdown notes with a live preview.

## Features
- **GitHub-flavored markdown**: tables, task lists, strikethrough, autolinks
- **Live preview**: editor only, split view, or preview only
- **Multiple notes**: each note is a tab
- **Auto-save**: changes are written shortly after you stop typing
- **Themes**: light and dark
- **Export/Import**: back up and restore every note as JSON

## View Modes
- **Editor Only**: write without distractions
- **Split View**: edit and preview side by side (default)
- **Preview Only**: full-width preview for reading

### Switching views
1. Toggle the preview to open split view
2. Press **Ctrl+Shift+P** to switch between split and preview-only
3. Use "◀ Editor" in preview-only mode to return to split view

## Markdown Examples

### Text Formatting
- **Bold text** using `**bold**`
- *Italic text* using `*italic*`
- `Inline code` using backticks
- ~~Strikethrough~~ using `~~text~~`

### Task Lists
- [x] Completed task
- [ ] Incomplete task
- [x] Another completed task

### Code Blocks
```rust
fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}
```

### Tables
| Feature | Status | Notes |
|---------|--------|-------|
| Markdown | ✅ | GFM |
| Dark Mode | ✅ | Toggle available |
| Export | ✅ | JSON or Markdown |

### Links
[Visit GitHub](https://github.com) or just paste https://www.rust-lang.org

### Blockquotes
> This is a blockquote. It can span multiple lines
> and is styled as one block.

---

## Getting Started
1. Create a new note with "+"
2. Start typing markdown
3. Toggle the preview to see the rendered output
4. Your notes save automatically

Happy note-taking! 📝"#;
