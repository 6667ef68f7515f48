//! HTML rendering of result screens.
//!
//! Each result view becomes one self-contained page in the output directory.
//! Images that were downloaded are referenced by their local path, images
//! still pending fall back to the remote URL, hidden images are left out.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use pulldown_cmark::{html, Event, Options, Parser};
use visplain_core::{
    FormView, GraphView, ImageStatus, ImageView, ScreenView, SummaryView, UploadMode,
};

use crate::filename::deterministic_filename;
use crate::persist::{AtomicFileWriter, PersistError};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:auto;padding:20px}\
.viewport{overflow:hidden;border-radius:10px}\
.viewport img{width:100%;transform-origin:center}\
.summary{padding:10px;border:1px solid #ddd;border-radius:8px;margin-bottom:15px}\
.description{padding:15px;border:1px solid #ddd;border-radius:10px;background:#f9f9f9}\
.alert{color:#b00020}";

const BACK_LINK: &str = "<p><a href=\"javascript:history.back()\">Back to Home</a></p>";

/// Renders markdown with tables, strikethrough and task lists enabled.
///
/// Raw HTML in the source is shown as text, never passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Renders one screen as a complete HTML document.
pub fn render_page(screen: &ScreenView, generated_utc: &str) -> String {
    let (title, body) = match screen {
        ScreenView::Home(form) => ("Code Visplain", render_form(form)),
        ScreenView::Graph(view) => ("Graph Visualization", render_graph(view)),
        ScreenView::GraphDescription(view) => ("Graph Visualization", render_graph(view)),
        ScreenView::RepoSummary(view) => ("Repository Summary", render_summary(view)),
    };

    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}\
<footer><small>Generated {generated}</small></footer>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
        generated = escape_html(generated_utc),
    );
    page
}

fn render_form(form: &FormView) -> String {
    let mut out = String::new();
    let source = match form.mode {
        UploadMode::File => form
            .file_name
            .as_deref()
            .map(|name| format!("File: {name}"))
            .unwrap_or_else(|| "File: none selected".to_string()),
        UploadMode::Repo => format!("Repository: {}/{}", form.repo_owner, form.repo_name),
    };
    let _ = writeln!(out, "<p>{}</p>", escape_html(&source));
    if form.loading {
        let _ = writeln!(
            out,
            "<progress max=\"100\" value=\"{}\"></progress>",
            form.progress_percent
        );
    }
    if let Some(alert) = &form.alert {
        let _ = writeln!(out, "<p class=\"alert\">{}</p>", escape_html(alert));
    }
    out
}

fn render_graph(view: &GraphView) -> String {
    let mut out = String::new();
    match &view.content {
        Some(content) => {
            let (x, y) = content.viewport.offset();
            let transform = format!(
                "translate({x}px, {y}px) scale({})",
                content.viewport.scale()
            );
            if let Some(img) = render_image(&content.image, "Generated Graph", &transform) {
                let _ = writeln!(out, "<div class=\"viewport\">{img}</div>");
            }
            if let Some(description) = &content.description {
                let _ = writeln!(
                    out,
                    "<section class=\"description\"><h2>Description</h2><p>{}</p></section>",
                    escape_html(description)
                );
            }
        }
        None => {
            let fallback = view.fallback.unwrap_or_default();
            let _ = writeln!(out, "<p>{}</p>", escape_html(fallback));
            let _ = writeln!(out, "{BACK_LINK}");
        }
    }
    out
}

fn render_summary(view: &SummaryView) -> String {
    let mut out = String::new();
    if let Some(diagram) = &view.diagram {
        let _ = writeln!(out, "<section><h2>Block Diagram</h2>");
        if let Some(img) = render_image(diagram, "Block Diagram", "none") {
            let _ = writeln!(out, "{img}");
        }
        let _ = writeln!(out, "</section>");
    }
    if let Some(placeholder) = view.diagram_placeholder {
        let _ = writeln!(out, "<p>{}</p>", escape_html(placeholder));
    }

    if view.blocks.is_empty() {
        let placeholder = view.summaries_placeholder.unwrap_or_default();
        let _ = writeln!(out, "<p>{}</p>", escape_html(placeholder));
        return out;
    }

    let _ = writeln!(out, "<section><h2>File Summaries</h2>");
    for block in &view.blocks {
        let _ = writeln!(
            out,
            "<article class=\"summary\"><h3>{}</h3>\n<div class=\"markdown-body\">{}</div></article>",
            escape_html(&block.heading),
            markdown_to_html(&block.markdown)
        );
    }
    let _ = writeln!(out, "</section>");
    out
}

fn render_image(image: &ImageView, alt: &str, transform: &str) -> Option<String> {
    let src = match &image.status {
        ImageStatus::Loaded { stored_as } => stored_as.as_str(),
        ImageStatus::Pending => image.url.as_str(),
        ImageStatus::Hidden => return None,
    };
    Some(format!(
        "<img src=\"{}\" alt=\"{}\" style=\"transform: {}\" onerror=\"this.style.display='none'\">",
        escape_html(src),
        escape_html(alt),
        escape_html(transform)
    ))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes rendered screens into the output directory.
pub struct ReportWriter {
    writer: AtomicFileWriter,
    generated_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl ReportWriter {
    pub fn new(output_dir: PathBuf, generated_utc: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        Self {
            writer: AtomicFileWriter::new(output_dir),
            generated_utc,
        }
    }

    pub fn write(&self, screen: &ScreenView) -> Result<PathBuf, PersistError> {
        let generated = (self.generated_utc)();
        let page = render_page(screen, &generated);
        let filename = deterministic_filename(page_stem(screen), &page_key(screen), "html");
        self.writer.write(&filename, page)
    }
}

fn page_stem(screen: &ScreenView) -> &'static str {
    match screen {
        ScreenView::Home(_) => "home",
        ScreenView::Graph(_) => "graph",
        ScreenView::GraphDescription(_) => "graph-description",
        ScreenView::RepoSummary(_) => "repo-summary",
    }
}

/// Pages showing the same artifact land on the same file.
fn page_key(screen: &ScreenView) -> String {
    match screen {
        ScreenView::Home(form) => format!("{}/{}", form.repo_owner, form.repo_name),
        ScreenView::Graph(view) | ScreenView::GraphDescription(view) => view
            .content
            .as_ref()
            .map(|content| content.image.url.clone())
            .unwrap_or_default(),
        ScreenView::RepoSummary(view) => {
            let mut key = view
                .diagram
                .as_ref()
                .map(|diagram| diagram.url.clone())
                .unwrap_or_default();
            for block in &view.blocks {
                key.push('\n');
                key.push_str(&block.heading);
            }
            key
        }
    }
}
