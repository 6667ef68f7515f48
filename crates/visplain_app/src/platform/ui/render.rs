use visplain_core::{AppViewModel, FormView, ScreenView, UploadMode};

use super::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Information,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub severity: Severity,
    pub text: String,
}

impl TerminalLine {
    fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Information,
            text: text.into(),
        }
    }
}

/// Status lines for the current screen. Result screens are written as pages,
/// so they only get a one-line heading here.
pub fn render(view: &AppViewModel) -> Vec<TerminalLine> {
    match &view.screen {
        ScreenView::Home(form) => render_form(form),
        ScreenView::Graph(_) => vec![TerminalLine::info("Graph ready")],
        ScreenView::GraphDescription(_) => {
            vec![TerminalLine::info("Graph and description ready")]
        }
        ScreenView::RepoSummary(summary) => vec![TerminalLine::info(format!(
            "Repository summary ready ({} files)",
            summary.blocks.len()
        ))],
    }
}

fn render_form(form: &FormView) -> Vec<TerminalLine> {
    let mut lines = Vec::new();
    if form.loading {
        let source = match form.mode {
            UploadMode::File => form.file_name.clone().unwrap_or_default(),
            UploadMode::Repo => format!("{}/{}", form.repo_owner, form.repo_name),
        };
        lines.push(TerminalLine::info(format!(
            "{} {} {PROCESSING_LABEL} ({source})",
            progress_bar(form.progress_percent),
            format_percent(form.progress_percent),
        )));
    }
    if let Some(alert) = &form.alert {
        lines.push(TerminalLine {
            severity: Severity::Error,
            text: format!("{ALERT_PREFIX} {alert}"),
        });
    }
    lines
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * PROGRESS_BAR_WIDTH / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        " ".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn format_percent(percent: u8) -> String {
    format!("{percent:>3}%")
}
