use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use visplain_client::{ReportWriter, ReqwestBackendClient};
use visplain_core::{
    update, AppState, AppViewModel, Msg, ScreenView, SelectedFile, SubmitAction, UploadMode,
};
use visplain_logging::{visplain_error, visplain_info};

use super::cli::{Cli, Command, RepoArgs};
use super::config::{AppConfig, ORIGIN_ENV};
use super::effects::EffectRunner;
use super::logging;
use super::ui::render::{self, Severity, TerminalLine};

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env_origin(std::env::var(ORIGIN_ENV).ok());
    config.apply_cli(&cli);
    logging::initialize(config.log_destination);

    let client_config = config.client_config()?;
    let client = ReqwestBackendClient::new(client_config.clone())
        .context("building the backend client")?;
    let runner = EffectRunner::new(Arc::new(client), config.engine_settings())
        .context("starting the request engine")?;
    visplain_info!(
        "visplain started; backend {} output {}",
        client_config.origin().as_str(),
        config.output_dir.display()
    );

    let (messages, zoom) = initial_messages(&cli.command)?;
    let mut session = Session::new(
        AppState::with_settings(client_config.origin().clone(), config.progress_settings()),
        runner,
    );
    for msg in messages {
        session.dispatch(msg);
    }

    loop {
        match settle(&session.state.view()) {
            Outcome::Pending => {
                let next = session
                    .runner
                    .next_msg(POLL_INTERVAL)
                    .context("waiting for the backend")?;
                if let Some(msg) = next {
                    session.dispatch(msg);
                }
            }
            Outcome::Failed(message) => {
                visplain_info!("Submission ended with alert: {}", message);
                return Ok(ExitCode::FAILURE);
            }
            Outcome::Ready => break,
        }
    }

    if let Some(factor) = zoom {
        session.dispatch(Msg::ViewportZoomed { factor });
    }

    let writer = ReportWriter::new(
        config.output_dir.clone(),
        Arc::new(|| Utc::now().to_rfc3339()),
    );
    let path = writer
        .write(&session.state.view().screen)
        .with_context(|| format!("writing report into {}", config.output_dir.display()))?;
    visplain_info!("Report written to {}", path.display());
    println!("Report written to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

/// Form input plus the submit click for the chosen subcommand.
fn initial_messages(command: &Command) -> anyhow::Result<(Vec<Msg>, Option<f32>)> {
    let mut messages = Vec::new();
    match command {
        Command::Graph(args) => {
            match &args.file {
                Some(path) => {
                    messages.push(Msg::ModeSelected(UploadMode::File));
                    messages.push(Msg::FileSelected(read_selected_file(path)?));
                }
                None => push_repo(&mut messages, &args.repo),
            }
            messages.push(Msg::SubmitClicked(SubmitAction::Graph));
            Ok((messages, args.zoom))
        }
        Command::Summary(repo) => {
            push_repo(&mut messages, repo);
            messages.push(Msg::SubmitClicked(SubmitAction::Summary));
            Ok((messages, None))
        }
    }
}

fn push_repo(messages: &mut Vec<Msg>, repo: &RepoArgs) {
    messages.push(Msg::ModeSelected(UploadMode::Repo));
    messages.push(Msg::RepoOwnerChanged(repo.owner.clone().unwrap_or_default()));
    messages.push(Msg::RepoNameChanged(repo.name.clone().unwrap_or_default()));
}

fn read_selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let bytes =
        fs::read(path).with_context(|| format!("reading source file {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} does not name a file", path.display()))?;
    Ok(SelectedFile::new(filename, bytes))
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Pending,
    Failed(String),
    Ready,
}

/// The run is over once the form shows an alert, or once a result screen no
/// longer waits on any image.
fn settle(view: &AppViewModel) -> Outcome {
    match &view.screen {
        ScreenView::Home(form) if form.loading => Outcome::Pending,
        ScreenView::Home(form) => Outcome::Failed(
            form.alert
                .clone()
                .unwrap_or_else(|| "nothing was submitted".to_string()),
        ),
        _ if view.pending_images() > 0 => Outcome::Pending,
        _ => Outcome::Ready,
    }
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    last_rendered: Vec<TerminalLine>,
}

impl Session {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            last_rendered: Vec::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.render();
        }
    }

    fn render(&mut self) {
        let lines = render::render(&self.state.view());
        if lines == self.last_rendered {
            return;
        }
        for line in &lines {
            if line.severity == Severity::Error {
                visplain_error!("{}", line.text);
            }
            eprintln!("{}", line.text);
        }
        self.last_rendered = lines;
    }
}
