use std::sync::Once;

use pretty_assertions::assert_eq;
use visplain_core::{
    update, AppState, Effect, Msg, RepoRef, ScreenView, SelectedFile, SubmitAction,
    SummaryRequest, UploadMode, UploadRequest, ValidationError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(visplain_logging::initialize_for_tests);
}

fn home(state: &AppState) -> visplain_core::FormView {
    match state.view().screen {
        ScreenView::Home(form) => form,
        other => panic!("expected home screen, got {other:?}"),
    }
}

fn with_repo(owner: &str, name: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::RepoOwnerChanged(owner.to_string()));
    let (state, _) = update(state, Msg::RepoNameChanged(name.to_string()));
    state
}

#[test]
fn file_mode_without_file_is_rejected_before_network() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(UploadMode::File));
    let (state, effects) = update(state, Msg::SubmitClicked(SubmitAction::Graph));

    assert!(effects.is_empty());
    let form = home(&state);
    assert!(!form.loading);
    assert_eq!(form.alert, Some(ValidationError::MissingFile.to_string()));
}

#[test]
fn repo_mode_with_missing_field_is_rejected_before_network() {
    init_logging();
    for (owner, name) in [("", "repo"), ("owner", ""), ("  ", "repo"), ("", "")] {
        for action in [SubmitAction::Graph, SubmitAction::Summary] {
            let state = with_repo(owner, name);
            let (state, effects) = update(state, Msg::SubmitClicked(action));

            assert!(effects.is_empty(), "{owner:?}/{name:?} {action:?}");
            let form = home(&state);
            assert!(!form.loading);
            assert_eq!(
                form.alert.as_deref(),
                Some("Please enter both repository owner and name.")
            );
        }
    }
}

#[test]
fn unsupported_file_type_is_rejected() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(UploadMode::File));
    let (state, _) = update(
        state,
        Msg::FileSelected(SelectedFile::new("main.rs", b"fn main() {}".to_vec())),
    );
    let (state, effects) = update(state, Msg::SubmitClicked(SubmitAction::Graph));

    assert!(effects.is_empty());
    assert!(home(&state).alert.unwrap().contains("main.rs"));
}

#[test]
fn summary_from_file_mode_is_rejected() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(UploadMode::File));
    let (state, _) = update(
        state,
        Msg::FileSelected(SelectedFile::new("main.py", b"print(1)".to_vec())),
    );
    let (state, effects) = update(state, Msg::SubmitClicked(SubmitAction::Summary));

    assert!(effects.is_empty());
    assert_eq!(
        home(&state).alert,
        Some(ValidationError::SummaryNeedsRepo.to_string())
    );
}

#[test]
fn valid_file_submission_emits_upload_request() {
    init_logging();
    let file = SelectedFile::new("main.py", b"print(1)".to_vec());
    let (state, _) = update(AppState::new(), Msg::ModeSelected(UploadMode::File));
    let (state, _) = update(state, Msg::FileSelected(file.clone()));
    let (state, effects) = update(state, Msg::SubmitClicked(SubmitAction::Graph));

    assert_eq!(
        effects,
        vec![
            Effect::StartProgress { request_id: 1 },
            Effect::RequestGraph {
                request_id: 1,
                request: UploadRequest::File(file),
            },
        ]
    );
    let form = home(&state);
    assert!(form.loading);
    assert!(!form.submit_enabled);
    assert_eq!(form.progress_percent, 0);
}

#[test]
fn repo_submissions_trim_inputs() {
    init_logging();
    let state = with_repo(" octo ", "hello-world ");
    let (_, effects) = update(state, Msg::SubmitClicked(SubmitAction::Summary));
    let repo = RepoRef::new("octo", "hello-world").unwrap();

    assert_eq!(
        effects,
        vec![
            Effect::StartProgress { request_id: 1 },
            Effect::RequestSummary {
                request_id: 1,
                request: SummaryRequest { repo },
            },
        ]
    );
}

#[test]
fn repo_graph_ignores_stale_file_selection() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FileSelected(SelectedFile::new("main.py", Vec::new())),
    );
    let (state, _) = update(state, Msg::RepoOwnerChanged("octo".into()));
    let (state, _) = update(state, Msg::RepoNameChanged("repo".into()));
    let (_, effects) = update(state, Msg::SubmitClicked(SubmitAction::Graph));

    assert!(matches!(
        &effects[1],
        Effect::RequestGraph {
            request: UploadRequest::Repo(_),
            ..
        }
    ));
}

#[test]
fn second_submit_while_loading_is_dropped() {
    init_logging();
    let state = with_repo("octo", "repo");
    let (state, first) = update(state, Msg::SubmitClicked(SubmitAction::Graph));
    assert_eq!(first.len(), 2);

    let (state, second) = update(state, Msg::SubmitClicked(SubmitAction::Summary));
    assert!(second.is_empty());
    assert!(home(&state).loading);
    assert_eq!(home(&state).alert, None);
}

#[test]
fn failure_resets_loading_and_raises_generic_alert() {
    init_logging();
    let state = with_repo("octo", "repo");
    let (state, _) = update(state, Msg::SubmitClicked(SubmitAction::Graph));
    let (state, effects) = update(
        state,
        Msg::GraphCompleted {
            request_id: 1,
            result: Err(visplain_core::RequestFailure::new("http status 500")),
        },
    );

    assert_eq!(effects, vec![Effect::StopProgress { request_id: 1 }]);
    let form = home(&state);
    assert!(!form.loading);
    assert!(form.submit_enabled);
    assert_eq!(form.alert.as_deref(), Some(visplain_core::PROCESSING_FAILED));
    assert_eq!(form.repo_owner, "octo");

    // The form stays usable: dismiss and resubmit.
    let (state, _) = update(state, Msg::AlertDismissed);
    assert_eq!(home(&state).alert, None);
    let (_, effects) = update(state, Msg::SubmitClicked(SubmitAction::Graph));
    assert_eq!(effects[0], Effect::StartProgress { request_id: 2 });
}

#[test]
fn completion_for_other_action_is_ignored() {
    init_logging();
    let state = with_repo("octo", "repo");
    let (state, _) = update(state, Msg::SubmitClicked(SubmitAction::Graph));
    let (state, effects) = update(
        state,
        Msg::SummaryCompleted {
            request_id: 1,
            result: Ok(Default::default()),
        },
    );

    assert!(effects.is_empty());
    assert!(home(&state).loading);
}
