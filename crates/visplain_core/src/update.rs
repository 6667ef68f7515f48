use crate::form::{PendingRequest, SubmitAction};
use crate::model::{RequestFailure, RequestId};
use crate::navigator::Route;
use crate::page::{ImageStatus, Page};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ModeSelected(mode) => {
            edit_form(&mut state, |form| form.set_mode(mode));
            Vec::new()
        }
        Msg::FileSelected(file) => {
            edit_form(&mut state, |form| {
                form.set_file(Some(file));
                true
            });
            Vec::new()
        }
        Msg::FileCleared => {
            edit_form(&mut state, |form| {
                form.set_file(None);
                true
            });
            Vec::new()
        }
        Msg::RepoOwnerChanged(owner) => {
            edit_form(&mut state, |form| {
                form.set_repo_owner(owner);
                true
            });
            Vec::new()
        }
        Msg::RepoNameChanged(name) => {
            edit_form(&mut state, |form| {
                form.set_repo_name(name);
                true
            });
            Vec::new()
        }
        Msg::AlertDismissed => {
            edit_form(&mut state, |form| form.dismiss_alert());
            Vec::new()
        }
        Msg::SubmitClicked(action) => submit(&mut state, action),
        Msg::ProgressTick { request_id } => {
            edit_form(&mut state, |form| form.tick(request_id));
            Vec::new()
        }
        Msg::GraphCompleted { request_id, result } => complete(
            &mut state,
            request_id,
            SubmitAction::Graph,
            result.map(Route::for_graph),
        ),
        Msg::SummaryCompleted { request_id, result } => complete(
            &mut state,
            request_id,
            SubmitAction::Summary,
            result.map(Route::for_summary),
        ),
        Msg::ImageLoaded {
            image_id,
            stored_as,
        } => {
            settle_image(&mut state, image_id, ImageStatus::Loaded { stored_as });
            Vec::new()
        }
        Msg::ImageFailed { image_id } => {
            settle_image(&mut state, image_id, ImageStatus::Hidden);
            Vec::new()
        }
        Msg::ViewportDragged { dx, dy } => {
            edit_viewport(&mut state, |viewport| viewport.pan(dx, dy));
            Vec::new()
        }
        Msg::ViewportZoomed { factor } => {
            edit_viewport(&mut state, |viewport| viewport.zoom_by(factor));
            Vec::new()
        }
        Msg::ViewportReset => {
            edit_viewport(&mut state, |viewport| viewport.reset());
            Vec::new()
        }
        Msg::BackClicked => {
            if matches!(state.page(), Page::Home(_)) {
                Vec::new()
            } else {
                navigate(&mut state, Route::Home)
            }
        }
        Msg::Navigate(route) => navigate(&mut state, route),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn edit_form(state: &mut AppState, edit: impl FnOnce(&mut crate::FormState) -> bool) {
    let changed = state
        .navigator_mut()
        .page_mut()
        .form_mut()
        .is_some_and(edit);
    if changed {
        state.mark_dirty();
    }
}

fn edit_viewport(state: &mut AppState, edit: impl FnOnce(&mut crate::Viewport) -> bool) {
    let changed = state
        .navigator_mut()
        .page_mut()
        .viewport_mut()
        .is_some_and(edit);
    if changed {
        state.mark_dirty();
    }
}

fn navigate(state: &mut AppState, route: Route) -> Vec<Effect> {
    state.mark_dirty();
    state.navigator_mut().navigate(route)
}

fn submit(state: &mut AppState, action: SubmitAction) -> Vec<Effect> {
    let validated = match state.navigator_mut().page_mut().form_mut() {
        // One outstanding request per page: repeated clicks are dropped.
        Some(form) if form.is_loading() => return Vec::new(),
        Some(form) => form.validate(action),
        None => return Vec::new(),
    };
    state.mark_dirty();

    let pending = match validated {
        Ok(pending) => pending,
        Err(err) => {
            if let Some(form) = state.navigator_mut().page_mut().form_mut() {
                form.reject(err);
            }
            return Vec::new();
        }
    };

    let request_id = state.allocate_request_id();
    if let Some(form) = state.navigator_mut().page_mut().form_mut() {
        form.begin(request_id, action);
    }
    let request = match pending {
        PendingRequest::Graph(request) => Effect::RequestGraph {
            request_id,
            request,
        },
        PendingRequest::Summary(request) => Effect::RequestSummary {
            request_id,
            request,
        },
    };
    vec![Effect::StartProgress { request_id }, request]
}

/// Applies a backend answer. Answers for a page that is gone, or for a
/// request the page no longer waits on, are dropped.
fn complete(
    state: &mut AppState,
    request_id: RequestId,
    action: SubmitAction,
    outcome: Result<Route, RequestFailure>,
) -> Vec<Effect> {
    let Some(form) = state.navigator_mut().page_mut().form_mut() else {
        return Vec::new();
    };
    if !form.owns(request_id, action) {
        return Vec::new();
    }

    let mut effects = vec![Effect::StopProgress { request_id }];
    match outcome {
        Ok(route) => {
            form.finish_success();
            effects.extend(navigate(state, route));
        }
        Err(failure) => {
            form.finish_failure(failure);
            state.mark_dirty();
        }
    }
    effects
}

fn settle_image(state: &mut AppState, image_id: crate::ImageId, status: ImageStatus) {
    let Some(slot) = state.navigator_mut().page_mut().image_mut(image_id) else {
        return;
    };
    if slot.status != ImageStatus::Pending {
        return;
    }
    slot.status = status;
    state.mark_dirty();
}
