use visplain_core::{
    update, AppState, BackendOrigin, Effect, GraphResult, Msg, ProgressSettings, RequestFailure,
    ScreenView, SubmitAction,
};

fn started(settings: ProgressSettings) -> AppState {
    let state = AppState::with_settings(BackendOrigin::default(), settings);
    let (state, _) = update(state, Msg::RepoOwnerChanged("octo".into()));
    let (state, _) = update(state, Msg::RepoNameChanged("repo".into()));
    let (state, _) = update(state, Msg::SubmitClicked(SubmitAction::Graph));
    state
}

fn percent(state: &AppState) -> (u8, bool) {
    match state.view().screen {
        ScreenView::Home(form) => (form.progress_percent, form.progress_running),
        other => panic!("expected home screen, got {other:?}"),
    }
}

#[test]
fn ticks_are_monotonic_and_capped_below_completion() {
    let mut state = started(ProgressSettings::new(7, 90));
    let mut last = 0;
    for _ in 0..40 {
        let (next, effects) = update(state, Msg::ProgressTick { request_id: 1 });
        assert!(effects.is_empty());
        let (value, running) = percent(&next);
        assert!(running);
        assert!(value >= last);
        assert!(value < 100);
        last = value;
        state = next;
    }
    assert_eq!(last, 90);
}

#[test]
fn failure_resets_progress_to_zero() {
    let state = started(ProgressSettings::default());
    let (state, _) = update(state, Msg::ProgressTick { request_id: 1 });
    let (state, _) = update(state, Msg::ProgressTick { request_id: 1 });
    assert_eq!(percent(&state), (20, true));

    let (state, effects) = update(
        state,
        Msg::GraphCompleted {
            request_id: 1,
            result: Err(RequestFailure::new("network error")),
        },
    );
    assert_eq!(effects, vec![Effect::StopProgress { request_id: 1 }]);
    assert_eq!(percent(&state), (0, false));

    // A tick that was already queued when the timer stopped changes nothing.
    let (mut state, _) = update(state, Msg::ProgressTick { request_id: 1 });
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::ProgressTick { request_id: 1 });
    assert_eq!(percent(&state), (0, false));
    assert!(!state.consume_dirty());
}

#[test]
fn success_stops_timer_before_leaving_the_form() {
    let state = started(ProgressSettings::default());
    let (_, effects) = update(
        state,
        Msg::GraphCompleted {
            request_id: 1,
            result: Ok(GraphResult {
                visualization_path: "/static/generated_graph.png".into(),
                description: None,
            }),
        },
    );

    assert_eq!(effects[0], Effect::StopProgress { request_id: 1 });
    let stops = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::StopProgress { .. }))
        .count();
    assert_eq!(stops, 1);
}

#[test]
fn leaving_the_form_mid_request_releases_timer() {
    let state = started(ProgressSettings::default());
    let (state, effects) = update(state, Msg::Navigate(visplain_core::Route::Graph(None)));
    assert_eq!(effects, vec![Effect::StopProgress { request_id: 1 }]);

    // The answer arrives after the form was torn down.
    let (mut state, effects) = update(
        state,
        Msg::GraphCompleted {
            request_id: 1,
            result: Ok(GraphResult {
                visualization_path: "/static/late.png".into(),
                description: None,
            }),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    match state.view().screen {
        ScreenView::Graph(view) => assert!(view.content.is_none()),
        other => panic!("expected graph screen, got {other:?}"),
    }
    let (mut state, _) = update(state, Msg::ProgressTick { request_id: 1 });
    assert!(!state.consume_dirty());
}
