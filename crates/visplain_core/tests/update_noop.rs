use visplain_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn viewport_messages_on_home_page_are_ignored() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::ViewportZoomed { factor: 2.0 });
    let (mut next, _) = update(next, Msg::BackClicked);

    assert_eq!(state.view().screen, next.view().screen);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
