//! Input handling: maps key/mouse events and timer ticks to state
//! mutations.

use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::PrimaryAction => primary_action(state),
        Action::NudgeLeft => state.carousel.nudge(-1),
        Action::NudgeRight => state.carousel.nudge(1),
    }
}

/// Process a mouse event.  Left-drag on the strip scrolls it; a click on
/// the button triggers the primary action.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let (col, row) = (mouse.column, mouse.row);
    let pointer_x = f64::from(col);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.hit.in_button(col, row) {
                primary_action(state);
            } else if state.hit.in_carousel(col, row) {
                state.carousel.begin_drag(pointer_x, now);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            state.carousel.drag_to(pointer_x, now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.carousel.end_drag(now);
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
            if state.hit.in_carousel(col, row) {
                state.carousel.nudge(1);
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
            if state.hit.in_carousel(col, row) {
                state.carousel.nudge(-1);
            }
        }
        _ => {}
    }
}

/// "Get started": stops the autoscroll for good.
fn primary_action(state: &mut AppState) {
    if state.carousel.stop_autoscroll() {
        state.status_message = Some("Autoscroll stopped".into());
    }
}

/// One autoscroll timer tick.
pub fn on_autoscroll_tick(state: &mut AppState) {
    state.carousel.tick_autoscroll();
}

/// The entrance startup delay elapsed.
pub fn start_entrance(state: &mut AppState, now: Instant) {
    if state.entrance_enabled {
        state.entrance.begin(now);
    }
}

/// Per-frame housekeeping before drawing: momentum, entrance progress and
/// the ambient crossfade.
pub fn on_frame(state: &mut AppState, now: Instant) {
    let dt = now.saturating_duration_since(state.last_frame);
    state.last_frame = now;
    state.frame_count = state.frame_count.wrapping_add(1);

    state.carousel.step(dt);
    state.entrance.update(now);

    let accent = state.carousel.active_card().and_then(|c| c.accent_rgb());
    state.ambient.set_target(accent);
    state.ambient.tick();
}
