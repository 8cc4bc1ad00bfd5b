//! Input handling
//!
//! Key events are folded into [`InputState`] as they arrive; once per frame
//! [`update`] turns the resulting button state into navigation.

mod buttons;

pub use buttons::{Button, InputState};

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::app::App;
use crate::state::directory::{AlphaJump, Step};
use crate::state::session::Activation;

/// Feed one key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    app.idle.touch();

    if key.kind != KeyEventKind::Release && is_quit(app, &key) {
        log::info!("quit requested");
        app.should_quit = true;
        return;
    }

    match Button::from_key(&app.config.keybindings, &key) {
        Some(button) => app.input.handle(button, key.kind, Instant::now()),
        None => log::trace!("unmapped key {:?}", key.code),
    }
}

fn is_quit(app: &App, key: &KeyEvent) -> bool {
    let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    ctrl_c || app.config.keybindings.matches("quit", key)
}

/// Apply this frame's button state. Called after all pending events are fed.
pub fn update(app: &mut App) {
    if app.sleeping {
        if app.input.just_pressed(Button::Menu) {
            log::debug!("waking");
            app.wake();
        }
        return;
    }

    navigate(app);
    if app.launched.is_some() {
        return;
    }

    // Synthesized repeats produce no key events
    if app.input.any_pressed() {
        app.idle.touch();
    }
    // Menu doubles as a modifier, so sleep only once it is let go
    if app.input.just_released(Button::Menu) || app.idle.expired() {
        log::debug!("sleeping");
        app.sleep();
    }
}

fn navigate(app: &mut App) {
    let input = &app.input;
    let mut moved = false;

    if input.just_repeated(Button::Up) {
        moved |= app.session.move_selection(Step::Up);
    } else if input.just_repeated(Button::Down) {
        moved |= app.session.move_selection(Step::Down);
    }

    if input.just_repeated(Button::Left) {
        moved |= app.session.move_selection(Step::PageUp);
    } else if input.just_repeated(Button::Right) {
        moved |= app.session.move_selection(Step::PageDown);
    }

    // Start/Select chords are reserved for the shoulder buttons
    if !input.is_pressed(Button::Start) && !input.is_pressed(Button::Select) {
        if input.just_repeated(Button::L) {
            moved |= app.session.jump_alpha(AlphaJump::Prev);
        } else if input.just_repeated(Button::R) {
            moved |= app.session.jump_alpha(AlphaJump::Next);
        }
    }

    if moved {
        app.dirty = true;
    }

    if app.input.just_pressed(Button::A) {
        match app.session.activate() {
            Ok(Activation::Nothing) => {}
            Ok(Activation::Opened) => app.dirty = true,
            Ok(Activation::Launched(command)) => {
                log::info!("launching {}", command);
                app.launched = Some(command);
                return;
            }
            Err(e) => {
                log::error!("activate failed: {}", e);
                app.dirty = true;
            }
        }
    }

    if app.input.just_pressed(Button::B) && app.session.ascend() {
        app.dirty = true;
    }
}
