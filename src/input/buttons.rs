//! Logical handheld buttons and their per-frame state

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::config::KeyBindings;

/// Delay before a held button starts repeating
pub const REPEAT_DELAY: Duration = Duration::from_millis(500);
/// Interval between repeats once started
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(150);
/// Without release reports, a button counts as held this long after its last key event
pub const HOLD_DECAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    L,
    R,
    Menu,
}

impl Button {
    pub const ALL: [Button; 13] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
        Button::Start,
        Button::Select,
        Button::L,
        Button::R,
        Button::Menu,
    ];

    /// Key in the `[keybindings]` section
    pub fn binding_name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
            Button::X => "x",
            Button::Y => "y",
            Button::Start => "start",
            Button::Select => "select",
            Button::L => "l",
            Button::R => "r",
            Button::Menu => "menu",
        }
    }

    /// First button bound to `key`
    pub fn from_key(bindings: &KeyBindings, key: &KeyEvent) -> Option<Button> {
        Button::ALL
            .into_iter()
            .find(|b| bindings.matches(b.binding_name(), key))
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of buttons packed into a bitmask
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Buttons(u16);

impl Buttons {
    fn has(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    fn set(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    fn clear(&mut self, button: Button) {
        self.0 &= !button.bit();
    }
}

#[derive(Debug, Clone, Copy)]
struct Held {
    /// Next synthesized repeat
    next_repeat: Instant,
    /// Last key event seen for this button
    last_event: Instant,
}

/// Pressed/repeated/released state, rebuilt each frame from key events
#[derive(Debug)]
pub struct InputState {
    /// Whether the terminal reports key releases
    reports_release: bool,
    pressed: Buttons,
    just_pressed: Buttons,
    just_repeated: Buttons,
    just_released: Buttons,
    held: [Option<Held>; Button::ALL.len()],
}

impl InputState {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            pressed: Buttons::default(),
            just_pressed: Buttons::default(),
            just_repeated: Buttons::default(),
            just_released: Buttons::default(),
            held: [None; Button::ALL.len()],
        }
    }

    /// Start a new frame: clear the one-shot flags, synthesize repeats for
    /// held buttons, and expire holds the terminal will never release
    pub fn begin_frame(&mut self, now: Instant) {
        self.just_pressed = Buttons::default();
        self.just_repeated = Buttons::default();
        self.just_released = Buttons::default();

        for button in Button::ALL {
            let Some(held) = self.held[button as usize].as_mut() else {
                continue;
            };
            if self.reports_release {
                if now >= held.next_repeat {
                    held.next_repeat = now + REPEAT_INTERVAL;
                    self.just_repeated.set(button);
                }
            } else if now.saturating_duration_since(held.last_event) >= HOLD_DECAY {
                self.release(button);
            }
        }
    }

    /// Feed one key event that mapped to `button`
    pub fn handle(&mut self, button: Button, kind: KeyEventKind, now: Instant) {
        match kind {
            KeyEventKind::Release => self.release(button),
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(held) = self.held[button as usize].as_mut() {
                    held.last_event = now;
                    // The terminal's own autorepeat stands in for ours
                    if !self.reports_release {
                        self.just_repeated.set(button);
                    }
                    return;
                }
                self.press(button, now);
            }
        }
    }

    /// Drop every hold, e.g. after waking from sleep
    pub fn reset(&mut self) {
        *self = Self::new(self.reports_release);
    }

    fn press(&mut self, button: Button, now: Instant) {
        self.pressed.set(button);
        self.just_pressed.set(button);
        self.just_repeated.set(button);
        self.held[button as usize] = Some(Held {
            next_repeat: now + REPEAT_DELAY,
            last_event: now,
        });
    }

    fn release(&mut self, button: Button) {
        if self.held[button as usize].take().is_some() {
            self.pressed.clear(button);
            self.just_released.set(button);
        }
    }

    pub fn just_pressed(&self, button: Button) -> bool {
        self.just_pressed.has(button)
    }

    /// Pressed this frame, or repeating while held
    pub fn just_repeated(&self, button: Button) -> bool {
        self.just_repeated.has(button)
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed.has(button)
    }

    pub fn just_released(&self, button: Button) -> bool {
        self.just_released.has(button)
    }

    pub fn any_pressed(&self) -> bool {
        self.pressed != Buttons::default()
    }
}
