use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseState, WheelDelta};

/// Touchpad pixels per wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

/// What is held right now, built from every event since startup.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Physical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    /// Accumulated wheel position in lines.
    pub scroll: f32,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies `ev` and records any press or release in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        frame.num_events += 1;
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,
            InputEvent::Focused(focused) => {
                self.focused = focused;
                // Releases are not delivered while unfocused.
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { key, state, .. } => match state {
                ButtonState::Pressed if self.keys_down.insert(key) => frame.keys_pressed.push(key),
                ButtonState::Released if self.keys_down.remove(&key) => frame.keys_released.push(key),
                _ => {}
            },
            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed if self.buttons_down.insert(button) => {
                    frame.buttons_pressed.push(button)
                }
                ButtonState::Released if self.buttons_down.remove(&button) => {
                    frame.buttons_released.push(button)
                }
                _ => {}
            },
            InputEvent::Wheel(delta) => {
                self.scroll += match delta {
                    WheelDelta::Lines(y) => y,
                    WheelDelta::Pixels(y) => y / PIXELS_PER_LINE,
                };
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Snapshot for application code. A pointer outside the window reports (0, 0).
    pub fn mouse_state(&self) -> MouseState {
        let (x, y) = self.pointer_pos.unwrap_or((0.0, 0.0));
        MouseState {
            x: x as i32,
            y: y as i32,
            scroll: self.scroll as i32,
            left: self.button_down(MouseButton::Left),
            middle: self.button_down(MouseButton::Middle),
            right: self.button_down(MouseButton::Right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn button(button: MouseButton, state: ButtonState) -> InputEvent {
        InputEvent::PointerButton { button, state }
    }

    #[test]
    fn held_key_is_pressed_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::F1, ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Key { key: Key::F1, state: ButtonState::Pressed, repeat: true });
        assert_eq!(frame.keys_pressed, vec![Key::F1]);
        assert_eq!(frame.num_events, 2);

        frame.clear();
        state.apply_event(&mut frame, key(Key::F1, ButtonState::Pressed));
        assert!(frame.keys_pressed.is_empty());
        assert!(state.key_down(Key::F1));

        state.apply_event(&mut frame, key(Key::F1, ButtonState::Released));
        assert_eq!(frame.keys_released, vec![Key::F1]);
        assert!(!state.key_down(Key::F1));
    }

    #[test]
    fn presses_keep_arrival_order() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for k in [Key::F8, Key::Escape, Key::F1] {
            state.apply_event(&mut frame, key(k, ButtonState::Pressed));
        }
        assert_eq!(frame.keys_pressed, vec![Key::F8, Key::Escape, Key::F1]);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed));
        state.apply_event(&mut frame, button(MouseButton::Left, ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn mouse_snapshot() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 10.5, y: 20.0 });
        state.apply_event(&mut frame, button(MouseButton::Right, ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Lines(2.0)));
        state.apply_event(&mut frame, InputEvent::Wheel(WheelDelta::Pixels(40.0)));

        assert_eq!(
            state.mouse_state(),
            MouseState { x: 10, y: 20, scroll: 3, left: false, middle: false, right: true }
        );
        assert_eq!(frame.buttons_pressed, vec![MouseButton::Right]);

        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!((state.mouse_state().x, state.mouse_state().y), (0, 0));
    }
}
