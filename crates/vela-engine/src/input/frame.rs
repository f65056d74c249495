use super::types::{Key, MouseButton};

/// Transitions seen by one event poll, in arrival order.
///
/// Repeats and presses of something already held are not listed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputFrame {
    pub keys_pressed: Vec<Key>,
    pub keys_released: Vec<Key>,
    pub buttons_pressed: Vec<MouseButton>,
    pub buttons_released: Vec<MouseButton>,
    /// Number of events applied.
    pub num_events: usize,
}

impl InputFrame {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.num_events == 0
    }
}
