//! Pointer state with two update rates.
//!
//! - **Button state** is level-triggered and tracked live: the runtime calls
//!   `press`/`release` while draining window events, and `is_down` answers
//!   from that state. There is no "just pressed" query.
//!
//! - **Position and focus** are latched: events only update a pending sample,
//!   and `refresh()` (called once per frame by the loop, after the user
//!   callback) copies it into `x`, `y` and `focused`. Between refreshes those
//!   fields describe the previous frame boundary.

use std::collections::HashSet;

use crate::error::{StageError, StageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

impl MouseButton {
    /// Maps 0, 1, 2 to primary, middle and secondary.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PointerSample {
    x: f64,
    y: f64,
    inside: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
    pub focused: bool,
    held: HashSet<MouseButton>,
    pending: PointerSample,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: MouseButton) {
        self.held.insert(button);
    }

    pub fn release(&mut self, button: MouseButton) {
        self.held.remove(&button);
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }

    pub fn is_down_index(&self, index: usize) -> StageResult<bool> {
        MouseButton::from_index(index)
            .map(|button| self.is_down(button))
            .ok_or(StageError::InvalidButton(index))
    }

    pub fn track_position(&mut self, x: f64, y: f64) {
        self.pending.x = x;
        self.pending.y = y;
    }

    /// Pointer entered (`true`) or left (`false`) the window.
    pub fn track_focus(&mut self, inside: bool) {
        self.pending.inside = inside;
        if !inside {
            // Buttons released outside the window never report back.
            self.held.clear();
        }
    }

    pub fn refresh(&mut self) {
        self.x = self.pending.x;
        self.y = self.pending.y;
        self.focused = self.pending.inside;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_level_triggered() {
        let mut cursor = Cursor::new();
        cursor.press(MouseButton::Primary);
        assert!(cursor.is_down(MouseButton::Primary));
        cursor.refresh();
        assert!(cursor.is_down(MouseButton::Primary));
        cursor.release(MouseButton::Primary);
        assert!(!cursor.is_down(MouseButton::Primary));
    }

    #[test]
    fn button_index_mapping() {
        let mut cursor = Cursor::new();
        cursor.press(MouseButton::Secondary);
        assert!(cursor.is_down_index(2).expect("valid index"));
        assert!(!cursor.is_down_index(0).expect("valid index"));
        assert!(matches!(
            cursor.is_down_index(3),
            Err(StageError::InvalidButton(3))
        ));
        assert_eq!(MouseButton::from_index(1), Some(MouseButton::Middle));
    }

    #[test]
    fn position_is_latched_until_refresh() {
        let mut cursor = Cursor::new();
        cursor.track_position(12.0, 34.0);
        cursor.track_focus(true);
        assert_eq!((cursor.x, cursor.y), (0.0, 0.0));
        assert!(!cursor.focused);

        cursor.refresh();
        assert_eq!((cursor.x, cursor.y), (12.0, 34.0));
        assert!(cursor.focused);
    }

    #[test]
    fn leaving_window_drops_held_buttons() {
        let mut cursor = Cursor::new();
        cursor.track_focus(true);
        cursor.press(MouseButton::Middle);
        cursor.track_focus(false);
        cursor.refresh();
        assert!(!cursor.focused);
        assert!(!cursor.is_down(MouseButton::Middle));
    }
}
