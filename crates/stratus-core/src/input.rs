//! Input actions and per-tick input snapshots
//!
//! The update policy never looks at raw keys. It asks an [`InputSnapshot`]
//! whether an [`Action`] is held, or was pressed since the previous tick.

use std::collections::HashSet;

/// Every input the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    MoveDown,
    MoveUp,
    WindWest,
    WindEast,
    WindNorth,
    WindSouth,
    CoverageDown,
    CoverageUp,
    DensityDown,
    DensityUp,
    SunAzimuthDown,
    SunAzimuthUp,
    SunElevationDown,
    SunElevationUp,
    ToggleAccumulation,
    ToggleJitter,
    Reset,
    Quit,
}

impl Action {
    pub const ALL: [Action; 22] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::MoveDown,
        Action::MoveUp,
        Action::WindWest,
        Action::WindEast,
        Action::WindNorth,
        Action::WindSouth,
        Action::CoverageDown,
        Action::CoverageUp,
        Action::DensityDown,
        Action::DensityUp,
        Action::SunAzimuthDown,
        Action::SunAzimuthUp,
        Action::SunElevationDown,
        Action::SunElevationUp,
        Action::ToggleAccumulation,
        Action::ToggleJitter,
        Action::Reset,
        Action::Quit,
    ];
}

/// One tick's worth of input
pub trait InputSnapshot {
    /// The action's key is down
    fn held(&self, action: Action) -> bool;

    /// The action's key went down since the previous snapshot
    fn pressed_edge(&self, action: Action) -> bool;

    /// The window asked to close since the previous snapshot
    fn close_requested(&self) -> bool {
        false
    }
}

/// Immutable input state for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    close: bool,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action held for this tick
    pub fn with_held(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    /// Mark an action as freshly pressed (and therefore held) this tick
    pub fn with_press(mut self, action: Action) -> Self {
        self.held.insert(action);
        self.pressed.insert(action);
        self
    }

    pub fn with_close(mut self) -> Self {
        self.close = true;
        self
    }
}

impl InputSnapshot for InputFrame {
    fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn pressed_edge(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}

/// Accumulates key events between ticks.
///
/// Held state follows press/release events. Rising edges latch until the next
/// [`KeyboardState::snapshot`], so a press shorter than a tick is not lost and
/// a key held across many ticks produces exactly one edge. Auto-repeat
/// presses of an already-held key are ignored.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    close: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn request_close(&mut self) {
        self.close = true;
    }

    /// Drop all held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Take the current tick's input. Clears latched edges and close.
    pub fn snapshot(&mut self) -> InputFrame {
        InputFrame {
            held: self.held.clone(),
            pressed: std::mem::take(&mut self.pressed),
            close: std::mem::take(&mut self.close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_produces_one_edge() {
        let mut keys = KeyboardState::new();
        keys.press(Action::ToggleJitter);

        let first = keys.snapshot();
        assert!(first.held(Action::ToggleJitter));
        assert!(first.pressed_edge(Action::ToggleJitter));

        for _ in 0..9 {
            // OS key repeat while held
            keys.press(Action::ToggleJitter);
            let frame = keys.snapshot();
            assert!(frame.held(Action::ToggleJitter));
            assert!(!frame.pressed_edge(Action::ToggleJitter));
        }
    }

    #[test]
    fn tap_between_ticks_is_not_lost() {
        let mut keys = KeyboardState::new();
        keys.press(Action::Reset);
        keys.release(Action::Reset);

        let frame = keys.snapshot();
        assert!(frame.pressed_edge(Action::Reset));
        assert!(!frame.held(Action::Reset));
        assert!(!keys.snapshot().pressed_edge(Action::Reset));
    }

    #[test]
    fn release_and_press_again_is_a_new_edge() {
        let mut keys = KeyboardState::new();
        keys.press(Action::ToggleAccumulation);
        keys.snapshot();
        keys.release(Action::ToggleAccumulation);
        keys.snapshot();
        keys.press(Action::ToggleAccumulation);
        assert!(keys.snapshot().pressed_edge(Action::ToggleAccumulation));
    }

    #[test]
    fn close_is_reported_once() {
        let mut keys = KeyboardState::new();
        keys.request_close();
        assert!(keys.snapshot().close_requested());
        assert!(!keys.snapshot().close_requested());
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut keys = KeyboardState::new();
        keys.press(Action::MoveForward);
        keys.press(Action::CoverageUp);
        keys.release_all();
        let frame = keys.snapshot();
        assert!(Action::ALL.iter().all(|&a| !frame.held(a)));
    }
}
