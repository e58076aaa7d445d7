//! Physical key to action mapping

use std::collections::HashMap;
use stratus_core::Action;
use winit::keyboard::KeyCode;

/// Maps physical keys to loop actions.
///
/// Physical keys are used so the layout stays put on non-QWERTY keyboards.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_pairs([
            (KeyCode::KeyW, Action::MoveForward),
            (KeyCode::KeyS, Action::MoveBack),
            (KeyCode::KeyA, Action::StrafeLeft),
            (KeyCode::KeyD, Action::StrafeRight),
            (KeyCode::KeyQ, Action::MoveDown),
            (KeyCode::KeyE, Action::MoveUp),
            (KeyCode::ArrowLeft, Action::WindWest),
            (KeyCode::ArrowRight, Action::WindEast),
            (KeyCode::ArrowUp, Action::WindNorth),
            (KeyCode::ArrowDown, Action::WindSouth),
            (KeyCode::KeyZ, Action::CoverageDown),
            (KeyCode::KeyX, Action::CoverageUp),
            (KeyCode::KeyC, Action::DensityDown),
            (KeyCode::KeyV, Action::DensityUp),
            (KeyCode::KeyO, Action::SunAzimuthDown),
            (KeyCode::KeyP, Action::SunAzimuthUp),
            (KeyCode::KeyK, Action::SunElevationDown),
            (KeyCode::KeyL, Action::SunElevationUp),
            (KeyCode::KeyT, Action::ToggleAccumulation),
            (KeyCode::KeyF, Action::ToggleJitter),
            (KeyCode::KeyR, Action::Reset),
            (KeyCode::Escape, Action::Quit),
        ])
    }
}

impl KeyBindings {
    /// Later pairs win when a key appears twice
    pub fn from_pairs(pairs: impl IntoIterator<Item = (KeyCode, Action)>) -> Self {
        Self { map: pairs.into_iter().collect() }
    }

    pub fn action(&self, key: KeyCode) -> Option<Action> {
        self.map.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_default_key() {
        let bindings = KeyBindings::default();
        for action in Action::ALL {
            assert!(
                bindings.map.values().any(|&a| a == action),
                "{action:?} is unbound"
            );
        }
        assert_eq!(bindings.map.len(), Action::ALL.len());
    }

    #[test]
    fn default_layout() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action(KeyCode::KeyQ), Some(Action::MoveDown));
        assert_eq!(bindings.action(KeyCode::ArrowLeft), Some(Action::WindWest));
        assert_eq!(bindings.action(KeyCode::KeyX), Some(Action::CoverageUp));
        assert_eq!(bindings.action(KeyCode::KeyF), Some(Action::ToggleJitter));
        assert_eq!(bindings.action(KeyCode::Escape), Some(Action::Quit));
        assert_eq!(bindings.action(KeyCode::Space), None);
    }

    #[test]
    fn later_pair_replaces_earlier_binding() {
        let bindings = KeyBindings::from_pairs([
            (KeyCode::KeyQ, Action::MoveDown),
            (KeyCode::KeyQ, Action::Quit),
        ]);
        assert_eq!(bindings.action(KeyCode::KeyQ), Some(Action::Quit));
        assert_eq!(bindings.action(KeyCode::Escape), None);
    }
}
