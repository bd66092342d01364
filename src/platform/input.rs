//! Keyboard mapping

use crate::sim::PlayerAction;

/// Map a `KeyboardEvent.key` value to a player action
pub fn action_for_key(key: &str) -> Option<PlayerAction> {
    match key {
        "ArrowLeft" => Some(PlayerAction::MoveLeft),
        "ArrowRight" => Some(PlayerAction::MoveRight),
        "ArrowUp" => Some(PlayerAction::RotateClockwise),
        "ArrowDown" => Some(PlayerAction::RotateCounterClockwise),
        _ => None,
    }
}

/// The key that flips the persisted mute preference
pub fn is_mute_toggle(key: &str) -> bool {
    matches!(key, "m" | "M")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys() {
        assert_eq!(action_for_key("ArrowLeft"), Some(PlayerAction::MoveLeft));
        assert_eq!(action_for_key("ArrowRight"), Some(PlayerAction::MoveRight));
        assert_eq!(action_for_key("ArrowUp"), Some(PlayerAction::RotateClockwise));
        assert_eq!(
            action_for_key("ArrowDown"),
            Some(PlayerAction::RotateCounterClockwise)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(action_for_key(" "), None);
        assert_eq!(action_for_key("a"), None);
        assert_eq!(action_for_key("Escape"), None);
        assert_eq!(action_for_key("m"), None);
    }

    #[test]
    fn test_mute_key() {
        assert!(is_mute_toggle("m"));
        assert!(is_mute_toggle("M"));
        assert!(!is_mute_toggle("ArrowUp"));
        assert!(!is_mute_toggle("n"));
    }
}
