//! Scene state machine: which top-level screen owns update and draw.
//!
//! Exactly one mode is active. Transitions happen only through explicit user
//! action: a confirmed menu item (mapped by [`transition_for`]) or an Escape
//! edge from `Credits`/`Playing` back to `Menu`. Escape in `Menu` does
//! nothing; the process exits via the menu's Quit action or a window close.

use crate::menu::MenuAction;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneMode {
    /// Initial mode.
    #[default]
    Menu,
    Credits,
    Playing,
}

impl SceneMode {
    pub const ALL: &'static [SceneMode] =
        &[SceneMode::Menu, SceneMode::Credits, SceneMode::Playing];

    pub fn label(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Credits => "credits",
            Self::Playing => "playing",
        }
    }

    /// Escape edge behavior for this mode. `None` means Escape is ignored.
    pub fn escape_target(self) -> Option<SceneMode> {
        match self {
            Self::Menu => None,
            Self::Credits | Self::Playing => Some(Self::Menu),
        }
    }
}

impl std::fmt::Display for SceneMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a confirmed menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    Enter(SceneMode),
    Quit,
}

/// Pure mapping from menu action to scene transition. Exhaustive by
/// construction, so adding a menu action without deciding its transition is
/// a compile error.
pub fn transition_for(action: MenuAction) -> ModeTransition {
    match action {
        MenuAction::StartGame => ModeTransition::Enter(SceneMode::Playing),
        MenuAction::ShowCredits => ModeTransition::Enter(SceneMode::Credits),
        MenuAction::Quit => ModeTransition::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_mode_is_menu() {
        assert_eq!(SceneMode::default(), SceneMode::Menu);
    }

    #[test]
    fn menu_actions_map_to_expected_transitions() {
        assert_eq!(
            transition_for(MenuAction::StartGame),
            ModeTransition::Enter(SceneMode::Playing)
        );
        assert_eq!(
            transition_for(MenuAction::ShowCredits),
            ModeTransition::Enter(SceneMode::Credits)
        );
        assert_eq!(transition_for(MenuAction::Quit), ModeTransition::Quit);
    }

    #[test]
    fn escape_returns_to_menu_from_credits_and_playing() {
        assert_eq!(SceneMode::Credits.escape_target(), Some(SceneMode::Menu));
        assert_eq!(SceneMode::Playing.escape_target(), Some(SceneMode::Menu));
    }

    #[test]
    fn escape_is_ignored_in_menu() {
        assert_eq!(SceneMode::Menu.escape_target(), None);
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<&str> = SceneMode::ALL.iter().map(|m| m.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SceneMode::ALL.len());
    }

    #[test]
    fn display_matches_label() {
        for &mode in SceneMode::ALL {
            assert_eq!(format!("{mode}"), mode.label());
        }
    }
}
