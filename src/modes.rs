//! Mode state machine.
//!
//! `Menu -> {Manual, Assisted, Autonomous} -> Menu`. Entering a play mode
//! resets the round; returning to the menu is the only way out of a finished
//! round. Pause is a session flag, not a mode.

/// Which subsystems are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Menu,
    Manual,
    Assisted,
    Autonomous,
}

impl Mode {
    pub fn is_play(self) -> bool {
        !matches!(self, Mode::Menu)
    }

    /// Player placement input is accepted only in manual and assisted play;
    /// autonomous play keeps pause and menu-exit only.
    pub fn allows_player_placement(self) -> bool {
        matches!(self, Mode::Manual | Mode::Assisted)
    }

    /// The gravity scheduler runs only in these modes; autonomous play paces
    /// itself by oracle latency plus the think-time delay.
    pub fn uses_gravity(self) -> bool {
        matches!(self, Mode::Manual | Mode::Assisted)
    }

    /// Display-only suggestion channel.
    pub fn uses_suggestions(self) -> bool {
        matches!(self, Mode::Assisted)
    }

    /// Oracle moves drive every placement.
    pub fn uses_oracle_moves(self) -> bool {
        matches!(self, Mode::Autonomous)
    }

    /// Valid transitions: menu into any play mode, any play mode back to the
    /// menu. Everything else (including play-to-play) is rejected.
    pub fn can_transition_to(self, next: Mode) -> bool {
        match (self, next) {
            (Mode::Menu, to) => to.is_play(),
            (from, Mode::Menu) => from.is_play(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAY_MODES: [Mode; 3] = [Mode::Manual, Mode::Assisted, Mode::Autonomous];

    #[test]
    fn menu_enters_every_play_mode() {
        for mode in PLAY_MODES {
            assert!(Mode::Menu.can_transition_to(mode));
        }
    }

    #[test]
    fn play_modes_only_return_to_menu() {
        for from in PLAY_MODES {
            assert!(from.can_transition_to(Mode::Menu));
            for to in PLAY_MODES {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn menu_to_menu_is_rejected() {
        assert!(!Mode::Menu.can_transition_to(Mode::Menu));
    }

    #[test]
    fn subsystem_flags() {
        assert!(Mode::Manual.allows_player_placement());
        assert!(Mode::Assisted.allows_player_placement());
        assert!(!Mode::Autonomous.allows_player_placement());
        assert!(!Mode::Menu.allows_player_placement());

        assert!(Mode::Assisted.uses_suggestions());
        assert!(!Mode::Manual.uses_suggestions());

        assert!(Mode::Autonomous.uses_oracle_moves());
        assert!(!Mode::Autonomous.uses_gravity());
    }
}
