//! What the screen shows for a given game state
//!
//! Everything here is derived from the counter alone. The number image is
//! the only piece that also depends on the filesystem, so the controller
//! keeps it separately.

use crate::app::state::{GameState, Phase};

pub const COUNT_LABEL: &str = "Click to Count";
pub const PLAY_AGAIN_LABEL: &str = "Play Again";
pub const EXIT_LABEL: &str = "Exit Game";
pub const CONGRATULATIONS_TEXT: &str = "GOOD JOB !";
pub const REPLAY_PROMPT_TEXT: &str = "Let's Play Again:";

/// Visual treatment of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Plain button used while counting
    Neutral,
    /// Green button offering another round
    Affirmative,
    /// Blue exit button
    SecondaryAffirmative,
}

/// Label and style of one button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonFace {
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Visible elements for one game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub phase: Phase,
    /// Status line, `None` when hidden
    pub status: Option<String>,
    pub show_congratulations: bool,
    pub show_replay_prompt: bool,
    pub primary: ButtonFace,
    pub exit: ButtonFace,
}

impl Presentation {
    pub fn for_state(state: &GameState) -> Self {
        let exit = ButtonFace {
            label: EXIT_LABEL,
            style: ButtonStyle::SecondaryAffirmative,
        };

        match state.phase() {
            Phase::Counting(n) => Self {
                phase: Phase::Counting(n),
                status: Some(status_text(n)),
                show_congratulations: false,
                show_replay_prompt: false,
                primary: ButtonFace {
                    label: COUNT_LABEL,
                    style: ButtonStyle::Neutral,
                },
                exit,
            },
            Phase::Complete => Self {
                phase: Phase::Complete,
                status: None,
                show_congratulations: true,
                show_replay_prompt: true,
                primary: ButtonFace {
                    label: PLAY_AGAIN_LABEL,
                    style: ButtonStyle::Affirmative,
                },
                exit,
            },
        }
    }

    /// True while the counting display is the one on screen
    pub fn is_counting(&self) -> bool {
        matches!(self.phase, Phase::Counting(_))
    }
}

/// Status line for a counted number
pub fn status_text(number: u8) -> String {
    format!("This is number {number}")
}
