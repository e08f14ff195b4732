//! Game state management
//!
//! Defines the counting state machine and its transitions. The state is a
//! single counter; everything visible on screen is derived from it.

use tracing::debug;

/// First number shown when a round starts
pub const FIRST_NUMBER: u8 = 1;
/// Last number that is counted before the round completes
pub const LAST_NUMBER: u8 = 10;
/// Counter value representing the completed round
const COMPLETE_NUMBER: u8 = LAST_NUMBER + 1;

/// Progress through the counting round
///
/// `current_number` stays in `FIRST_NUMBER..=LAST_NUMBER + 1`; the value past
/// the last number means the round is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    current_number: u8,
}

impl GameState {
    /// Creates the state for a fresh round
    pub fn new() -> Self {
        Self {
            current_number: FIRST_NUMBER,
        }
    }

    /// Raw counter value
    pub fn current_number(&self) -> u8 {
        self.current_number
    }

    /// Phase view of the counter
    pub fn phase(&self) -> Phase {
        if self.current_number > LAST_NUMBER {
            Phase::Complete
        } else {
            Phase::Counting(self.current_number)
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase(), Phase::Complete)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Which display the round is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing number n (1..=10)
    Counting(u8),
    /// Congratulations screen with the replay prompt
    Complete,
}

/// Events that can move the round forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Count to the next number
    Advance,
    /// Start over from the first number
    Replay,
    /// Leave the game
    Exit,
}

impl GameEvent {
    /// Event carried by the primary button in the given phase
    pub fn primary_for(phase: Phase) -> Self {
        match phase {
            Phase::Counting(_) => GameEvent::Advance,
            Phase::Complete => GameEvent::Replay,
        }
    }
}

/// Result of applying an event to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed and the new phase must be entered
    Entered(GameState),
    /// The event does not apply in the current phase
    Ignored(GameState),
    /// The session ends
    Exit,
}

/// State machine for round transitions
pub struct StateMachine;

impl StateMachine {
    /// Applies an event and returns the resulting transition
    ///
    /// # Arguments
    /// * `current` - State before the event
    /// * `event` - Event to process
    pub fn process_event(current: GameState, event: GameEvent) -> Transition {
        match (current.phase(), event) {
            (_, GameEvent::Exit) => Transition::Exit,

            (Phase::Counting(n), GameEvent::Advance) => {
                // Counting(10) steps onto the completion value
                Transition::Entered(GameState {
                    current_number: (n + 1).min(COMPLETE_NUMBER),
                })
            }

            (Phase::Complete, GameEvent::Replay) => Transition::Entered(GameState::new()),

            (phase, event) => {
                debug!(?phase, ?event, "Event ignored in current phase");
                Transition::Ignored(current)
            }
        }
    }
}
