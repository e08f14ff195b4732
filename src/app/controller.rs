//! Game controller
//!
//! The controller owns the game state and every side effect that follows
//! from it: the number image, the status line, the sound and the twirl.
//! The window forwards user input here and reads back what to draw.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::app::state::{GameEvent, GameState, Phase, StateMachine, Transition};
use crate::assets::{AssetResolver, BACKGROUND_IMAGE, image_name, sound_name};
use crate::audio::{AudioOutput, AudioSlot};
use crate::ui::animation::Twirl;
use crate::ui::presentation::Presentation;

/// Errors that end the application before or while it runs
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("The game window is not supported on {0}")]
    UnsupportedPlatform(&'static str),
}

/// Main game controller
///
/// All mutation goes through `handle_primary`, `dispatch` and `exit`.
pub struct GameController {
    state: GameState,
    presentation: Presentation,
    /// Resolved image for the current number, `None` when empty
    number_image: Option<PathBuf>,
    twirl: Option<Twirl>,
    resolver: AssetResolver,
    /// Declared before the output so the active sound stops before the device closes
    audio: AudioSlot,
    audio_output: Box<dyn AudioOutput>,
    finished: bool,
}

impl GameController {
    /// Creates a controller and enters the first number
    pub fn new(resolver: AssetResolver, audio_output: Box<dyn AudioOutput>) -> Self {
        let state = GameState::new();
        let mut controller = Self {
            state,
            presentation: Presentation::for_state(&state),
            number_image: None,
            twirl: None,
            resolver,
            audio: AudioSlot::new(),
            audio_output,
            finished: false,
        };
        controller.enter_phase();
        controller
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn number_image(&self) -> Option<&PathBuf> {
        self.number_image.as_ref()
    }

    /// Most recently started twirl, if any
    pub fn twirl(&self) -> Option<Twirl> {
        self.twirl
    }

    pub fn is_audio_active(&self) -> bool {
        self.audio.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Resolves the background image
    pub fn background_image(&self) -> Option<PathBuf> {
        let resolved = self.resolver.resolve(BACKGROUND_IMAGE);
        if resolved.is_none() {
            warn!("Background image not found: {BACKGROUND_IMAGE}");
        }
        resolved
    }

    /// Handles a click on the primary button
    ///
    /// While counting this advances; on the completion screen it replays.
    pub fn handle_primary(&mut self) -> Transition {
        let event = GameEvent::primary_for(self.state.phase());
        self.dispatch(event)
    }

    /// Processes an event through the state machine and applies its effects
    pub fn dispatch(&mut self, event: GameEvent) -> Transition {
        if self.finished {
            debug!(?event, "Session finished, event dropped");
            return Transition::Exit;
        }

        let transition = StateMachine::process_event(self.state, event);
        match transition {
            Transition::Entered(next) => {
                debug!(from = ?self.state.phase(), to = ?next.phase(), "State transition");
                self.state = next;
                self.enter_phase();
            }
            Transition::Ignored(_) => {}
            Transition::Exit => {
                self.exit();
            }
        }
        transition
    }

    /// Ends the session, stopping any sound
    ///
    /// Safe to call more than once; returns true if a sound was stopped.
    pub fn exit(&mut self) -> bool {
        let released = self.audio.release();
        if !self.finished {
            info!("Exiting counting game");
        }
        self.finished = true;
        released
    }

    fn enter_phase(&mut self) {
        self.presentation = Presentation::for_state(&self.state);
        match self.state.phase() {
            Phase::Counting(n) => self.show_number(n),
            Phase::Complete => self.show_completion(),
        }
    }

    fn show_number(&mut self, number: u8) {
        self.number_image = self.resolver.resolve(&image_name(number));
        if self.number_image.is_none() {
            warn!("Image not found for number {number}");
        }

        self.play_sound(number);
        self.twirl = Some(Twirl::start(Instant::now()));
    }

    fn show_completion(&mut self) {
        info!("Round complete");
        self.number_image = None;
    }

    fn play_sound(&mut self, number: u8) {
        // The previous sound always stops, even when the next one is missing
        self.audio.release();

        let name = sound_name(number);
        let Some(path) = self.resolver.resolve(&name) else {
            warn!("Sound not found: {name}");
            return;
        };

        match self.audio_output.play(&path) {
            Ok(playback) => self.audio.replace(playback),
            Err(e) => warn!("Failed to play sound '{name}': {e}"),
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{AudioLog, FakeOutput};
    use crate::ui::presentation::{ButtonStyle, COUNT_LABEL, PLAY_AGAIN_LABEL};
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn write_asset(root: &Path, name: &str) -> PathBuf {
        let dir = root.join("countinggame").join("resources");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"asset").unwrap();
        path
    }

    fn assets_for(root: &Path, numbers: impl IntoIterator<Item = u8>) {
        for n in numbers {
            write_asset(root, &image_name(n));
            write_asset(root, &sound_name(n));
        }
    }

    fn controller(root: &Path) -> (GameController, Rc<RefCell<AudioLog>>) {
        let (output, log) = FakeOutput::new();
        (
            GameController::new(AssetResolver::new(root), Box::new(output)),
            log,
        )
    }

    fn advance(controller: &mut GameController, times: usize) {
        for _ in 0..times {
            controller.dispatch(GameEvent::Advance);
        }
    }

    #[test]
    fn starts_counting_one() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=1);
        let (controller, log) = controller(root.path());

        assert_eq!(controller.state().phase(), Phase::Counting(1));
        assert_eq!(
            controller.presentation().status.as_deref(),
            Some("This is number 1")
        );
        assert_eq!(
            controller.number_image(),
            Some(&root.path().join("countinggame/resources/1.png"))
        );
        assert!(controller.twirl().is_some());
        assert_eq!(log.borrow().played.len(), 1);
        assert!(controller.is_audio_active());
    }

    #[test]
    fn end_to_end_round_and_replay() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=10);
        let (mut controller, _log) = controller(root.path());

        advance(&mut controller, 9);
        assert_eq!(controller.state().phase(), Phase::Counting(10));
        assert_eq!(
            controller.presentation().status.as_deref(),
            Some("This is number 10")
        );

        advance(&mut controller, 1);
        let presentation = controller.presentation();
        assert_eq!(controller.state().phase(), Phase::Complete);
        assert!(presentation.show_congratulations);
        assert!(presentation.show_replay_prompt);
        assert!(presentation.status.is_none());
        assert!(controller.number_image().is_none());

        controller.handle_primary();
        let presentation = controller.presentation();
        assert_eq!(controller.state().phase(), Phase::Counting(1));
        assert_eq!(presentation.status.as_deref(), Some("This is number 1"));
        assert!(!presentation.show_congratulations);
        assert!(!presentation.show_replay_prompt);
        assert_eq!(presentation.primary.label, COUNT_LABEL);
        assert_eq!(presentation.primary.style, ButtonStyle::Neutral);
    }

    #[test]
    fn primary_dispatches_on_phase() {
        let root = TempDir::new().unwrap();
        let (mut controller, _log) = controller(root.path());

        advance(&mut controller, 10);
        assert_eq!(controller.presentation().primary.label, PLAY_AGAIN_LABEL);

        // Advance does nothing on the completion screen
        let transition = controller.dispatch(GameEvent::Advance);
        assert!(matches!(transition, Transition::Ignored(_)));
        assert_eq!(controller.state().phase(), Phase::Complete);

        let transition = controller.handle_primary();
        assert!(matches!(transition, Transition::Entered(_)));
        assert_eq!(controller.state().phase(), Phase::Counting(1));
    }

    #[test]
    fn each_advance_stops_prior_sound_once() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=3);
        let (mut controller, log) = controller(root.path());

        advance(&mut controller, 2);

        let log = log.borrow();
        assert_eq!(log.played.len(), 3);
        assert_eq!(
            log.stopped,
            vec![
                root.path().join("countinggame/resources/1.mp3"),
                root.path().join("countinggame/resources/2.mp3"),
            ]
        );
    }

    #[test]
    fn prior_sound_stops_when_next_is_missing() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=1);
        let (mut controller, log) = controller(root.path());

        advance(&mut controller, 1);

        assert_eq!(log.borrow().stopped.len(), 1);
        assert!(!controller.is_audio_active());
        assert_eq!(controller.state().phase(), Phase::Counting(2));
    }

    #[test]
    fn playback_failure_is_soft() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=2);
        let (output, log) = FakeOutput::failing();
        let mut controller = GameController::new(AssetResolver::new(root.path()), Box::new(output));

        advance(&mut controller, 1);

        assert!(log.borrow().played.is_empty());
        assert!(!controller.is_audio_active());
        assert_eq!(
            controller.presentation().status.as_deref(),
            Some("This is number 2")
        );
    }

    #[test]
    fn missing_image_leaves_region_empty() {
        let root = TempDir::new().unwrap();
        write_asset(root.path(), &sound_name(1));
        let (controller, log) = controller(root.path());

        assert!(controller.number_image().is_none());
        assert_eq!(
            controller.presentation().status.as_deref(),
            Some("This is number 1")
        );
        assert_eq!(log.borrow().played.len(), 1);
    }

    #[test]
    fn exit_releases_audio_exactly_once() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=3);
        let (mut controller, log) = controller(root.path());
        advance(&mut controller, 2);
        let stops_before_exit = log.borrow().stopped.len();

        assert!(controller.exit());
        assert!(!controller.exit());
        assert!(controller.is_finished());
        assert_eq!(log.borrow().stopped.len(), stops_before_exit + 1);

        drop(controller);
        assert_eq!(log.borrow().stopped.len(), stops_before_exit + 1);
    }

    #[test]
    fn exit_event_from_completion_screen() {
        let root = TempDir::new().unwrap();
        let (mut controller, _log) = controller(root.path());
        advance(&mut controller, 10);

        assert_eq!(controller.dispatch(GameEvent::Exit), Transition::Exit);
        assert!(controller.is_finished());

        // Nothing moves after exit
        assert_eq!(controller.handle_primary(), Transition::Exit);
        assert_eq!(controller.state().phase(), Phase::Complete);
    }

    #[test]
    fn drop_stops_active_sound() {
        let root = TempDir::new().unwrap();
        assets_for(root.path(), 1..=1);
        let (controller, log) = controller(root.path());
        drop(controller);
        assert_eq!(log.borrow().stopped.len(), 1);
    }

    #[test]
    fn background_resolves_through_bases() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("resources")).unwrap();
        let bg = root.path().join("resources").join(BACKGROUND_IMAGE);
        fs::write(&bg, b"bg").unwrap();
        let (controller, _log) = controller(root.path());
        assert_eq!(controller.background_image(), Some(bg));
    }
}
