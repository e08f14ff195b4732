//! Sound playback
//!
//! Playback goes through the `AudioOutput` seam so the controller never
//! touches a device directly. `AudioSlot` holds the one sound that may be
//! playing and stops it on every way out: replacement, exit and drop.

#[cfg(windows)]
pub mod rodio_output;

use std::path::{Path, PathBuf};

#[cfg(windows)]
pub use rodio_output::RodioOutput;

/// Playback errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device available")]
    DeviceUnavailable,

    #[error("Failed to open sound file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode sound file {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to create playback sink: {0}")]
    Sink(String),
}

/// A sound that has started playing
pub trait Playback {
    /// Stops the sound; calling it again has no effect
    fn stop(&mut self);
}

/// Something that can start playing sound files
pub trait AudioOutput {
    fn play(&mut self, path: &Path) -> Result<Box<dyn Playback>, AudioError>;
}

/// Output used when no device could be opened
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, _path: &Path) -> Result<Box<dyn Playback>, AudioError> {
        Err(AudioError::DeviceUnavailable)
    }
}

/// Opens the default device, falling back to silence
#[cfg(windows)]
pub fn open_default_output() -> Box<dyn AudioOutput> {
    match RodioOutput::open_default() {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::warn!("Audio disabled: {e}");
            Box::new(SilentOutput)
        }
    }
}

/// Sound output is only wired up for the Windows build
#[cfg(not(windows))]
pub fn open_default_output() -> Box<dyn AudioOutput> {
    tracing::warn!("Audio disabled: no output backend for this platform");
    Box::new(SilentOutput)
}

/// Owner of the single active playback handle
#[derive(Default)]
pub struct AudioSlot {
    active: Option<Box<dyn Playback>>,
}

impl AudioSlot {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Stops and drops the active handle
    ///
    /// Returns true if a handle was released.
    pub fn release(&mut self) -> bool {
        match self.active.take() {
            Some(mut playback) => {
                playback.stop();
                true
            }
            None => false,
        }
    }

    /// Releases the previous handle, then keeps `playback`
    pub fn replace(&mut self, playback: Box<dyn Playback>) {
        self.release();
        self.active = Some(playback);
    }
}

impl Drop for AudioSlot {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake used by audio and controller tests

    use super::{AudioError, AudioOutput, Playback};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    /// Shared record of what the fake output did
    #[derive(Debug, Default)]
    pub struct AudioLog {
        pub played: Vec<PathBuf>,
        pub stopped: Vec<PathBuf>,
    }

    pub struct FakePlayback {
        path: PathBuf,
        log: Rc<RefCell<AudioLog>>,
        stopped: bool,
    }

    impl Playback for FakePlayback {
        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.log.borrow_mut().stopped.push(self.path.clone());
            }
        }
    }

    /// Output that records plays, optionally failing every one
    pub struct FakeOutput {
        pub log: Rc<RefCell<AudioLog>>,
        pub fail: bool,
    }

    impl FakeOutput {
        pub fn new() -> (Self, Rc<RefCell<AudioLog>>) {
            let log = Rc::new(RefCell::new(AudioLog::default()));
            (
                Self {
                    log: Rc::clone(&log),
                    fail: false,
                },
                log,
            )
        }

        pub fn failing() -> (Self, Rc<RefCell<AudioLog>>) {
            let (mut output, log) = Self::new();
            output.fail = true;
            (output, log)
        }
    }

    impl AudioOutput for FakeOutput {
        fn play(&mut self, path: &Path) -> Result<Box<dyn Playback>, AudioError> {
            if self.fail {
                return Err(AudioError::Decode {
                    path: path.to_path_buf(),
                    reason: "unsupported format".to_string(),
                });
            }
            self.log.borrow_mut().played.push(path.to_path_buf());
            Ok(Box::new(FakePlayback {
                path: path.to_path_buf(),
                log: Rc::clone(&self.log),
                stopped: false,
            }))
        }
    }
}
