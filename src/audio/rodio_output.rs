//! rodio-backed sound output

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::{AudioError, AudioOutput, Playback};

/// Plays sound files on the default output device
///
/// The stream must outlive every sink created from it, so it is kept here
/// even though only the handle is used after opening.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    /// Opens the system default output device
    pub fn open_default() -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|_| AudioError::DeviceUnavailable)?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, path: &Path) -> Result<Box<dyn Playback>, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let sink = Sink::try_new(&self.handle).map_err(|e| AudioError::Sink(e.to_string()))?;
        sink.append(source);

        Ok(Box::new(RodioPlayback { sink }))
    }
}

/// A sound queued on its own sink
struct RodioPlayback {
    sink: Sink,
}

impl Playback for RodioPlayback {
    fn stop(&mut self) {
        self.sink.stop();
    }
}
