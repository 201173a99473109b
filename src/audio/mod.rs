pub mod tone;

use log::warn;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use tone::{StartCue, ToneCue};

enum AudioCommand {
    PlayTone { tone: u8, asset: Option<PathBuf> },
    PlayStartCue { asset: Option<PathBuf> },
    StopAll,
}

/// Plays completion tones and the start cue on a dedicated thread holding
/// the non-Send audio objects. Starting any cue interrupts whatever is
/// currently playing; playback failures never leave this boundary.
#[derive(Clone)]
pub struct SoundPlayerHandle {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
    is_playing: Arc<AtomicBool>,
}

impl SoundPlayerHandle {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            is_playing: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let is_playing = Arc::clone(&self.is_playing);

        thread::Builder::new()
            .name("sound-player".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn fresh_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    *stream = None;
                    let (s, handle) = OutputStream::try_default()
                        .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                    let new_sink = Sink::try_new(&handle)
                        .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                    *stream = Some(s);
                    *sink = Some(new_sink);
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayTone { tone, asset } => {
                            if let Err(err) = fresh_sink(&mut _stream, &mut sink) {
                                warn!("Tone {tone} not played: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                match asset.as_deref().and_then(decoded) {
                                    Some(source) => s.append(source.repeat_infinite()),
                                    None => s.append(ToneCue::for_tone(tone)),
                                }
                                is_playing.store(true, Ordering::SeqCst);
                            }
                        }
                        AudioCommand::PlayStartCue { asset } => {
                            if let Err(err) = fresh_sink(&mut _stream, &mut sink) {
                                warn!("Start cue not played: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                match asset.as_deref().and_then(decoded) {
                                    Some(source) => s.append(source),
                                    None => s.append(StartCue::new()),
                                }
                                is_playing.store(true, Ordering::SeqCst);
                            }
                        }
                        AudioCommand::StopAll => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                            is_playing.store(false, Ordering::SeqCst);
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }

    /// Play one of the five completion tones, looping until stopped.
    /// `asset` is the cached audio file; when absent or undecodable the
    /// synthesized chime plays instead.
    pub fn play_tone(&self, tone: u8, asset: Option<PathBuf>) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::PlayTone { tone, asset })
            .map_err(|e| e.to_string())
    }

    pub fn play_start_cue(&self, asset: Option<PathBuf>) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::PlayStartCue { asset })
            .map_err(|e| e.to_string())
    }

    pub fn stop_all(&self) -> Result<(), String> {
        if let Ok(Some(tx)) = self.tx.lock().map(|g| g.clone()) {
            let _ = tx.send(AudioCommand::StopAll);
        }
        self.is_playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_any_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }
}

impl Default for SoundPlayerHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn decoded(path: &Path) -> Option<Decoder<BufReader<File>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!("Failed to open cue asset {}: {err}", path.display());
            return None;
        }
    };
    match Decoder::new(BufReader::new(file)) {
        Ok(source) => Some(source),
        Err(err) => {
            warn!("Failed to decode cue asset {}: {err}", path.display());
            None
        }
    }
}
