use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::warn;
use tauri::AppHandle;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::completion::CompletionDispatcher;
use crate::events;
use crate::settings::SettingsStore;
use crate::{audio::SoundPlayerHandle, session::state::TickOutcome};

use super::state::{Mode, SessionPhase, SessionSnapshot, SessionState};

/// Drives the session state machine from a one-second tick task and wires
/// its transitions to events and side-effect dispatch. The ticker handle
/// is the only tick source: spawning a new one always aborts the old one,
/// so at most one countdown is ever alive.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    app_handle: AppHandle,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    settings: Arc<SettingsStore>,
    sound: SoundPlayerHandle,
    dispatcher: Arc<CompletionDispatcher>,
}

impl SessionController {
    pub fn new(
        app_handle: AppHandle,
        settings: Arc<SettingsStore>,
        sound: SoundPlayerHandle,
        dispatcher: Arc<CompletionDispatcher>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            app_handle,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
            settings,
            sound,
            dispatcher,
        }
    }

    pub async fn get_snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Begin a fresh session, unconditionally replacing any countdown in
    /// progress. Also records the mode tag for theming continuity and
    /// fires the start cue/notification per the current preferences.
    pub async fn start_session(&self, mode: Mode, duration_minutes: f64) -> Result<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state
                .start(mode, duration_minutes, Utc::now())
                .map_err(|err| anyhow!(err))?;
            state.snapshot()
        };

        if let Err(err) = self.settings.set_mode_tag(mode.into()) {
            warn!("Failed to persist mode tag: {err:#}");
        }

        // A completion tone from the previous session may still be looping.
        if let Err(err) = self.sound.stop_all() {
            warn!("Failed to stop sounds on start: {err}");
        }

        let preferences = self.settings.preferences();
        self.dispatcher.session_started(mode, &preferences);

        self.spawn_ticker().await;
        events::emit_session_state_changed(&self.app_handle, snapshot.clone());
        Ok(snapshot)
    }

    /// No-op unless a session is running.
    pub async fn pause_session(&self) -> SessionSnapshot {
        let (changed, snapshot) = {
            let mut state = self.state.lock().await;
            (state.pause(), state.snapshot())
        };
        if changed {
            self.cancel_ticker().await;
            if let Err(err) = self.sound.stop_all() {
                warn!("Failed to stop sounds on pause: {err}");
            }
            events::emit_session_state_changed(&self.app_handle, snapshot.clone());
        }
        snapshot
    }

    /// No-op unless a session is paused.
    pub async fn resume_session(&self) -> SessionSnapshot {
        let (changed, snapshot) = {
            let mut state = self.state.lock().await;
            (state.resume(), state.snapshot())
        };
        if changed {
            self.spawn_ticker().await;
            events::emit_session_state_changed(&self.app_handle, snapshot.clone());
        }
        snapshot
    }

    /// Re-run the last selected mode and duration; a no-op when nothing
    /// has ever been started.
    pub async fn restart_session(&self) -> SessionSnapshot {
        let (restarted, mode, snapshot) = {
            let mut state = self.state.lock().await;
            let restarted = state.restart(Utc::now());
            (restarted, state.mode(), state.snapshot())
        };
        if !restarted {
            return snapshot;
        }

        if let Err(err) = self.sound.stop_all() {
            warn!("Failed to stop sounds on restart: {err}");
        }
        let preferences = self.settings.preferences();
        self.dispatcher.session_started(mode, &preferences);

        self.spawn_ticker().await;
        events::emit_session_state_changed(&self.app_handle, snapshot.clone());
        snapshot
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let app_handle = self.app_handle.clone();
        let settings = self.settings.clone();
        let dispatcher = self.dispatcher.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first interval tick completes immediately; consume it so
            // the countdown only advances after a full period.
            interval.tick().await;
            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    if guard.phase() != SessionPhase::Running {
                        break;
                    }
                    let outcome = guard.tick();
                    (outcome, guard.snapshot())
                };

                match outcome {
                    TickOutcome::Ticked => {
                        events::emit_session_tick(&app_handle, snapshot);
                    }
                    TickOutcome::Completed(mode) => {
                        // Preferences are re-read at completion time so a
                        // settings change mid-session takes effect.
                        let preferences = settings.preferences();
                        dispatcher.session_completed(mode, &preferences);
                        events::emit_session_completed(&app_handle, mode, snapshot);
                        break;
                    }
                    TickOutcome::Inactive => break,
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}
