use log::warn;
use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::session::state::{Mode, SessionSnapshot};
use crate::settings::Preferences;

const SESSION_TICK_EVENT: &str = "session-tick";
const SESSION_STATE_CHANGED_EVENT: &str = "session-state-changed";
const SESSION_COMPLETED_EVENT: &str = "session-completed";
const PREFERENCES_UPDATED_EVENT: &str = "preferences-updated";
const NOTIFICATIONS_BLOCKED_EVENT: &str = "notifications-blocked";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTickPayload {
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompletedPayload {
    pub mode: Mode,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsBlockedPayload {
    pub message: &'static str,
}

fn emit_event<S: Serialize + Clone>(app: &AppHandle, event: &str, payload: S) {
    if let Err(err) = app.emit(event, payload) {
        warn!("Failed to emit {event}: {err}");
    }
}

pub fn emit_session_tick(app: &AppHandle, snapshot: SessionSnapshot) {
    emit_event(app, SESSION_TICK_EVENT, SessionTickPayload { snapshot });
}

pub fn emit_session_state_changed(app: &AppHandle, snapshot: SessionSnapshot) {
    emit_event(
        app,
        SESSION_STATE_CHANGED_EVENT,
        SessionTickPayload { snapshot },
    );
}

pub fn emit_session_completed(app: &AppHandle, mode: Mode, snapshot: SessionSnapshot) {
    emit_event(
        app,
        SESSION_COMPLETED_EVENT,
        SessionCompletedPayload { mode, snapshot },
    );
}

pub fn emit_preferences_updated(app: &AppHandle, preferences: &Preferences) {
    emit_event(app, PREFERENCES_UPDATED_EVENT, preferences.clone());
}

pub fn emit_notifications_blocked(app: &AppHandle) {
    emit_event(
        app,
        NOTIFICATIONS_BLOCKED_EVENT,
        NotificationsBlockedPayload {
            message: "Notifications are blocked in system settings. Please enable them manually.",
        },
    );
}
