use tauri::State;

use crate::session::presets;
use crate::session::progress::{self, RingGeometry};
use crate::session::state::{Mode, SessionSnapshot};
use crate::AppState;

#[tauri::command]
pub async fn get_session_state(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    Ok(state.session.get_snapshot().await)
}

#[tauri::command]
pub async fn start_session(
    state: State<'_, AppState>,
    mode: Mode,
    duration_minutes: f64,
) -> Result<SessionSnapshot, String> {
    let minutes = presets::normalize_custom_minutes(duration_minutes)
        .ok_or_else(|| "duration must be a positive number of minutes".to_string())?;
    state
        .session
        .start_session(mode, minutes)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pause_session(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    Ok(state.session.pause_session().await)
}

#[tauri::command]
pub async fn resume_session(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    Ok(state.session.resume_session().await)
}

#[tauri::command]
pub async fn restart_session(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    Ok(state.session.restart_session().await)
}

#[tauri::command]
pub fn get_ring_geometry() -> RingGeometry {
    progress::ring_geometry()
}
