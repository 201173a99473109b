mod assets;
mod audio;
mod completion;
mod events;
mod notify;
mod session;
mod settings;
mod vibration;

use std::{path::PathBuf, sync::Arc};

use assets::AssetCache;
use audio::SoundPlayerHandle;
use completion::CompletionDispatcher;
use log::warn;
use notify::Notifier;
use session::commands::{
    get_ring_geometry, get_session_state, pause_session, restart_session, resume_session,
    start_session,
};
use session::presets::{self, DurationPreset};
use session::{Mode, SessionController};
use settings::{MiniGame, ModeTag, Preferences, SettingsStore, TONE_MAX, TONE_MIN};
use tauri::{Manager, State};
use vibration::VibrationPattern;

pub(crate) struct AppState {
    pub(crate) session: SessionController,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) sound: SoundPlayerHandle,
    pub(crate) assets: Arc<AssetCache>,
    pub(crate) notifier: Arc<Notifier>,
}

#[tauri::command]
fn get_preferences(state: State<AppState>) -> Result<Preferences, String> {
    Ok(state.settings.preferences())
}

#[tauri::command]
fn update_preferences(
    preferences: Preferences,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<Preferences, String> {
    let stored = state
        .settings
        .update_preferences(preferences)
        .map_err(|e| e.to_string())?;
    events::emit_preferences_updated(&app_handle, &stored);
    Ok(stored)
}

#[tauri::command]
fn get_mode_tag(state: State<AppState>) -> Result<Option<ModeTag>, String> {
    Ok(state.settings.mode_tag())
}

#[tauri::command]
fn get_duration_presets(mode: Mode) -> Vec<DurationPreset> {
    presets::presets_for(mode).to_vec()
}

#[tauri::command]
fn preview_tone(tone: u8, state: State<AppState>) -> Result<(), String> {
    let tone = tone.clamp(TONE_MIN, TONE_MAX);
    let asset = state.assets.fetch(&assets::tone_asset_name(tone));
    state.sound.play_tone(tone, asset)
}

#[tauri::command]
fn stop_sounds(state: State<AppState>) -> Result<(), String> {
    state.sound.stop_all()
}

#[tauri::command]
fn sound_playing(state: State<AppState>) -> Result<bool, String> {
    Ok(state.sound.is_any_playing())
}

#[tauri::command]
fn request_notification_permission(state: State<AppState>) -> Result<bool, String> {
    Ok(state.notifier.request_permission())
}

#[tauri::command]
fn vibration_supported() -> bool {
    vibration::supported()
}

#[tauri::command]
fn vibrate_device(pattern: Option<VibrationPattern>) -> Result<(), String> {
    vibration::vibrate(&pattern.unwrap_or_default());
    Ok(())
}

#[tauri::command]
fn get_best_score(game: MiniGame, state: State<AppState>) -> Result<u32, String> {
    Ok(state.settings.best_score(game))
}

#[tauri::command]
fn record_best_score(game: MiniGame, score: u32, state: State<AppState>) -> Result<u32, String> {
    state
        .settings
        .record_best_score(game, score)
        .map_err(|e| e.to_string())
}

/// Resolve a shell asset for the webview, cache-first. Unknown paths fall
/// back to the entry page the way an offline navigation would.
#[tauri::command]
fn get_shell_asset(name: String, state: State<AppState>) -> Result<Option<PathBuf>, String> {
    Ok(state.assets.fetch_or_entry(&name))
}

#[tauri::command]
fn should_show_install_prompt(state: State<AppState>) -> Result<bool, String> {
    Ok(!state.settings.install_prompt_dismissed())
}

#[tauri::command]
fn dismiss_install_prompt(state: State<AppState>) -> Result<(), String> {
    state
        .settings
        .dismiss_install_prompt()
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("FocusDial starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_notification::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings = Arc::new(SettingsStore::new(settings_path)?);

                let resource_dir = app
                    .path()
                    .resource_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                let assets = Arc::new(AssetCache::new(
                    resource_dir.join("public"),
                    app_data_dir.join("cache"),
                ));
                // The app stays usable when the shell cache cannot be built.
                if let Err(err) = assets.activate() {
                    warn!("Shell asset cache activation failed: {err:#}");
                }

                let sound = SoundPlayerHandle::new();
                let notifier = Arc::new(Notifier::new(app.handle().clone()));
                let dispatcher = Arc::new(CompletionDispatcher::new(
                    sound.clone(),
                    Arc::clone(&notifier),
                    Arc::clone(&assets),
                ));
                let session = SessionController::new(
                    app.handle().clone(),
                    Arc::clone(&settings),
                    sound.clone(),
                    dispatcher,
                );

                app.manage(AppState {
                    session,
                    settings,
                    sound,
                    assets,
                    notifier,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_session_state,
            start_session,
            pause_session,
            resume_session,
            restart_session,
            get_ring_geometry,
            get_duration_presets,
            get_preferences,
            update_preferences,
            get_mode_tag,
            preview_tone,
            stop_sounds,
            sound_playing,
            request_notification_permission,
            vibration_supported,
            vibrate_device,
            get_shell_asset,
            get_best_score,
            record_best_score,
            should_show_install_prompt,
            dismiss_install_prompt,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
