use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::session::state::Mode;

pub const TONE_MIN: u8 = 1;
pub const TONE_MAX: u8 = 5;

/// User preferences read by the session side-effect dispatch. The timer
/// itself never touches these; it only reports completions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub sound_enabled: bool,
    pub tone: u8,
    pub vibration_enabled: bool,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            tone: TONE_MIN,
            vibration_enabled: false,
            notifications_enabled: false,
            dark_mode: false,
        }
    }
}

/// Theming tag persisted when a mode picker starts a session, so a reload
/// comes back in the same color scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeTag {
    Focus,
    Short,
    Long,
}

impl From<Mode> for ModeTag {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Focus => ModeTag::Focus,
            Mode::ShortBreak => ModeTag::Short,
            Mode::LongBreak => ModeTag::Long,
        }
    }
}

/// The two webview mini-games; the backend only keeps their best scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MiniGame {
    ReactionBlaster,
    CyberDodge,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameScores {
    pub reaction_blaster: u32,
    pub cyber_dodge: u32,
}

impl GameScores {
    fn get(&self, game: MiniGame) -> u32 {
        match game {
            MiniGame::ReactionBlaster => self.reaction_blaster,
            MiniGame::CyberDodge => self.cyber_dodge,
        }
    }

    fn slot(&mut self, game: MiniGame) -> &mut u32 {
        match game {
            MiniGame::ReactionBlaster => &mut self.reaction_blaster,
            MiniGame::CyberDodge => &mut self.cyber_dodge,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    preferences: Preferences,
    mode_type: Option<ModeTag>,
    best_scores: GameScores,
    install_prompt_dismissed: bool,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn preferences(&self) -> Preferences {
        self.data.read().unwrap().preferences.clone()
    }

    pub fn update_preferences(&self, mut preferences: Preferences) -> Result<Preferences> {
        if !(TONE_MIN..=TONE_MAX).contains(&preferences.tone) {
            warn!(
                "Tone {} out of range, clamping to {}..={}",
                preferences.tone, TONE_MIN, TONE_MAX
            );
            preferences.tone = preferences.tone.clamp(TONE_MIN, TONE_MAX);
        }
        let mut guard = self.data.write().unwrap();
        guard.preferences = preferences.clone();
        self.persist(&guard)?;
        Ok(preferences)
    }

    pub fn mode_tag(&self) -> Option<ModeTag> {
        self.data.read().unwrap().mode_type
    }

    pub fn set_mode_tag(&self, tag: ModeTag) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.mode_type = Some(tag);
        self.persist(&guard)
    }

    pub fn best_score(&self, game: MiniGame) -> u32 {
        self.data.read().unwrap().best_scores.get(game)
    }

    /// Stores the score only when it beats the recorded best; returns the
    /// best after the update either way.
    pub fn record_best_score(&self, game: MiniGame, score: u32) -> Result<u32> {
        let mut guard = self.data.write().unwrap();
        let slot = guard.best_scores.slot(game);
        if score > *slot {
            *slot = score;
            self.persist(&guard)?;
        }
        Ok(guard.best_scores.get(game))
    }

    pub fn install_prompt_dismissed(&self) -> bool {
        self.data.read().unwrap().install_prompt_dismissed
    }

    pub fn dismiss_install_prompt(&self) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.install_prompt_dismissed = true;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SettingsStore {
    #[allow(dead_code)]
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MiniGame, ModeTag, Preferences, SettingsStore};
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json")).expect("create store")
    }

    #[test]
    fn defaults_apply_when_no_file_exists() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        let prefs = store.preferences();
        assert!(prefs.sound_enabled);
        assert_eq!(prefs.tone, 1);
        assert!(!prefs.vibration_enabled);
        assert!(!prefs.notifications_enabled);
        assert!(!prefs.dark_mode);
        assert_eq!(store.mode_tag(), None);
        assert!(!store.install_prompt_dismissed());
    }

    #[test]
    fn preferences_survive_a_reload_from_disk() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .update_preferences(Preferences {
                sound_enabled: false,
                tone: 4,
                vibration_enabled: true,
                notifications_enabled: true,
                dark_mode: true,
            })
            .expect("update");
        store.set_mode_tag(ModeTag::Short).expect("mode tag");

        let reopened = store_in(&dir);
        let prefs = reopened.preferences();
        assert!(!prefs.sound_enabled);
        assert_eq!(prefs.tone, 4);
        assert!(prefs.vibration_enabled);
        assert_eq!(reopened.mode_tag(), Some(ModeTag::Short));
    }

    #[test]
    fn out_of_range_tone_is_clamped() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        let stored = store
            .update_preferences(Preferences {
                tone: 9,
                ..Preferences::default()
            })
            .expect("update");
        assert_eq!(stored.tone, 5);

        let stored = store
            .update_preferences(Preferences {
                tone: 0,
                ..Preferences::default()
            })
            .expect("update");
        assert_eq!(stored.tone, 1);
    }

    #[test]
    fn best_scores_only_move_upward() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert_eq!(store.best_score(MiniGame::ReactionBlaster), 0);

        assert_eq!(
            store
                .record_best_score(MiniGame::ReactionBlaster, 120)
                .expect("record"),
            120
        );
        assert_eq!(
            store
                .record_best_score(MiniGame::ReactionBlaster, 80)
                .expect("record"),
            120
        );
        // The other game's slot is untouched.
        assert_eq!(store.best_score(MiniGame::CyberDodge), 0);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").expect("write garbage");
        let store = SettingsStore::new(path).expect("create store");
        assert!(store.preferences().sound_enabled);
    }

    #[test]
    fn install_prompt_dismissal_persists() {
        let dir = tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.dismiss_install_prompt().expect("dismiss");
        assert!(store_in(&dir).install_prompt_dismissed());
    }
}
