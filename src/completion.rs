//! Side effects for session boundaries. The timer reports "completed in
//! mode X" and nothing else; everything the user hears, feels, or sees
//! because of it is decided and executed here.

use log::warn;
use std::sync::Arc;

use crate::assets::{self, AssetCache};
use crate::audio::SoundPlayerHandle;
use crate::notify::Notifier;
use crate::session::state::Mode;
use crate::settings::Preferences;
use crate::vibration::{self, VibrationPattern};

/// Completion buzz length in milliseconds.
pub const COMPLETION_VIBRATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub body: &'static str,
}

pub fn start_notice(mode: Mode) -> Notice {
    let body = match mode {
        Mode::Focus => "Focus mode started — lock in!",
        Mode::ShortBreak => "Quick break — stretch it out.",
        Mode::LongBreak => "Long break — relax & recharge.",
    };
    Notice {
        title: mode.title(),
        body,
    }
}

pub fn completion_notice(mode: Mode) -> Notice {
    let body = match mode {
        Mode::Focus => "Focus session complete! Time for a breather.",
        Mode::ShortBreak => "Short break over, let's get back in!",
        Mode::LongBreak => "Long break done. Ready to crush it?",
    };
    Notice {
        title: mode.title(),
        body,
    }
}

/// Everything a completion should trigger, derived purely from the mode
/// and the user's preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPlan {
    pub tone: Option<u8>,
    pub vibration_ms: Option<u64>,
    pub notification: Option<Notice>,
}

pub fn completion_plan(mode: Mode, preferences: &Preferences) -> CompletionPlan {
    CompletionPlan {
        tone: preferences.sound_enabled.then_some(preferences.tone),
        vibration_ms: preferences
            .vibration_enabled
            .then_some(COMPLETION_VIBRATION_MS),
        notification: preferences
            .notifications_enabled
            .then(|| completion_notice(mode)),
    }
}

/// Executes session start/completion plans against the sound, vibration,
/// and notification collaborators. Each effect fails independently; none
/// of them can disturb the countdown.
pub struct CompletionDispatcher {
    sound: SoundPlayerHandle,
    notifier: Arc<Notifier>,
    assets: Arc<AssetCache>,
}

impl CompletionDispatcher {
    pub fn new(sound: SoundPlayerHandle, notifier: Arc<Notifier>, assets: Arc<AssetCache>) -> Self {
        Self {
            sound,
            notifier,
            assets,
        }
    }

    pub fn session_started(&self, mode: Mode, preferences: &Preferences) {
        if preferences.sound_enabled {
            let asset = self.assets.fetch(assets::START_CUE_ASSET);
            if let Err(err) = self.sound.play_start_cue(asset) {
                warn!("Start cue failed: {err}");
            }
        }
        if preferences.notifications_enabled {
            let notice = start_notice(mode);
            self.notifier.show(notice.title, notice.body);
        }
    }

    pub fn session_completed(&self, mode: Mode, preferences: &Preferences) {
        let plan = completion_plan(mode, preferences);
        if let Some(tone) = plan.tone {
            let asset = self.assets.fetch(&assets::tone_asset_name(tone));
            if let Err(err) = self.sound.play_tone(tone, asset) {
                warn!("Completion tone {tone} failed: {err}");
            }
        }
        if let Some(ms) = plan.vibration_ms {
            vibration::vibrate(&VibrationPattern::Duration(ms));
        }
        if let Some(notice) = plan.notification {
            self.notifier.show(notice.title, notice.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{completion_notice, completion_plan, start_notice, COMPLETION_VIBRATION_MS};
    use crate::session::state::Mode;
    use crate::settings::Preferences;

    fn all_on() -> Preferences {
        Preferences {
            sound_enabled: true,
            tone: 3,
            vibration_enabled: true,
            notifications_enabled: true,
            dark_mode: false,
        }
    }

    #[test]
    fn plan_honors_every_preference() {
        let plan = completion_plan(Mode::Focus, &all_on());
        assert_eq!(plan.tone, Some(3));
        assert_eq!(plan.vibration_ms, Some(COMPLETION_VIBRATION_MS));
        let notice = plan.notification.expect("notification planned");
        assert_eq!(notice.title, "Focus");
    }

    #[test]
    fn disabled_preferences_plan_nothing() {
        let preferences = Preferences {
            sound_enabled: false,
            vibration_enabled: false,
            notifications_enabled: false,
            ..all_on()
        };
        let plan = completion_plan(Mode::ShortBreak, &preferences);
        assert_eq!(plan.tone, None);
        assert_eq!(plan.vibration_ms, None);
        assert_eq!(plan.notification, None);
    }

    #[test]
    fn notices_carry_mode_specific_copy() {
        assert_eq!(
            completion_notice(Mode::Focus).body,
            "Focus session complete! Time for a breather."
        );
        assert_eq!(
            completion_notice(Mode::ShortBreak).body,
            "Short break over, let's get back in!"
        );
        assert_eq!(
            completion_notice(Mode::LongBreak).body,
            "Long break done. Ready to crush it?"
        );
        assert_eq!(start_notice(Mode::LongBreak).title, "Long Break");
        assert_ne!(
            start_notice(Mode::Focus).body,
            completion_notice(Mode::Focus).body
        );
    }
}
