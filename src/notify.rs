use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use tauri::AppHandle;
use tauri_plugin_notification::{NotificationExt, PermissionState};

use crate::events;

/// Local system notifications. Denied permission is surfaced to the user
/// exactly once; afterwards `show` skips silently so completions never
/// fail on a missing capability.
pub struct Notifier {
    app: AppHandle,
    denial_surfaced: AtomicBool,
}

impl Notifier {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            denial_surfaced: AtomicBool::new(false),
        }
    }

    /// Returns whether notifications may be shown. On the first denial a
    /// `notifications-blocked` event is emitted for the frontend toast.
    pub fn request_permission(&self) -> bool {
        match self.app.notification().request_permission() {
            Ok(PermissionState::Granted) => {
                self.denial_surfaced.store(false, Ordering::SeqCst);
                true
            }
            Ok(_) => {
                if !self.denial_surfaced.swap(true, Ordering::SeqCst) {
                    events::emit_notifications_blocked(&self.app);
                }
                false
            }
            Err(err) => {
                warn!("Notification permission request failed: {err}");
                false
            }
        }
    }

    /// No-op without granted permission.
    pub fn show(&self, title: &str, body: &str) {
        match self.app.notification().permission_state() {
            Ok(PermissionState::Granted) => {
                if let Err(err) = self
                    .app
                    .notification()
                    .builder()
                    .title(title)
                    .body(body)
                    .show()
                {
                    warn!("Failed to show notification '{title}': {err}");
                }
            }
            Ok(_) => debug!("Skipping notification '{title}': permission not granted"),
            Err(err) => warn!("Failed to read notification permission: {err}"),
        }
    }
}
