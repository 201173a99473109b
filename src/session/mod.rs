pub mod commands;
pub mod controller;
pub mod presets;
pub mod progress;
pub mod state;

pub use controller::SessionController;
pub use state::{Mode, SessionSnapshot};
