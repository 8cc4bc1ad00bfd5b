//! UI components

pub mod launcher;
pub mod theme;

pub use launcher::{LauncherWidget, SleepScreen};
pub use theme::Theme;
pub use theme::ThemeConfig;
