//! Application state

use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::fs::Layout;
use crate::input::InputState;
use crate::power::{IdleTimer, charge_percent, read_battery};
use crate::ui::Theme;

use super::session::LauncherSession;

/// Everything the control loop owns
pub struct App {
    pub session: LauncherSession,
    pub config: Config,
    pub theme: Theme,
    pub input: InputState,
    pub idle: IdleTimer,
    /// Last battery reading, in percent steps
    pub battery: Option<u8>,
    /// Screen needs a redraw
    pub dirty: bool,
    /// Screen blanked until Menu is pressed
    pub sleeping: bool,
    pub should_quit: bool,
    /// Command queued by a launch; the loop exits once set
    pub launched: Option<String>,
}

impl App {
    pub fn new(config: Config, reports_release: bool) -> Self {
        let layout = config.layout();
        Self::with_layout(config, layout, reports_release)
    }

    pub fn with_layout(config: Config, layout: Layout, reports_release: bool) -> Self {
        let mut session = LauncherSession::new(layout, config.page_size());
        session.restore();

        let theme = config.theme.build_theme();
        let idle = IdleTimer::new(Duration::from_secs(config.general.sleep_delay_secs));

        let mut app = Self {
            session,
            config,
            theme,
            input: InputState::new(reports_release),
            idle,
            battery: None,
            dirty: true,
            sleeping: false,
            should_quit: false,
            launched: None,
        };
        app.refresh_battery();
        app
    }

    /// Re-read the battery; only called when about to redraw
    pub fn refresh_battery(&mut self) {
        let path = &self.config.general.battery_path;
        if path.is_empty() {
            self.battery = None;
            return;
        }
        self.battery = read_battery(Path::new(path)).map(charge_percent);
    }

    pub fn sleep(&mut self) {
        self.sleeping = true;
        self.dirty = true;
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
        self.input.reset();
        self.idle.touch();
        self.dirty = true;
    }
}
