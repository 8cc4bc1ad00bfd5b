//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::fs::Layout;
use crate::state::directory::DEFAULT_PAGE_SIZE;
use crate::ui::ThemeConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Card layout
    pub paths: PathsConfig,
    /// Display settings
    pub display: DisplayConfig,
    /// General settings
    pub general: GeneralConfig,
    /// Theme settings
    pub theme: ThemeConfig,
    /// Button mapping
    pub keybindings: KeyBindings,
}

/// Where things live. Empty strings fall back to locations under `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// SD card root
    pub root: String,
    /// Last-session file
    pub last_path: String,
    /// Queued launch command
    pub next_command: String,
    /// Recently played list
    pub recents_file: String,
    /// Firmware update archive
    pub update_archive: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: "/mnt/SDCARD".to_string(),
            last_path: String::new(),
            next_command: String::new(),
            recents_file: String::new(),
            update_archive: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per page
    pub page_size: usize,
    /// Show "selected/total" in the header
    pub show_counter: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            show_counter: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Idle seconds before sleeping (0 = never)
    pub sleep_delay_secs: u64,
    /// Frame budget in milliseconds
    pub frame_ms: u64,
    /// Battery ADC file (empty = no battery indicator)
    pub battery_path: String,
    /// Log file (empty = pakman.log in the config directory)
    pub log_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sleep_delay_secs: 30,
            frame_ms: 17,
            battery_path: "/sys/devices/soc/1c23400.battery/adc".to_string(),
            log_file: String::new(),
        }
    }
}

/// Button mapping (button -> key)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyBindings {
    /// Custom keybindings (button -> key)
    #[serde(flatten)]
    pub bindings: HashMap<String, String>,
}

impl KeyBindings {
    /// Get the key bound to a button, falling back to default
    pub fn get(&self, button: &str) -> &str {
        self.bindings
            .get(button)
            .map(|s| s.as_str())
            .unwrap_or_else(|| default_keybinding(button))
    }

    /// Check if a key event matches a button
    pub fn matches(&self, button: &str, key: &crossterm::event::KeyEvent) -> bool {
        use crossterm::event::{KeyCode, KeyModifiers};

        parse_key_binding(self.get(button))
            .map(|(code, mods)| {
                // Shift is implied by upper-case characters
                let pressed = key.modifiers - KeyModifiers::SHIFT;
                if pressed != mods - KeyModifiers::SHIFT {
                    return false;
                }
                match (&key.code, &code) {
                    (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(b),
                    _ => key.code == code,
                }
            })
            .unwrap_or(false)
    }
}

/// Get the default key for a button
pub fn default_keybinding(button: &str) -> &'static str {
    match button {
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        "a" => "Space",
        "b" => "Backspace",
        "x" => "x",
        "y" => "y",
        "start" => "Enter",
        "select" => "Tab",
        "l" => "PageUp",
        "r" => "PageDown",
        "menu" => "Esc",
        "quit" => "q",
        _ => "",
    }
}

/// Parse a key binding string like "Ctrl+C", "Alt+F1", "F10", etc.
pub fn parse_key_binding(
    s: &str,
) -> Option<(crossterm::event::KeyCode, crossterm::event::KeyModifiers)> {
    use crossterm::event::KeyModifiers;

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // A lone "+" is the plus key, not a modifier separator
    if s == "+" {
        return Some((crossterm::event::KeyCode::Char('+'), KeyModifiers::NONE));
    }

    let mut modifiers = KeyModifiers::NONE;
    let mut parts: Vec<&str> = s.split('+').collect();

    while parts.len() > 1 {
        let modifier = parts.remove(0).to_lowercase();
        match modifier.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ => return None,
        }
    }

    let code = parse_key_code(parts[0])?;
    Some((code, modifiers))
}

/// Parse a key code string
fn parse_key_code(s: &str) -> Option<crossterm::event::KeyCode> {
    use crossterm::event::KeyCode;

    let s_lower = s.to_lowercase();

    // Function keys
    if s_lower.starts_with('f')
        && s_lower.len() >= 2
        && let Ok(n) = s_lower[1..].parse::<u8>()
        && (1..=12).contains(&n)
    {
        return Some(KeyCode::F(n));
    }

    let mut chars = s.chars();
    match s_lower.as_str() {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "backspace" | "bs" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "insert" | "ins" => Some(KeyCode::Insert),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "space" => Some(KeyCode::Char(' ')),
        // Single character
        _ => match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyCode::Char(c)),
            _ => None,
        },
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("PAKMAN_CONFIG_DIR")
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
        .map(|p| p.join("pakman"))
}

/// Get the config file path
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Default config file content with comments
fn default_config() -> String {
    r##"# pakman configuration
# This file is auto-generated. Edit as needed.

[paths]
# SD card root holding Roms/, Emus/, Games/ and Tools/
root = "/mnt/SDCARD"

# Leave empty to use the defaults:
#   last_path      = /tmp/last.txt
#   next_command   = <root>/System.pak/next.sh
#   recents_file   = <root>/recent.txt
#   update_archive = <root>/TrimuiUpdate_MinUI.zip
last_path = ""
next_command = ""
recents_file = ""
update_archive = ""

[display]
# Rows visible at once
page_size = 5

# Show "selected/total" in the header
show_counter = true

[general]
# Idle seconds before the screen sleeps (0 = never)
sleep_delay_secs = 30

# Frame budget in milliseconds
frame_ms = 17

# Battery ADC file (empty = hide the battery indicator)
battery_path = "/sys/devices/soc/1c23400.battery/adc"

# Log file (empty = pakman.log next to this file)
log_file = ""

[theme]
# Preset: "dark" or "classic"
preset = "dark"

# Per-color overrides: named ("white", "dark_gray"), "#RRGGBB" or "rgb(R,G,B)"
# Keys: background, text, highlight_bg, highlight_fg, conflict, header,
#       counter, battery, battery_low, hint_key_bg, hint_key_fg, hint_text
[theme.colors]
# highlight_bg = "#9f8952"

[keybindings]
# Logical buttons of the handheld, mapped to keys
up = "Up"
down = "Down"
left = "Left"
right = "Right"
a = "Space"
b = "Backspace"
x = "x"
y = "y"
start = "Enter"
select = "Tab"
l = "PageUp"
r = "PageDown"
menu = "Esc"
quit = "q"
"##
    .to_string()
}

impl Config {
    /// Load configuration from `path` (or the default location), creating
    /// the default file if it doesn't exist. Runs before logging is set up,
    /// so problems are returned for the caller to report.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => config_file()
                .ok_or_else(|| AppError::Config("could not determine config directory".into()))?,
        };

        if !config_path.exists() {
            if let Some(dir) = config_path.parent() {
                fs::create_dir_all(dir).map_err(|e| {
                    AppError::Config(format!("could not create {}: {}", dir.display(), e))
                })?;
            }
            fs::write(&config_path, default_config()).map_err(|e| {
                AppError::Config(format!("could not create {}: {}", config_path.display(), e))
            })?;
        }

        Self::read(&config_path)
    }

    /// Read and parse a config file
    pub fn read(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> AppResult<Self> {
        Ok(toml_edit::de::from_str(content)?)
    }

    /// Card layout with defaults filled in
    pub fn layout(&self) -> Layout {
        let mut layout = Layout::new(&self.paths.root);
        let overrides = [
            (&self.paths.last_path, &mut layout.last_path),
            (&self.paths.next_command, &mut layout.next_command),
            (&self.paths.recents_file, &mut layout.recents_file),
            (&self.paths.update_archive, &mut layout.update_archive),
        ];
        for (value, slot) in overrides {
            if !value.is_empty() {
                *slot = PathBuf::from(value);
            }
        }
        layout
    }

    pub fn page_size(&self) -> usize {
        self.display.page_size.max(1)
    }

    /// Log file location
    pub fn log_file(&self) -> Option<PathBuf> {
        if !self.general.log_file.is_empty() {
            return Some(PathBuf::from(&self.general.log_file));
        }
        config_dir().map(|p| p.join("pakman.log"))
    }
}
