//! Color theme system
//!
//! Built-in presets plus per-color overrides from the `[theme]` section.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Colors used by the launcher screen
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,

    // Rows
    pub text: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    /// Full file name drawn under a conflicting display name
    pub conflict: Color,

    // Header
    pub header: Color,
    pub counter: Color,
    pub battery: Color,
    pub battery_low: Color,

    // Button hints
    pub hint_key_bg: Color,
    pub hint_key_fg: Color,
    pub hint_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default), gold highlight on black
    pub fn dark() -> Self {
        let gold = Color::Rgb(159, 137, 82);
        let pale_gold = Color::Rgb(210, 180, 108);
        let dim = Color::Rgb(102, 102, 102);

        Self {
            background: Color::Black,

            text: Color::White,
            highlight_bg: gold,
            highlight_fg: Color::White,
            conflict: dim,

            header: pale_gold,
            counter: pale_gold,
            battery: Color::White,
            battery_low: Color::Rgb(200, 60, 60),

            hint_key_bg: Color::White,
            hint_key_fg: Color::Black,
            hint_text: Color::White,
        }
    }

    /// Terminal palette only, for consoles without truecolor
    pub fn classic() -> Self {
        Self {
            background: Color::Reset,

            text: Color::Gray,
            highlight_bg: Color::Yellow,
            highlight_fg: Color::Black,
            conflict: Color::DarkGray,

            header: Color::Yellow,
            counter: Color::Yellow,
            battery: Color::Gray,
            battery_low: Color::Red,

            hint_key_bg: Color::Gray,
            hint_key_fg: Color::Black,
            hint_text: Color::Gray,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "classic" => Some(Self::classic()),
            _ => None,
        }
    }

    /// Apply color overrides (key -> color string). Unknown keys and
    /// unparsable colors are ignored.
    pub fn with_overrides(mut self, colors: &HashMap<String, String>) -> Self {
        for (key, value) in colors {
            let Some(color) = parse_color(value) else {
                log::warn!("theme: invalid color {:?} for {}", value, key);
                continue;
            };
            match key.as_str() {
                "background" => self.background = color,
                "text" => self.text = color,
                "highlight_bg" => self.highlight_bg = color,
                "highlight_fg" => self.highlight_fg = color,
                "conflict" => self.conflict = color,
                "header" => self.header = color,
                "counter" => self.counter = color,
                "battery" => self.battery = color,
                "battery_low" => self.battery_low = color,
                "hint_key_bg" => self.hint_key_bg = color,
                "hint_key_fg" => self.hint_key_fg = color,
                "hint_text" => self.hint_text = color,
                _ => log::debug!("theme: unknown color key {}", key),
            }
        }
        self
    }
}

/// Theme configuration for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Preset name: "dark" or "classic"
    pub preset: String,
    /// Color overrides on top of the preset
    pub colors: HashMap<String, String>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preset: "dark".to_string(),
            colors: HashMap::new(),
        }
    }
}

impl ThemeConfig {
    /// Build a Theme from this config
    pub fn build_theme(&self) -> Theme {
        let base = Theme::by_name(&self.preset).unwrap_or_else(|| {
            log::warn!("theme: unknown preset {:?}, using dark", self.preset);
            Theme::default()
        });
        base.with_overrides(&self.colors)
    }
}

/// Parse a color string into a ratatui Color
///
/// Supports:
/// - Named colors: "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white", "gray"
/// - Light variants: "light_red", "light_green", etc.
/// - RGB hex: "#RRGGBB" or "RRGGBB"
/// - RGB decimal: "rgb(R,G,B)"
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    let named = match s.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "reset" => Some(Color::Reset),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let hex = s.strip_prefix('#').unwrap_or(&s);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    if let Some(inner) = s.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if let [r, g, b] = parts.as_slice() {
            return Some(Color::Rgb(
                r.trim().parse().ok()?,
                g.trim().parse().ok()?,
                b.trim().parse().ok()?,
            ));
        }
    }

    None
}
