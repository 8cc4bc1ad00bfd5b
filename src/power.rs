//! Battery indicator and idle sleep

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Read the raw battery ADC value. `None` when the file is missing or garbled.
pub fn read_battery(path: &Path) -> Option<u32> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("battery unavailable at {}: {}", path.display(), e);
            return None;
        }
    };
    raw.trim().parse().ok()
}

/// Map a raw ADC reading onto the charge steps shown in the header
pub fn charge_percent(adc: u32) -> u8 {
    match adc {
        0..=40 => 0,
        41..=42 => 20,
        43 => 50,
        44..=45 => 80,
        _ => 100,
    }
}

/// Header glyph for a charge step
pub fn battery_glyph(percent: u8) -> &'static str {
    match percent {
        0 => "[    ]",
        1..=20 => "[|   ]",
        21..=50 => "[||  ]",
        51..=80 => "[||| ]",
        _ => "[||||]",
    }
}

/// Counts down to sleep; any input restarts it
#[derive(Debug)]
pub struct IdleTimer {
    delay: Option<Duration>,
    last_input: Instant,
}

impl IdleTimer {
    /// A zero delay never expires
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: (!delay.is_zero()).then_some(delay),
            last_input: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_input = Instant::now();
    }

    pub fn expired(&self) -> bool {
        self.expired_at(Instant::now())
    }

    fn expired_at(&self, now: Instant) -> bool {
        self.delay
            .is_some_and(|delay| now.saturating_duration_since(self.last_input) >= delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_steps() {
        assert_eq!(charge_percent(0), 0);
        assert_eq!(charge_percent(40), 0);
        assert_eq!(charge_percent(41), 20);
        assert_eq!(charge_percent(43), 50);
        assert_eq!(charge_percent(45), 80);
        assert_eq!(charge_percent(46), 100);
        assert_eq!(charge_percent(120), 100);
    }

    #[test]
    fn test_glyphs_grow_with_charge() {
        assert_eq!(battery_glyph(0), "[    ]");
        assert_eq!(battery_glyph(50), "[||  ]");
        assert_eq!(battery_glyph(100), "[||||]");
    }

    #[test]
    fn test_read_battery() {
        let tmp = tempfile::TempDir::new().unwrap();
        let adc = tmp.path().join("adc");
        fs::write(&adc, "44\n").unwrap();
        assert_eq!(read_battery(&adc), Some(44));

        fs::write(&adc, "n/a").unwrap();
        assert_eq!(read_battery(&adc), None);
        assert_eq!(read_battery(&tmp.path().join("missing")), None);
    }

    #[test]
    fn test_idle_timer() {
        let timer = IdleTimer::new(Duration::from_secs(30));
        let start = timer.last_input;
        assert!(!timer.expired_at(start + Duration::from_secs(29)));
        assert!(timer.expired_at(start + Duration::from_secs(30)));

        let never = IdleTimer::new(Duration::ZERO);
        assert!(!never.expired_at(start + Duration::from_secs(3600)));
    }
}
