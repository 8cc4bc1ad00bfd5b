//! Launcher screen: header, the visible window of the top directory, and
//! button hints

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::power::battery_glyph;
use crate::state::directory::Directory;
use crate::state::session::LauncherSession;

use super::Theme;

/// Left/right margin of list rows
const ROW_MARGIN: u16 = 2;

/// Header line at the top, hint line at the bottom
const CHROME_HEIGHT: u16 = 2;

pub struct LauncherWidget<'a> {
    session: &'a LauncherSession,
    theme: &'a Theme,
    battery: Option<u8>,
    show_counter: bool,
}

impl<'a> LauncherWidget<'a> {
    pub fn new(session: &'a LauncherSession, theme: &'a Theme) -> Self {
        Self {
            session,
            theme,
            battery: None,
            show_counter: true,
        }
    }

    pub fn with_battery(mut self, battery: Option<u8>) -> Self {
        self.battery = battery;
        self
    }

    pub fn with_counter(mut self, show: bool) -> Self {
        self.show_counter = show;
        self
    }

    /// Name of the open directory, or the program name at the root
    fn title(dir: &Directory, depth: usize) -> String {
        if depth <= 1 {
            return "pakman".to_string();
        }
        dir.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let top = self.session.top();
        let header = Style::default()
            .fg(self.theme.header)
            .bg(self.theme.background)
            .add_modifier(Modifier::BOLD);
        buf.set_string(
            area.x + ROW_MARGIN,
            area.y,
            truncate(&Self::title(top, self.session.stack().depth()), area.width as usize / 2),
            header,
        );

        let mut right = String::new();
        if self.show_counter && !top.is_empty() {
            right.push_str(&format!("{}/{}", top.selected() + 1, top.len()));
        }
        let mut x = area.x + area.width.saturating_sub(ROW_MARGIN);
        if let Some(percent) = self.battery {
            let glyph = battery_glyph(percent);
            let color = if percent <= 20 {
                self.theme.battery_low
            } else {
                self.theme.battery
            };
            x = x.saturating_sub(glyph.chars().count() as u16);
            buf.set_string(x, area.y, glyph, Style::default().fg(color).bg(self.theme.background));
            x = x.saturating_sub(1);
        }
        if !right.is_empty() {
            x = x.saturating_sub(right.chars().count() as u16);
            let style = Style::default().fg(self.theme.counter).bg(self.theme.background);
            buf.set_string(x, area.y, &right, style);
        }
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        let top = self.session.top();
        let width = area.width.saturating_sub(ROW_MARGIN * 2) as usize;
        let normal = Style::default().fg(self.theme.text).bg(self.theme.background);
        let dim = Style::default().fg(self.theme.conflict).bg(self.theme.background);
        let highlight = Style::default()
            .fg(self.theme.highlight_fg)
            .bg(self.theme.highlight_bg)
            .add_modifier(Modifier::BOLD);

        for (row, (index, entry)) in top.window().zip(top.visible()).enumerate() {
            if row as u16 >= area.height {
                break;
            }
            let y = area.y + row as u16;
            let x = area.x + ROW_MARGIN;

            if index == top.selected() {
                // Highlight bar spans the full row
                for bx in area.x..area.x + area.width {
                    buf[(bx, y)].set_char(' ').set_style(highlight);
                }
                let name = if entry.name_conflict() {
                    entry.file_name()
                } else {
                    entry.name().to_string()
                };
                buf.set_string(x, y, truncate(&name, width), highlight);
            } else {
                // Conflicting names show the rest of their file name dimmed
                if entry.name_conflict() {
                    buf.set_string(x, y, truncate(&entry.file_name(), width), dim);
                }
                buf.set_string(x, y, truncate(entry.name(), width), normal);
            }
        }
    }

    fn render_hints(&self, area: Rect, buf: &mut Buffer) {
        let top = self.session.top();
        if top.is_empty() {
            return;
        }
        let key = Style::default()
            .fg(self.theme.hint_key_fg)
            .bg(self.theme.hint_key_bg)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(self.theme.hint_text).bg(self.theme.background);

        let browse = Line::from(vec![
            Span::styled(" \u{2195} ", key),
            Span::styled(" BROWSE", text),
        ]);
        buf.set_line(area.x + ROW_MARGIN, area.y, &browse, area.width);

        let mut spans = Vec::new();
        if self.session.stack().can_ascend() {
            spans.push(Span::styled(" B ", key));
            spans.push(Span::styled(" BACK  ", text));
        }
        spans.push(Span::styled(" A ", key));
        spans.push(Span::styled(" OPEN", text));
        let actions = Line::from(spans);
        let x = (area.x + area.width)
            .saturating_sub(ROW_MARGIN)
            .saturating_sub(actions.width() as u16);
        buf.set_line(x.max(area.x), area.y, &actions, area.width);
    }
}

impl Widget for LauncherWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = Style::default().bg(self.theme.background);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(bg);
            }
        }
        if area.height <= CHROME_HEIGHT || area.width <= ROW_MARGIN * 2 {
            return;
        }

        let header = Rect { height: 1, ..area };
        let rows = Rect {
            y: area.y + 1,
            height: area.height - CHROME_HEIGHT,
            ..area
        };
        let hints = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };

        self.render_header(header, buf);
        self.render_rows(rows, buf);
        self.render_hints(hints, buf);
    }
}

/// Blank screen shown while sleeping
pub struct SleepScreen;

impl Widget for SleepScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().bg(Color::Black);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(style);
            }
        }
    }
}

/// Cut to `max` characters
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::Layout;
    use crate::fs::layout::LAUNCH_SCRIPT;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    fn session(files: &[&str]) -> (TempDir, LauncherSession) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("Emus/GB.pak").join(LAUNCH_SCRIPT));
        for f in files {
            touch(&root.join("Roms/GB").join(f));
        }
        let mut layout = Layout::new(root);
        layout.last_path = root.join("last.txt");
        (tmp, LauncherSession::new(layout, 5))
    }

    fn render(session: &LauncherSession, battery: Option<u8>) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 7);
        let mut buf = Buffer::empty(area);
        LauncherWidget::new(session, &theme)
            .with_battery(battery)
            .render(area, &mut buf);
        buf
    }

    #[test]
    fn test_root_has_no_back_hint() {
        let (_tmp, session) = session(&["Tetris.gb"]);
        let buf = render(&session, Some(100));

        let header = row_text(&buf, 0);
        assert!(header.contains("pakman"));
        assert!(header.contains("1/1"));
        assert!(header.contains("[||||]"));
        assert!(row_text(&buf, 1).contains("GB"));

        let hints = row_text(&buf, 6);
        assert!(hints.contains("OPEN"));
        assert!(hints.contains("BROWSE"));
        assert!(!hints.contains("BACK"));
    }

    #[test]
    fn test_conflicts_show_full_names() {
        let (_tmp, mut session) = session(&["Tetris (USA).gb", "Tetris (Europe).gb", "Zelda.gb"]);
        session.descend(0);
        let buf = render(&session, None);

        let header = row_text(&buf, 0);
        assert!(header.contains("GB"));
        assert!(header.contains("1/3"));
        assert!(!header.contains('['));

        // Both conflicting rows show their full file name, selected or not
        for y in [1, 2] {
            let row = row_text(&buf, y);
            assert!(row.contains("Tetris (") && row.contains(").gb"), "{row}");
        }
        assert!(row_text(&buf, 3).contains("Zelda"));
        assert!(!row_text(&buf, 3).contains(".gb"));

        assert!(row_text(&buf, 6).contains("BACK"));
    }

    #[test]
    fn test_empty_directory_has_no_hints() {
        let tmp = TempDir::new().unwrap();
        let mut layout = Layout::new(tmp.path());
        layout.last_path = tmp.path().join("last.txt");
        let session = LauncherSession::new(layout, 5);
        let buf = render(&session, None);

        assert!(!row_text(&buf, 0).contains('/'));
        assert!(row_text(&buf, 6).trim().is_empty());
    }
}
