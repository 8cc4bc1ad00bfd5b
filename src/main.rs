//! pakman - a launcher for handheld SD cards
//!
//! Browses the card's Roms/Games/Tools tree, remembers recently played
//! titles, resumes where the last session left off, and hands the chosen
//! command to the supervisor through a queue file.

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::panic;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use env_logger::{Env, Target};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

mod config;
mod errors;
mod fs;
mod input;
mod power;
mod state;
mod ui;

use config::Config;
use errors::{AppError, AppResult};
use state::app::App;
use ui::{LauncherWidget, SleepScreen};

#[derive(Parser, Debug)]
#[command(name = "pakman", version, about = "Launcher for handheld SD cards")]
struct Args {
    /// SD card root, overriding [paths] root
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Send log output to a file; the terminal belongs to the UI
fn init_logging(config: &Config) -> AppResult<()> {
    let path = config
        .log_file()
        .ok_or_else(|| AppError::Config("could not determine log file location".into()))?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Set up panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
        original_hook(panic_info);
    }));
}

/// Initialize the terminal for TUI mode. Also reports whether key
/// releases will be delivered.
fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<io::Stdout>>, bool)> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let reports_release = supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }
    log::debug!("key release events: {}", reports_release);

    let backend = CrosstermBackend::new(stdout);
    Ok((Terminal::new(backend)?, reports_release))
}

/// Restore terminal to normal mode
fn restore_terminal(reports_release: bool) -> io::Result<()> {
    if reports_release {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if app.sleeping {
        frame.render_widget(SleepScreen, area);
        return;
    }
    let launcher = LauncherWidget::new(&app.session, &app.theme)
        .with_battery(app.battery)
        .with_counter(app.config.display.show_counter);
    frame.render_widget(launcher, area);
}

/// Main event loop: one input/update/draw pass per frame
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let frame_budget = Duration::from_millis(app.config.general.frame_ms.max(1));

    loop {
        let frame_start = Instant::now();
        app.input.begin_frame(frame_start);

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Resize(..) => app.dirty = true,
                _ => {}
            }
        }
        if app.should_quit {
            break;
        }

        input::update(app);
        if app.launched.is_some() {
            break;
        }

        if app.dirty {
            if !app.sleeping {
                app.refresh_battery();
            }
            terminal.draw(|frame| draw(frame, app))?;
            app.dirty = false;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }

    // One last wipe
    terminal.clear()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let (mut config, load_error) = match Config::load(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(root) = &args.root {
        config.paths.root = root.to_string_lossy().into_owned();
    }
    // Still on the plain terminal, so stderr is visible
    let logging = init_logging(&config);
    if let Err(e) = &logging {
        eprintln!("pakman: logging disabled: {}", e);
    }
    if let Some(e) = load_error {
        if logging.is_ok() {
            log::warn!("{}, using default configuration", e);
        } else {
            eprintln!("pakman: {}, using default configuration", e);
        }
    }
    log::info!("starting at {}", config.paths.root);

    setup_panic_hook();
    let (mut terminal, reports_release) = setup_terminal()?;
    let mut app = App::new(config, reports_release);

    let result = run(&mut terminal, &mut app);
    restore_terminal(reports_release)?;

    if let Some(command) = &app.launched {
        log::info!("exiting to run {}", command);
    }
    result
}
