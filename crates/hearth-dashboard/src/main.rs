#![forbid(unsafe_code)]

//! Binary entry point: terminal lifecycle, the event loop, and wiring.

use std::env;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use hearth_core::event::Event;
use hearth_dashboard::app::Dashboard;
use hearth_dashboard::ui;
use hearth_sortable::{FileStore, shared};

/// Poll cadence; also the resolution of the hold-threshold timer.
const TICK: Duration = Duration::from_millis(50);

/// RAII terminal session: raw mode, alternate screen, and mouse capture on
/// entry; everything restored on drop, including on panic unwind.
struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self { out })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

/// Route tracing to a log file when `HEARTH_LOG` is set; raw-mode stdout is
/// no place for log lines.
fn init_tracing() {
    let Ok(filter) = env::var("HEARTH_LOG") else {
        return;
    };
    match File::create("hearth.log") {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(err) => eprintln!("hearth: cannot open log file: {err}"),
    }
}

fn state_path() -> PathBuf {
    env::var_os("HEARTH_STATE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("hearth-state.json"))
}

fn main() -> io::Result<()> {
    init_tracing();

    let store = shared(FileStore::open(state_path()));
    let mut dashboard = Dashboard::new(store);

    let mut session = TerminalSession::enter()?;
    let result = run(&mut session.out, &mut dashboard);
    drop(session);
    result
}

fn run(out: &mut Stdout, dashboard: &mut Dashboard) -> io::Result<()> {
    loop {
        if event::poll(TICK)? {
            if let Some(ev) = Event::from_crossterm(event::read()?) {
                dashboard.handle(&ev, Instant::now());
            }
        } else {
            dashboard.handle(&Event::Tick, Instant::now());
        }

        if dashboard.should_quit() {
            return Ok(());
        }

        if dashboard.take_dirty() {
            let (width, height) = crossterm::terminal::size()?;
            dashboard.relayout(width, height);
            ui::draw(out, dashboard, width, height)?;
        }
    }
}
