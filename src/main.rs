use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use perch::app::App;
use perch::autostart::{AutostartProvider, FileAutostart};
use perch::domain::Document;
use perch::instance::{InstanceLock, LockError};
use perch::persistence::{self, load_settings, save_settings, Settings, Store};
use perch::visibility::{Placement, Rect, WidgetSurface};
use perch::{hotkey, logging, notifications, ticker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

/// Set from the OS signal/ctrl handlers; the main loop polls it every tick
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

#[derive(Parser)]
#[command(name = "perch")]
#[command(about = "An always-at-hand task list and notes widget that perches at the edge of your screen", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Query or change the launch-at-login registration
    Autostart {
        /// Register perch to start at login
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Remove the launch-at-login registration
        #[arg(long)]
        disable: bool,
    },
    /// Print the storage locations perch uses
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Autostart { enable, disable }) => {
            let provider = FileAutostart::new()?;
            if enable {
                provider.set_enabled(true)?;
                println!("Autostart enabled: {}", provider.entry_path().display());
            } else if disable {
                provider.set_enabled(false)?;
                println!("Autostart disabled.");
            } else if provider.is_enabled()? {
                println!("Autostart is enabled: {}", provider.entry_path().display());
            } else {
                println!("Autostart is disabled.");
            }
            Ok(())
        }
        Some(Commands::Paths) => {
            println!("tasks:    {}", persistence::tasks_file()?.display());
            println!("notes:    {}", persistence::notes_file()?.display());
            println!("settings: {}", persistence::settings_file()?.display());
            println!("logs:     {}", persistence::log_dir()?.display());
            Ok(())
        }
        None => run_widget(),
    }
}

fn run_widget() -> Result<()> {
    persistence::ensure_data_dir()?;

    // The single-instance guard comes before anything else: a second launch
    // must leave the running instance, its hook and its files untouched.
    let _lock = match InstanceLock::acquire(&persistence::lock_file()?) {
        Ok(lock) => lock,
        Err(LockError::AlreadyRunning { .. }) => {
            println!("Perch is already running.");
            notifications::notify_already_running();
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let settings_path = persistence::settings_file()?;
    let settings = load_settings(&settings_path).unwrap_or_else(|err| {
        eprintln!("Warning: could not read settings ({err}); using defaults");
        Settings::default()
    });

    logging::init(&settings.log_level, &persistence::log_dir()?)?;

    // Materialize the defaults on first run so users have a file to edit
    if !settings_path.exists() {
        if let Err(err) = save_settings(&settings_path, &settings) {
            warn!("could not write default settings: {err}");
        }
    }

    // Load the document, falling back to an empty state on anything broken:
    // a corrupt file must never keep the widget from starting.
    let store = Store::new(persistence::tasks_file()?, persistence::notes_file()?);
    let tasks = match store.load_tasks() {
        Ok(tasks) => tasks,
        Err(err) => {
            error!("falling back to empty task list: {err}");
            notifications::notify_storage_error(&err.to_string());
            Vec::new()
        }
    };
    let notes = match store.load_notes() {
        Ok(notes) => notes,
        Err(err) => {
            error!("falling back to empty notes: {err}");
            notifications::notify_storage_error(&err.to_string());
            String::new()
        }
    };

    let mut app = App::new(Document::new(tasks, notes), store, &settings);
    info!(
        "document loaded: {} tasks ({} completed)",
        app.count_total(),
        app.count_completed()
    );

    // Keep a sender alive in main so the channel never disconnects even when
    // the hook cannot be installed.
    let (toggle_tx, toggle_rx) = mpsc::channel();
    let listener = match hotkey::install(toggle_tx.clone()) {
        Ok(listener) => {
            info!("global hotkey installed: right-Shift + right-Control");
            Some(listener)
        }
        Err(err) => {
            warn!("global hotkey unavailable: {err}");
            notifications::notify_hotkey_unavailable(&err.to_string());
            None
        }
    };

    install_shutdown_handlers();

    let mut surface = HeadlessSurface::default();
    let tick = ticker::tick_duration();

    while !SHUTDOWN.load(Ordering::SeqCst) {
        match toggle_rx.recv_timeout(tick) {
            Ok(hotkey::ToggleRequest) => app.toggle_visibility(&mut surface, Instant::now()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        app.on_tick(&mut surface, Instant::now());
    }

    // Shutdown is one linear sequence: stop the listener so no further
    // toggles arrive, persist synchronously, then release logging.
    info!("shutting down");
    if let Some(listener) = listener {
        listener.shutdown();
    }
    app.flush_now();
    logging::shutdown();

    Ok(())
}

#[cfg(unix)]
fn install_shutdown_handlers() {
    extern "C" fn handle_signal(_signal: libc::c_int) {
        SHUTDOWN.store(true, Ordering::SeqCst);
    }

    unsafe {
        libc::signal(
            libc::SIGINT,
            handle_signal as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
        libc::signal(
            libc::SIGTERM,
            handle_signal as extern "C" fn(libc::c_int) as libc::sighandler_t,
        );
    }
}

#[cfg(windows)]
fn install_shutdown_handlers() {
    use windows::Win32::Foundation::BOOL;
    use windows::Win32::System::Console::SetConsoleCtrlHandler;

    unsafe extern "system" fn ctrl_handler(_ctrl_type: u32) -> BOOL {
        SHUTDOWN.store(true, Ordering::SeqCst);
        BOOL(1)
    }

    unsafe {
        let _ = SetConsoleCtrlHandler(Some(ctrl_handler), true);
    }
}

#[cfg(not(any(unix, windows)))]
fn install_shutdown_handlers() {}

/// Surface for the bundled host: a real shell animates these commands; this
/// one records them to the log and assumes a common work area, since the
/// live display metrics belong to the view collaborator.
struct HeadlessSurface {
    work_area: Rect,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self {
            work_area: Rect {
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
            },
        }
    }
}

impl WidgetSurface for HeadlessSurface {
    fn work_area(&self) -> Rect {
        self.work_area
    }

    fn apply_placement(&mut self, placement: Placement) {
        debug!(
            "surface: place at ({}, {}) size {}x{}",
            placement.x, placement.y, placement.width, placement.height
        );
    }

    fn begin_show(&mut self) {
        debug!("surface: enter transition started");
    }

    fn begin_hide(&mut self) {
        debug!("surface: exit transition started");
    }

    fn set_hidden(&mut self) {
        debug!("surface: hidden");
    }

    fn focus_entry(&mut self) {
        debug!("surface: focus entry field");
    }
}
