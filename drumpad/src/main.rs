use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use drumpad::audio::{AudioBackend, AudioSession, CpalBackend, SoundRegistry};
use drumpad::middle::Middle;
use drumpad::pipeline::persistence::{self, Settings};
use drumpad::pipeline::preload::preload;
use drumpad::pipeline::store::DrumStore;
use drumpad::shared::{InputEvent, PadAction};
use drumpad::tui;

#[derive(Parser)]
#[clap(author, version, about = "A drum pad for the terminal.")]
struct Cli {
    /// Directory holding assets/sounds/ and .drumpad/. Defaults to the current directory.
    asset_dir: Option<PathBuf>,
    /// Where to write logs. Defaults to <ASSET_DIR>/.drumpad/drumpad.log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let asset_dir = cli
        .asset_dir
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let log_file = cli
        .log_file
        .unwrap_or_else(|| persistence::default_log_path(&asset_dir));
    let log_error = init_logging(&log_file);

    let settings = persistence::load_settings(&asset_dir).unwrap_or_else(|| {
        let settings = Settings::default();
        // write the defaults out once so there is a file to edit
        if !persistence::has_settings(&asset_dir) {
            if let Err(e) = persistence::save_settings(&asset_dir, &settings) {
                warn!(error = %e, "could not save default settings");
            }
        }
        settings
    });

    // one thread, cooperative: the UI loop and every load share it
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = LocalSet::new().block_on(&runtime, app(asset_dir, settings));

    // the terminal is ours again, so this is the first chance to say it
    if let Some(e) = log_error {
        eprintln!("Warning: logging was off, could not open {}: {}", log_file.display(), e);
    }
    result
}

// The terminal belongs to the UI, so logs go to a file. If the file can't be
// opened the app still runs, just without logs; the error is handed back.
fn init_logging(path: &Path) -> Option<std::io::Error> {
    let (writer, error) = match open_log(path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(e) => (BoxMakeWriter::new(std::io::sink), Some(e)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    error
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

async fn app(asset_dir: PathBuf, settings: Settings) -> anyhow::Result<()> {
    info!(asset_dir = %asset_dir.display(), "starting");
    let backend = CpalBackend::start(asset_dir)?;
    let registry = Rc::new(SoundRegistry::new(backend));
    let session = AudioSession::open(registry.clone(), &settings.audio_mode).await;

    let mut middle = Middle::new(DrumStore::default());
    if let Some(pads) = middle.activate() {
        let registry = registry.clone();
        let progress = middle.progress();
        tokio::task::spawn_local(async move {
            preload(&registry, &pads, &progress).await;
        });
    }

    let result = ui_loop(&mut middle, session.registry(), settings.frame()).await;
    session.shutdown().await;
    result
}

async fn ui_loop<B: AudioBackend + 'static>(
    middle: &mut Middle,
    registry: &Rc<SoundRegistry<B>>,
    frame_time: Duration,
) -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let mut tui_state = tui::mode::TuiState::default();
    let mut last_tick = Instant::now();

    loop {
        let ds = middle.display_state();
        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &mut tui_state);
        })?;

        for event in tui::input::poll_input(&tui_state)? {
            if event == InputEvent::Quit {
                return Ok(());
            }
            for action in middle.handle_input(event) {
                // fire and forget; playback controls never report failure
                let registry = registry.clone();
                tokio::task::spawn_local(async move {
                    match action {
                        PadAction::Play(id) => registry.play(&id).await,
                        PadAction::Stop(id) => registry.stop(&id).await,
                        PadAction::SetVolume(id, volume) => registry.set_volume(&id, volume).await,
                    }
                });
            }
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        middle.tick(elapsed);

        // hand the thread to the loads and plays until the next frame
        tokio::time::sleep(frame_time).await;
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture, crossterm::cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}
