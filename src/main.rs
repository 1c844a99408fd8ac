mod app;
mod config;
mod export;
mod html;
mod l10n;
mod rubric;
mod selection;
mod ui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::Config;
use export::{CsvWriterSerializer, DirectorySaver, ExportPipeline, PathSaver, StdoutSaver};
use l10n::Labels;
use rubric::RubricModel;
use selection::SelectionState;

#[derive(Parser, Debug)]
#[command(name = "rubric")]
#[command(about = "Score a rubric in the terminal and download the responses as CSV")]
#[command(version, subcommand_negates_reqs = true)]
struct Cli {
    /// Rubric definition (JSON)
    #[arg(required = true)]
    rubric: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true, default_value = "~/.config/rubric/config.toml")]
    config: String,

    /// Instance id used in the download file name (default: rubric file name)
    #[arg(long, global = true)]
    id: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the responses CSV without opening the TUI
    Export {
        /// Rubric definition (JSON)
        rubric: PathBuf,

        /// Select a level: ROW_ID=COLUMN_ID (repeatable)
        #[arg(long = "select", value_parser = parse_pair)]
        selections: Vec<(String, String)>,

        /// Evidence for a row: ROW_ID=TEXT (repeatable)
        #[arg(long = "evidence", value_parser = parse_pair)]
        evidence: Vec<(String, String)>,

        /// Output file, or "-" for stdout (default: export directory from config)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {:?}", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Export {
            ref rubric,
            ref selections,
            ref evidence,
            ref output,
        }) => {
            init_logging(false);
            let config = Config::load(&cli.config)?;
            let id = instance_id(cli.id.as_deref(), rubric);
            run_export(&config, rubric, &id, selections, evidence, output.as_deref())
        }
        None => {
            init_logging(true);
            let Some(ref rubric) = cli.rubric else {
                bail!("no rubric file given");
            };
            let config = Config::load(&cli.config)?;
            let model = RubricModel::load(rubric)?;
            let id = instance_id(cli.id.as_deref(), rubric);
            run_tui(App::new(model, config, id))
        }
    }
}

/// TUI mode logs to a file so output doesn't land on the screen;
/// headless mode logs to stderr
fn init_logging(tui: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rubric=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if !tui {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return;
    }

    match open_log_file() {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry.init(),
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("rubric");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("rubric.log"))
        .ok()
}

/// Explicit `--id`, else the rubric file stem
fn instance_id(explicit: Option<&str>, rubric: &Path) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| {
            rubric
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "rubric".to_string())
}

fn run_export(
    config: &Config,
    rubric: &Path,
    id: &str,
    selections: &[(String, String)],
    evidence: &[(String, String)],
    output: Option<&Path>,
) -> Result<()> {
    let model = RubricModel::load(rubric)?;
    if !model.has_grid() {
        bail!("{} has no grid, nothing to export", rubric.display());
    }

    let mut state = SelectionState::new();
    for (row_id, column_id) in selections {
        if model.find_row(row_id).is_none() {
            tracing::warn!("Unknown row id {:?}", row_id);
        }
        if model.find_column(column_id).is_none() {
            tracing::warn!("Unknown column id {:?}", column_id);
        }
        state.select(row_id, column_id);
    }
    for (row_id, text) in evidence {
        state.set_evidence(row_id, text.as_str());
    }

    let labels = Labels::layered([&config.l10n, &model.definition().l10n]);
    let serializer = CsvWriterSerializer::new(config.export.crlf);
    let pipeline = match output {
        Some(path) if path == Path::new("-") => {
            ExportPipeline::new(labels, serializer, StdoutSaver)
        }
        Some(path) => ExportPipeline::new(labels, serializer, PathSaver::new(path)),
        None => ExportPipeline::new(
            labels,
            serializer,
            DirectorySaver::new(config.export.directory.clone()),
        ),
    };

    let saved = pipeline.download(&model, &state, id)?;
    if output != Some(Path::new("-")) {
        eprintln!("Saved {} ({} bytes)", saved.location, saved.bytes);
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                app.click(mouse.column, mouse.row);
            }
            _ => {}
        }
    }
}

/// Apply one key press. Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.is_editing() {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.finish_evidence(),
            KeyCode::Backspace => app.pop_evidence_char(),
            KeyCode::Char('u') if ctrl => app.clear_evidence(),
            KeyCode::Char(c) if !ctrl => app.push_evidence_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Left | KeyCode::Char('h') => app.move_left(),
        KeyCode::Right | KeyCode::Char('l') => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Tab => app.tab_next(),
        KeyCode::BackTab => app.tab_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('e') | KeyCode::Char('i') => app.start_evidence(),
        KeyCode::Char('s') => {
            app.download();
        }
        _ => {}
    }
    false
}
