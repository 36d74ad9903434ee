//! topseries: per-process CPU/MEM history from `top -b` captures.
//!
//! Subcommands:
//!   - consolidate: parse a capture (or reload a saved table) and save the table
//!   - view:        stacked terminal chart with highlighted processes
//!   - extract:     unpack captured `.zip` archives in the input directory
//!   - strip:       drop top's summary blocks from a capture
//!   - filter:      keep only the lines of one process
//!   - ls:          list the input directory

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use topseries::app::App;
use topseries::config::TopSeriesConfig;
use topseries::series::{CombinedTable, Consolidator, FieldSchema, SnapshotParser};
use topseries::store::{self, InputSource, LoadedTables};
use topseries::{input, ui, WriteOutcome};

/// Event poll timeout; the viewer has no background refresh
const POLL_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Seconds between two top rounds (overrides topseriesrc)
    #[arg(short, long, global = true)]
    interval: Option<f64>,

    /// Alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the CPU/MEM tables and save them as a two-level-header CSV
    Consolidate {
        /// Raw `top -b` capture (default: <input_dir>/<raw_file>)
        #[arg(short, long)]
        raw: Option<PathBuf>,
        /// Saved table used when the raw capture is absent
        #[arg(short, long)]
        table: Option<PathBuf>,
        /// Destination CSV; an existing file is never overwritten
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Browse the tables as a stacked chart
    View {
        #[arg(short, long)]
        raw: Option<PathBuf>,
        #[arg(short, long)]
        table: Option<PathBuf>,
        /// Comma-separated display names drawn as their own layers
        #[arg(long, value_delimiter = ',')]
        highlight: Vec<String>,
    },
    /// Extract every not-yet-extracted .zip in a directory
    Extract { dir: Option<PathBuf> },
    /// Copy a capture without summary blocks and blank lines
    Strip { src: PathBuf, dst: PathBuf },
    /// Copy only the lines mentioning one process
    Filter {
        src: PathBuf,
        dst: PathBuf,
        process: String,
    },
    /// List the input directory
    Ls { dir: Option<PathBuf> },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => TopSeriesConfig::load_from(path),
        None => TopSeriesConfig::load(),
    };
    if let Some(interval) = cli.interval {
        cfg.sampling_interval = interval;
    }

    match cli.command {
        Command::Consolidate { raw, table, out } => {
            let loaded = load(&cfg, raw, table)?;
            print_summary(&loaded);
            let combined = CombinedTable::join(&loaded.cpu, &loaded.mem)?;
            let outcome = store::persist(&combined, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            report(outcome);
        }
        Command::View { raw, table, highlight } => {
            let loaded = load(&cfg, raw, table)?;
            if !highlight.is_empty() {
                cfg.highlight = highlight;
            }
            run_viewer(loaded, cfg, cli.config)?;
        }
        Command::Extract { dir } => {
            let dir = dir.unwrap_or_else(|| cfg.input_dir.clone());
            let extracted = store::extract_archives(&dir)
                .with_context(|| format!("extracting archives in {}", dir.display()))?;
            for path in &extracted {
                println!("extracted {}", path.display());
            }
            if extracted.is_empty() {
                println!("nothing to extract in {}", dir.display());
            }
        }
        Command::Strip { src, dst } => {
            report(store::strip_headers(&src, &dst, &cfg.skip_rules())?);
        }
        Command::Filter { src, dst, process } => {
            report(store::filter_process(&src, &dst, &process)?);
        }
        Command::Ls { dir } => {
            let dir = dir.unwrap_or_else(|| cfg.input_dir.clone());
            for path in store::list_files(&dir)? {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

fn load(
    cfg: &TopSeriesConfig,
    raw: Option<PathBuf>,
    table: Option<PathBuf>,
) -> Result<LoadedTables> {
    let raw = raw.unwrap_or_else(|| cfg.raw_path());
    let table = table.unwrap_or_else(|| cfg.table_path());
    let parser = SnapshotParser::new(FieldSchema::top_batch(), cfg.skip_rules());
    let consolidator = Consolidator::new(cfg.sampling_interval)?;
    let loaded = store::load_tables(&raw, &table, &parser, &consolidator)
        .with_context(|| format!("loading {} / {}", raw.display(), table.display()))?;
    info!(source = %loaded.source.path().display(), "tables loaded");
    Ok(loaded)
}

fn print_summary(loaded: &LoadedTables) {
    let kind = match loaded.source {
        InputSource::Raw(_) => "capture",
        InputSource::Table(_) => "saved table",
    };
    println!("{}: {}", kind, loaded.source.path().display());
    println!(
        "rows: {}  cpu columns: {}  mem columns: {}",
        loaded.cpu.rows(),
        loaded.cpu.columns().len(),
        loaded.mem.columns().len()
    );
    if let Some(last) = loaded.cpu.time_axis().last() {
        println!("span: 0s-{}s", last);
    }
    if let (Some(a), Some(b)) = (loaded.banner_clocks.first(), loaded.banner_clocks.last()) {
        println!("clock: {} - {}", a.format("%H:%M:%S"), b.format("%H:%M:%S"));
    }
}

fn report(outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Written(p) => println!("wrote {}", p.display()),
        WriteOutcome::AlreadyExists(p) => {
            println!("{} already exists, left untouched", p.display())
        }
    }
}

fn run_viewer(
    loaded: LoadedTables,
    mut cfg: TopSeriesConfig,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut app = App::new(loaded.cpu, loaded.mem, cfg.sampling_interval);
    app.source_label = loaded.source.path().display().to_string();
    app.banner_clocks = loaded.banner_clocks;
    app.apply_config(&cfg);
    for name in &cfg.highlight {
        if app.cpu.column(name).is_none() && app.mem.column(name).is_none() {
            warn!(name = %name, "highlighted process not present in either table");
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app, &mut cfg, config_path);

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

/// Main viewer loop
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    cfg: &mut TopSeriesConfig,
    config_path: Option<PathBuf>,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.visible_rows = ui::legend_rows(size.height);
        app.ensure_visible();

        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    // Some terminals report Press and Release; only handle Press
                    if key.kind == KeyEventKind::Press {
                        input::handle_input(app, key);
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.select_prev(),
                    MouseEventKind::ScrollDown => app.select_next(),
                    _ => {}
                },
                _ => {}
            }
        }

        if app.save_requested {
            app.save_requested = false;
            cfg.capture_view(app);
            let saved = match &config_path {
                Some(path) => cfg.save_to(path).map(|_| path.clone()),
                None => cfg.save(),
            };
            app.status = Some(match saved {
                Ok(path) => format!("saved {}", path.display()),
                Err(e) => format!("save failed: {}", e),
            });
        }
    }
}
