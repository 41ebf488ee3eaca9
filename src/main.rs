mod config;
mod details;
mod error;
mod interaction;
mod loader;
mod map_draw;
mod posts;
mod projection;
mod regions;
mod state;
mod svg;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::LoadError;
use loader::GeoSource;
use ratatui::{backend::CrosstermBackend, Terminal};
use state::AppState;
use std::{fs, io, path::{Path, PathBuf}, sync::Mutex, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Travel blog world map", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "atlas.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore the map in the terminal (default)
    Explore,
    /// Write the map regions as an SVG document
    Svg {
        #[arg(short, long, value_name = "FILE", default_value = "world-map.svg")]
        out: PathBuf,
    },
    /// Print the details panel HTML for a country
    Panel {
        label: String,
        #[arg(short, long)]
        key: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Explore);

    // The explorer owns the terminal, so its logs go to a file.
    let config = match command {
        Commands::Explore => {
            let config = AppConfig::load_or_default(&cli.config)?;
            let log = fs::File::create(&config.log.file)
                .with_context(|| format!("Failed to create log file: {:?}", config.log.file))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(log))
                .init();
            config
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .init();
            AppConfig::load_or_default(&cli.config)?
        }
    };

    match command {
        Commands::Explore => explore(config).await,
        Commands::Svg { out } => write_svg(&config, &out).await,
        Commands::Panel { label, key } => {
            let index = posts::PostIndex::build(posts::load_posts(&config.posts.file));
            let key = key.unwrap_or_else(|| posts::normalize(&label));
            print!("{}", details::render_details(&index, &key, &label).to_html());
            Ok(())
        }
    }
}

async fn write_svg(config: &AppConfig, out: &Path) -> Result<()> {
    let collection = GeoSource::parse(&config.map.geojson)
        .load()
        .await
        .context(details::UNAVAILABLE_TITLE)?;
    let view = regions::ViewBox::new(config.map.width, config.map.height);
    let shapes = regions::render_all(&collection, view, &config.map.name_property);
    fs::write(out, svg::render_document(&shapes, view))
        .with_context(|| format!("Failed to write SVG: {:?}", out))?;
    tracing::info!(regions = shapes.len(), out = ?out, "Wrote SVG map");
    Ok(())
}

async fn explore(config: AppConfig) -> Result<()> {
    let mut state = AppState::new(&config, posts::load_posts(&config.posts.file));

    // Regions appear once this resolves; until then the map is empty.
    let source = GeoSource::parse(&config.map.geojson);
    let mut pending = Some(tokio::spawn(async move { source.load().await }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, &mut pending).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

type PendingLoad = tokio::task::JoinHandle<Result<geojson::FeatureCollection, LoadError>>;

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    pending: &mut Option<PendingLoad>,
) -> Result<()> {
    loop {
        if let Some(handle) = pending.take_if(|h| h.is_finished()) {
            let result = handle.await.unwrap_or_else(|e| Err(LoadError::Task(e)));
            state.finish_load(result);
        }

        terminal.draw(|f| ui::draw(f, state))?;

        if !event::poll(Duration::ZERO)? {
            // Yield so the map load can make progress on this thread.
            tokio::time::sleep(Duration::from_millis(30)).await;
            continue;
        }
        match event::read()? {
            Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                if state.handle_input(code) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => state.handle_mouse(mouse),
            _ => {}
        }
    }
}
