mod app;
mod braille;
mod color;
mod config;
mod error;
mod export;
mod grid;
mod grower;
mod settings;
mod snapshot;
mod ui;
mod walker;

use app::App;
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::GrowthError;
use export::{ExportOptions, ExportSink};
use grower::ClusterGrower;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use snapshot::DiscardSink;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "brownian-tree")]
#[command(about = "Grow a Brownian tree (diffusion-limited aggregation) and watch it in the terminal")]
struct Args {
    /// JSON config file (default: <config dir>/brownian-tree/config.json when it exists)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the merged configuration to this path before running
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    // === Growth Parameters ===
    /// Grid width and height (odd); re-derives both radii unless they are given too
    #[arg(long = "grid-size")]
    grid_size: Option<usize>,

    /// Target number of stuck particles, seed included
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Distance from centre where walkers appear
    #[arg(long = "spawn-radius")]
    spawn_radius: Option<f64>,

    /// Distance from centre beyond which walkers are discarded
    #[arg(long = "kill-radius")]
    kill_radius: Option<f64>,

    /// Steps a walker may take before it is respawned
    #[arg(long = "max-steps")]
    max_steps: Option<u32>,

    /// Emit a snapshot every N stuck particles
    #[arg(long)]
    cadence: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    // === Output ===
    /// Run without the terminal viewer, logging progress to stderr
    #[arg(long)]
    headless: bool,

    /// Write every snapshot as a frame of an animated GIF
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Write the final snapshot as a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per grid cell in exported images (1-8)
    #[arg(long, default_value = "2")]
    scale: u32,

    // === Visual Parameters ===
    /// Color scheme (inferno, fire, ice, neon, mono)
    #[arg(long = "color-scheme")]
    color_scheme: Option<String>,

    /// Milliseconds each snapshot stays on screen (10-1000)
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,
}

impl Args {
    /// Layer CLI flags over the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        let growth = &mut config.growth;
        if let Some(size) = self.grid_size {
            *growth = growth.clone().with_grid_size(size);
        }
        if let Some(particles) = self.particles {
            growth.num_particles = particles;
        }
        if let Some(radius) = self.spawn_radius {
            growth.spawn_radius = radius;
        }
        if let Some(radius) = self.kill_radius {
            growth.kill_radius = radius;
        }
        if let Some(steps) = self.max_steps {
            growth.max_steps_per_walker = steps;
        }
        if let Some(cadence) = self.cadence {
            growth.snapshot_cadence = cadence;
        }
        if self.seed.is_some() {
            growth.seed = self.seed;
        }

        if let Some(name) = &self.color_scheme {
            config.viewer.color_scheme = ColorScheme::parse(name);
        }
        if let Some(ms) = self.frame_ms {
            config.viewer.frame_interval_ms = ms.clamp(10, 1000);
        }
    }

    fn export_options(&self, config: &AppConfig) -> ExportOptions {
        ExportOptions {
            gif: self.gif.clone(),
            png: self.png.clone(),
            scale: self.scale.clamp(1, 8),
            color_scheme: config.viewer.color_scheme,
            color_radius: config.growth.spawn_radius as f32,
            frame_delay_ms: config.viewer.frame_interval_ms,
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The viewer owns the terminal, so only errors reach stderr there
    init_tracing(if args.headless { "info" } else { "error" });

    let mut config = AppConfig::resolve(args.config.as_deref())?;
    args.apply(&mut config);

    // Fail before touching the terminal
    config.growth.validate()?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!(path = %path.display(), "saved config");
    }

    let seed = config.growth.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding random walk");
    let grower = ClusterGrower::new(config.growth.clone(), ChaCha8Rng::seed_from_u64(seed))?;
    let export = args.export_options(&config);

    if args.headless {
        run_headless(grower, export)
    } else {
        run_viewer(grower, export, &config, seed)
    }
}

fn run_headless(
    mut grower: ClusterGrower<ChaCha8Rng>,
    export: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = if export.is_enabled() {
        grower.run(&mut ExportSink::new(export))?
    } else {
        grower.run(&mut DiscardSink)?
    };
    info!(
        stuck = stats.stuck_count,
        respawns = grower.stats().escapes + grower.stats().exhaustions,
        "done"
    );
    Ok(())
}

fn run_viewer(
    mut grower: ClusterGrower<ChaCha8Rng>,
    export: ExportOptions,
    config: &AppConfig,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = grower.settings().clone();
    let (tx, rx) = mpsc::channel();
    let growth = thread::Builder::new()
        .name("growth".into())
        .spawn(move || {
            let mut tx = tx;
            grower.run(&mut tx)
        })?;

    let mut app = App::new(
        rx,
        settings,
        seed,
        config.viewer.color_scheme,
        Duration::from_millis(config.viewer.frame_interval_ms),
    );
    if export.is_enabled() {
        app = app.with_export(ExportSink::new(export));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    if !app.finish_export() {
        eprintln!("Quit before the final snapshot; export is incomplete");
    }

    // Dropping the receiver stops an unfinished run at its next snapshot;
    // only a finished thread is joined so quitting never blocks.
    drop(app);
    if growth.is_finished() {
        match growth.join() {
            Ok(Ok(_)) | Ok(Err(GrowthError::SinkClosed)) => {}
            Ok(Err(err)) => return Err(err.into()),
            Err(_) => return Err("growth thread panicked".into()),
        }
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Handle Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_speed(),
                    KeyCode::Char('l') | KeyCode::Char('L') => app.jump_to_latest(),
                    KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_color_scheme(),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                        app.scroll_help_down(ui::HELP_CONTENT_LINES);
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => {
                        app.scroll_help_up();
                    }
                    KeyCode::Esc if app.show_help => app.toggle_help(),
                    _ => {}
                }
            }
        }

        // Pull snapshots and advance playback
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "brownian-tree",
            "--grid-size",
            "101",
            "-p",
            "800",
            "--kill-radius",
            "60",
            "--seed",
            "5",
            "--color-scheme",
            "ice",
            "--frame-ms",
            "5000",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.growth.grid_size, 101);
        assert_eq!(config.growth.spawn_radius, 45.0);
        assert_eq!(config.growth.kill_radius, 60.0);
        assert_eq!(config.growth.num_particles, 800);
        assert_eq!(config.growth.seed, Some(5));
        assert_eq!(config.viewer.color_scheme, ColorScheme::Ice);
        assert_eq!(config.viewer.frame_interval_ms, 1000);
        assert!(config.growth.validate().is_ok());
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["brownian-tree"]);
        let mut config = AppConfig::default();
        config.growth.num_particles = 77;
        args.apply(&mut config);
        assert_eq!(config, {
            let mut expected = AppConfig::default();
            expected.growth.num_particles = 77;
            expected
        });
        assert!(!args.export_options(&config).is_enabled());
    }

    #[test]
    fn test_export_scale_is_clamped() {
        let args = Args::parse_from(["brownian-tree", "--png", "out.png", "--scale", "50"]);
        let options = args.export_options(&AppConfig::default());
        assert_eq!(options.scale, 8);
        assert!(options.is_enabled());
        assert_eq!(options.color_radius, 145.0);
    }
}
