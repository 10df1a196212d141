mod camera;
mod cli;
mod config;
mod display;
mod effects;
mod error;
mod lightning;
mod math3d;
mod mqtt;
mod scene;
mod util;

use camera::OrbitCamera;
use cli::Args;
use clap::Parser;
use config::{StormConfig, Timestep};
use display::{Display, Frame, InputEvent};
use effects::StrikeEvent;
use error::StormError;
use mqtt::StrikePublisher;
use scene::StormScene;
use sdl2::keyboard::Keycode;
use tracing_subscriber::EnvFilter;
use util::{FrameClock, Rng};

/// Radians per arrow-key press
const KEY_ORBIT_STEP: f32 = 0.05;
const FPS_SAMPLES: usize = 60;

fn init_logging(level: Option<&str>) {
    let directive = level.map_or_else(|| "stormcell=info".to_string(), |l| format!("stormcell={l}"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &Args) -> Result<StormConfig, StormError> {
    let mut config = if args.config.exists() {
        let config = StormConfig::load(&args.config)?;
        tracing::info!(path = %args.config.display(), "loaded storm config");
        config
    } else {
        tracing::info!(path = %args.config.display(), "no config file, using defaults");
        StormConfig::default()
    };
    if args.wall_clock {
        config.timestep = Timestep::WallClock;
    }
    Ok(config)
}

fn announce(event: &StrikeEvent, publisher: Option<&StrikePublisher>) {
    tracing::info!(
        strike = event.strike,
        peak = event.peak,
        points = event.points,
        "thunder"
    );
    if let Some(publisher) = publisher {
        publisher.publish(event);
    }
}

/// Drive the simulation at the configured fixed step without opening a window
fn run_headless(
    ticks: u64,
    config: &StormConfig,
    seed: u64,
    publisher: Option<&StrikePublisher>,
) {
    let dt = match config.timestep {
        Timestep::Fixed { hz } => 1.0 / hz,
        Timestep::WallClock => {
            tracing::warn!("wall-clock timestep has no meaning headless, using 60 Hz");
            1.0 / 60.0
        },
    };
    let mut scene = StormScene::new(config, seed);
    let mut strikes = 0u64;
    for _ in 0..ticks {
        if let Some(event) = scene.update(dt) {
            strikes += 1;
            announce(&event, publisher);
        }
    }
    tracing::info!(
        ticks,
        seconds = ticks as f32 * dt,
        strikes,
        "headless run finished"
    );
}

fn run_windowed(
    args: &Args,
    config: &StormConfig,
    seed: u64,
    publisher: Option<&StrikePublisher>,
) -> Result<(), StormError> {
    let (width, height) = args.window_size();
    let mut display = Display::with_options("stormcell", width, height, !args.no_vsync)?;
    let mut frame = Frame::new(display.width(), display.height());
    let mut camera = OrbitCamera::new(&config.camera);
    let mut scene = StormScene::new(config, seed);
    let mut clock = FrameClock::new(config.timestep.step_mode(), FPS_SAMPLES);
    let mut paused = false;

    println!("=== stormcell ===");
    println!("Resolution: {}x{}", width, height);
    println!("Layers: {}", scene.names().join(", "));
    println!("Controls:");
    println!("  Drag / arrows - Orbit camera");
    println!("  Wheel         - Zoom");
    println!("  Space         - Strike now");
    println!("  P             - Pause simulation");
    println!("  F             - Log FPS");
    println!("  Escape        - Quit");

    'main: loop {
        let dt = clock.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Space) => scene.strike_now(),
                InputEvent::KeyDown(Keycode::P) => {
                    paused = !paused;
                    tracing::info!(paused, "simulation toggled");
                },
                InputEvent::KeyDown(Keycode::F) => {
                    let (min_fps, max_fps) = clock.min_max_fps();
                    tracing::info!(
                        avg = clock.avg_fps() as u32,
                        min = min_fps as u32,
                        max = max_fps as u32,
                        "fps"
                    );
                },
                InputEvent::KeyDown(Keycode::Left) => camera.orbit(-KEY_ORBIT_STEP, 0.0),
                InputEvent::KeyDown(Keycode::Right) => camera.orbit(KEY_ORBIT_STEP, 0.0),
                InputEvent::KeyDown(Keycode::Up) => camera.orbit(0.0, -KEY_ORBIT_STEP),
                InputEvent::KeyDown(Keycode::Down) => camera.orbit(0.0, KEY_ORBIT_STEP),
                InputEvent::Drag { dx, dy } => camera.drag(dx, dy),
                InputEvent::Wheel(notches) => camera.zoom(notches),
                InputEvent::KeyDown(_) => {},
            }
        }

        if !paused {
            if let Some(event) = scene.update(dt) {
                announce(&event, publisher);
            }
        }

        scene.render(&camera, &mut frame);
        display.present(&frame)?;
    }

    Ok(())
}

fn main() -> Result<(), StormError> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = load_config(&args)?;

    if let Some(path) = &args.write_config {
        config.save(path)?;
        tracing::info!(path = %path.display(), "config written");
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(|| Rng::from_entropy().next_u64());
    tracing::info!(seed, "storm seed");

    let publisher = args
        .mqtt_host
        .as_deref()
        .map(|host| StrikePublisher::connect(host, args.mqtt_port, args.mqtt_topic.as_deref()))
        .transpose()?;

    match args.headless {
        Some(ticks) => {
            run_headless(ticks, &config, seed, publisher.as_ref());
            Ok(())
        },
        None => run_windowed(&args, &config, seed, publisher.as_ref()),
    }
}
