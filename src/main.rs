/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use config::GameConfig;
use sim::runner::LevelRunner;
use sim::world::RunState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    for problem in &config.problems {
        warn!("config: {problem}");
    }
    if let Some(path) = &config.source {
        info!("config loaded from {}", path.display());
    }

    let seed = config.general.seed.unwrap_or_else(clock_seed);
    info!("rng seed {seed}");
    let mut runner = LevelRunner::new(&config, Pcg32::seed_from_u64(seed));

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let mut sound = SoundEngine::new();

    let result = game_loop(&mut runner, &mut renderer, sound.as_mut(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Egg Kong!");
}

fn game_loop(
    runner: &mut LevelRunner,
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad detected");
    }
    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if runner.run_state() == RunState::Menu && kb.quit_held() {
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        let input = kb.frame_input().merge(gp.frame_input());
        let events = runner.frame(now, dt, &input);

        if let Some(sfx) = sound.as_deref_mut() {
            if runner.snapshot().sound_on {
                sfx.react(&events);
                sfx.tick_music(dt);
            }
        }

        renderer.render(&runner.snapshot())?;
        std::thread::sleep(config.timing.frame);
    }

    Ok(())
}

/// Logs go to `general.log_file` when set (the terminal belongs to the
/// game), otherwise warnings and up go to stderr. `RUST_LOG` wins.
/// Returns false if a logger was already installed.
fn init_logging(config: &GameConfig) -> bool {
    let file = config.general.log_file.as_ref().and_then(|path| match File::create(path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", path.display());
            None
        }
    });

    let default = if file.is_some() { "info" } else { "warn" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
    if let Some(f) = file {
        builder.target(env_logger::Target::Pipe(Box::new(f)));
    }
    match builder.try_init() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Logger init failed: {e}");
            false
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
