mod config;
mod cpu;
mod display;
mod error;
mod helper;
mod keypad;
mod memory;
mod opcode;
mod rom;
mod scheduler;
mod stack;
mod timer;

use clap::Parser;
use config::Config;
use cpu::Cpu;
use display::{HEIGHT, OFF_COLOR, ON_COLOR, WIDTH};
use error::Error;
use minifb::{Key, ScaleMode, Window, WindowOptions};
use rom::Rom;
use scheduler::Scheduler;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How often the window is presented and its events pumped
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() {
    // Module paths use the crate name, which swaps the package's hyphens for underscores.
    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    env_logger::Builder::new()
        .filter_module(&crate_name, log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::parse();

    if let Err(err) = run(&config) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Error> {
    let mut rom = Rom::open(&config.rom)?;

    let mut cpu = Cpu::with_seed(config.quirks(), config.seed);
    cpu.set_verbose(config.verbose);
    cpu.reset(&rom.instructions);

    let mut window = Window::new(
        "CHIP-8",
        WIDTH,
        HEIGHT,
        WindowOptions {
            resize: true,
            scale: config.window_scale(),
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )?;

    // Presentation is paced by FRAME_INTERVAL below; this only caps bursts.
    window.set_target_fps(60);

    // Keep the device alive for as long as the loop runs.
    let volume = Arc::new(Mutex::new(0.0f32));
    let _audio = if config.mute {
        None
    } else {
        match helper::prepare_audio(Arc::clone(&volume)) {
            Ok(device) => Some(device),
            Err(err) => {
                log::warn!("{}; continuing without sound", err);
                None
            }
        }
    };

    let start = Instant::now();
    let mut scheduler = Scheduler::new(config.rate, start);
    scheduler.set_paused(config.paused);
    let mut last_frame = start;

    log::info!(
        "running {} at {} Hz with {:?} quirks",
        config.rom.display(),
        config.rate,
        cpu.quirks()
    );

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();

        if now.duration_since(last_frame) >= FRAME_INTERVAL {
            last_frame = now;

            if cpu.take_redraw() {
                let buffer = cpu.display().to_rgb(ON_COLOR, OFF_COLOR);
                window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
            } else {
                window.update();
            }

            for command in helper::read_commands(&window) {
                scheduler.apply(command, &mut cpu, &mut rom)?;
            }
        }

        // Input lands before this iteration's clocks are evaluated.
        cpu.keypad_mut().set_state(helper::read_keypad(&window));

        let tick = scheduler.tick(&mut cpu, Instant::now())?;
        if tick.executed || tick.timers {
            let level = if cpu.timers().is_sounding() {
                helper::TONE_VOLUME
            } else {
                0.0
            };
            *volume.lock()? = level;
        }
    }

    Ok(())
}
