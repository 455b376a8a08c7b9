use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::info;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use octet_core::{Chip8, Status, TIMER_HZ};
use octet_display::Display;

use crate::keymap::keymap;

/// How the frontend drives the interpreter
#[derive(Debug)]
pub struct Settings {
    pub rom: PathBuf,
    pub cycles_per_frame: usize,
    pub scale: u32,
    pub seed: Option<u64>,
}

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let mut chip8 = match settings.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    }
    .context("unable to build the interpreter")?;

    // Load ROM before opening a window so a bad image never runs
    chip8
        .load_file(&settings.rom)
        .with_context(|| format!("unable to load {}", settings.rom.display()))?;
    info!("loaded {}", settings.rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, settings.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    let mut finished = false;

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                // Key-up events are lost while unfocused so nothing would release held keys
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => chip8.keyboard().clear(),
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let status = chip8
            .run_frame(settings.cycles_per_frame)
            .with_context(|| format!("{} halted", settings.rom.display()))?;
        if status == Status::Finished && !finished {
            info!("program finished");
            finished = true;
        }
        chip8.advance_timers();

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}
