use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use vm::Chip8;

use crate::keymap::keymap;

/// Pause between driver iterations. Keeps the machine in the
/// few-hundred-to-thousand instructions per second range; a tunable,
/// not a contract.
const CYCLE_TIME: Duration = Duration::from_millis(1);

/// Drives the machine one instruction per iteration until the window is
/// closed or Escape is pressed. Each iteration polls platform events,
/// decays the timers by elapsed wall-clock time, executes a single
/// instruction, and repaints only when that instruction drew or cleared.
pub fn run(rom: PathBuf) -> anyhow::Result<()> {
    let mut chip8 = Chip8::new();

    let file =
        File::open(&rom).with_context(|| format!("unable to open ROM {}", rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load ROM {}", rom.display()))?;

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = Display::new(&sdl);
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    'event: loop {
        std::thread::sleep(CYCLE_TIME);

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
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
        chip8.advance_timers();
        chip8.advance_cpu();

        // Repaint only after a draw or clear instruction
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame);
        }
    }

    Ok(())
}
