use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
};

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/collision flag; when an
///       arithmetic or shift instruction targets VF itself the flag write
///       wins over the result write
/// - (i) a 16-bit memory address register; never masked back into the
///   12-bit address range, so FX1E can leave it past 0xFFF
///
/// Counter
/// - (pc) a 16-bit program counter, advanced by 2 at every fetch
///
/// Pointer
/// - (sp) an 8-bit stack pointer; slot 0 of the stack is a sentinel so
///   `sp == 0` means the stack is empty
///
/// Timers
/// - 2 countdown timers (delay & sound) decayed by wall-clock elapsed
///   time at 60 units per second; stored as f64 because the decay is
///   fractional between driver iterations
///
/// ## Memory
/// - 16 entry stack of return addresses for subroutine calls
/// - 4096 bytes of addressable memory; the sprite sheet sits at
///   0x050..0x0A0 and ROMs load at 0x200
/// - 64x32 frame buffer plus a draw flag that tells the driver when the
///   display needs to be repainted
///
/// ## Input
/// - (waiting_keys) FX0A's shadow of keys seen held while it polls for a
///   press-then-release edge; persists across re-executions of the
///   instruction until an edge completes
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: f64,
    pub sound_timer: f64,
    pub stack: [u16; 16],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub waiting_keys: [bool; 16],
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[FONT_START as usize..FONT_START as usize + SPRITE_SHEET.len()]
            .copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0.0,
            sound_timer: 0.0,
            stack: [0; 16],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            waiting_keys: [false; 16],
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_program_start() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_loads_font_at_font_start() {
        let state = State::new();
        // first row of the "0" glyph
        assert_eq!(state.memory[0x050], 0xF0);
        // last row of the "F" glyph
        assert_eq!(state.memory[0x09F], 0x80);
        // untouched on either side
        assert_eq!(state.memory[0x04F], 0x00);
        assert_eq!(state.memory[0x0A0], 0x00);
    }
}
