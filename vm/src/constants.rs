/// Horizontal resolution of the Chip-8 display in pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical resolution of the Chip-8 display in pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory; addresses run 0x000..=0xFFF.
pub const MEMORY_SIZE: usize = 4096;

/// Address the sprite sheet is loaded at; FX29 resolves glyphs relative to it.
pub const FONT_START: u16 = 0x050;

/// Address ROMs are loaded at and the program counter starts at.
pub const PROGRAM_START: u16 = 0x200;

/// Delay and sound timer decay rate in units per second of wall-clock time.
pub const TIMER_RATE: f64 = 60.0;

/// The hexadecimal font: 16 glyphs (0-F) of 5 bytes each.
/// Each byte is one 8-pixel row; only the high nibble carries pixels.
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
