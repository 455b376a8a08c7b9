/// Bytes of addressable memory (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 0x1000;

/// Where programs are loaded and where execution starts
pub const ENTRY_POINT: u16 = 0x200;

/// Largest program image that fits between the entry point and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - ENTRY_POINT as usize;

/// Width of a single instruction in bytes
pub const INSTRUCTION_WIDTH: u16 = 0x2;

/// Number of return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry, borrow and collision flag
pub const FLAG: usize = 0xF;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Rate at which the delay and sound timers count down
pub const TIMER_HZ: u32 = 60;

/// Instructions executed between two timer ticks by the reference driver loop
pub const CYCLES_PER_FRAME: usize = 10;

/// Bytes per font glyph
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Glyphs for the hexadecimal digits 0..F, 5 bytes each, stored at 0x000.
///
/// Each byte is one row of a 4 pixel wide glyph, e.g. the glyph for `0`:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const FONT_SET: [u8; 80] = [
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
