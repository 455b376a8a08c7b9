use std::convert::TryInto;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, ENTRY_POINT, FONT_SET, MEMORY_SIZE, REGISTER_COUNT, STACK_SIZE,
};
use crate::error::{Error, Fault};

/// The FrameBuffer is indexed as [y][x]; each cell is 1 when set and 0 when clear
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of occupied stack slots
///
/// Timers
/// - 2 8-bit timers (delay & sound)
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the font sprite sheet
///     - 0x200.. holds the program
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: Box<[u8; MEMORY_SIZE]>,
    pub frame_buffer: Box<FrameBuffer>,
    pub draw_flag: bool,
}

impl State {
    /// Allocates a fresh machine state with the font loaded and pc at the entry point.
    ///
    /// Fails with `Error::BadAlloc` if memory or the frame buffer can't be allocated.
    pub fn new() -> Result<Self, Error> {
        let mut memory: Box<[u8; MEMORY_SIZE]> = try_boxed(0)?;
        memory[..FONT_SET.len()].copy_from_slice(&FONT_SET);

        Ok(State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: ENTRY_POINT,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: try_boxed([0; DISPLAY_WIDTH])?,
            draw_flag: true,
        })
    }

    /// Borrows `len` bytes of memory starting at `addr`
    pub fn read(&self, addr: usize, len: usize) -> Result<&[u8], Fault> {
        check_bounds(addr, len)?;
        Ok(&self.memory[addr..addr + len])
    }

    /// Copies `bytes` into memory starting at `addr`
    pub fn write(&mut self, addr: usize, bytes: &[u8]) -> Result<(), Fault> {
        check_bounds(addr, bytes.len())?;
        self.memory[addr..addr + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Fault::StackOverflow)?;
        *slot = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }
}

fn check_bounds(addr: usize, len: usize) -> Result<(), Fault> {
    if addr.saturating_add(len) > MEMORY_SIZE {
        Err(Fault::MemoryOutOfBounds {
            address: addr.max(MEMORY_SIZE),
        })
    } else {
        Ok(())
    }
}

/// Heap allocates an array without aborting the process if the allocation fails
fn try_boxed<T: Copy, const N: usize>(fill: T) -> Result<Box<[T; N]>, Error> {
    let mut buffer: Vec<T> = Vec::new();
    buffer
        .try_reserve_exact(N)
        .map_err(|_| Error::BadAlloc)?;
    buffer.resize(N, fill);
    buffer
        .into_boxed_slice()
        .try_into()
        .map_err(|_| Error::BadAlloc)
}
