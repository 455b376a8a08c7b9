pub use chip8::{Chip8, Status};
pub use constants::{CYCLES_PER_FRAME, TIMER_HZ};
pub use error::{Error, Fault};
pub use instruction::{decode, Flow, Instruction};
pub use keyboard::Keyboard;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod keyboard;
mod opcode;
mod operations;
pub mod state;
