use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use log::{debug, error, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{ENTRY_POINT, MAX_ROM_SIZE};
use crate::error::{Error, Fault};
use crate::instruction::{self, Flow, Instruction, Peripherals};
use crate::keyboard::Keyboard;
use crate::state::{FrameBuffer, State};

/// Outcome of a successful cycle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// An instruction executed
    Running,
    /// Waiting on Fx0A for a key press; the next cycle retries it
    AwaitingKey,
    /// The program counter reached an empty (0x0000) word
    Finished,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `keyboard`, shared with whatever collects input
///  - a random source seeded once at construction
///  - the `fault` that halted the machine, if any
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one cycle or one frame at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    keyboard: Arc<Keyboard>,
    rng: StdRng,
    fault: Option<Fault>,
}

impl Chip8 {
    /// Builds a machine with a random source seeded from the OS
    pub fn new() -> Result<Self, Error> {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Builds a machine whose random draws are reproducible
    pub fn with_seed(seed: u64) -> Result<Self, Error> {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Result<Self, Error> {
        Ok(Chip8 {
            state: State::new()?,
            keyboard: Arc::new(Keyboard::new()),
            rng,
            fault: None,
        })
    }

    /// Load a rom from a file
    ///
    /// # Arguments
    /// * `path` location of the ROM
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::BadOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let size = file.metadata()?.len() as usize;
        if size > MAX_ROM_SIZE {
            return Err(Error::TooLarge {
                size,
                max: MAX_ROM_SIZE,
            });
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| Error::BadAlloc)?;
        let read = file.take(size as u64).read_to_end(&mut buffer)?;
        if read < size {
            return Err(Error::BadRead {
                expected: size,
                read,
            });
        }

        debug!("read {} bytes from {}", read, path.display());
        self.load_bytes(&buffer)
    }

    /// Load a rom from a source
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Error> {
        // Read one byte more than fits so oversized ROMs can be told apart
        let mut buffer = Vec::new();
        reader
            .take(MAX_ROM_SIZE as u64 + 1)
            .read_to_end(&mut buffer)?;
        self.load_bytes(&buffer)
    }

    /// Copy a rom into memory at the entry point, replacing any program loaded before it
    ///
    /// Nothing is written if the rom doesn't fit.
    pub fn load_bytes(&mut self, rom: &[u8]) -> Result<(), Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::TooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        // Clear out whatever an earlier program left behind
        let start = ENTRY_POINT as usize;
        self.state.memory[start..].iter_mut().for_each(|byte| *byte = 0);
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte ROM at {:#05X}", rom.len(), ENTRY_POINT);
        Ok(())
    }

    /// Returns the FrameBuffer if the display should be redrawn and marks it as drawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&*self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &*self.state.frame_buffer
    }

    pub fn should_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// A handle to the keyboard that can be moved to an input thread
    pub fn keyboard(&self) -> Arc<Keyboard> {
        Arc::clone(&self.keyboard)
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&self, key: u8) {
        self.keyboard.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&self, key: u8) {
        self.keyboard.release(key);
    }

    /// Whether a tone should be playing
    pub fn is_sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The fault that halted the machine, if any
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    ///
    /// Returns None once the pc reaches an empty word, which marks the end of the program.
    pub fn fetch(&mut self) -> Result<Option<u16>, Fault> {
        self.guarded(|chip8| chip8.next_op())
    }

    /// Classifies an opcode
    pub fn decode(&mut self, op: u16) -> Result<Instruction, Fault> {
        self.guarded(|_| classify(op))
    }

    /// Executes a decoded opcode and moves the pc on
    pub fn execute(&mut self, instruction: Instruction, op: u16) -> Result<Flow, Fault> {
        self.guarded(|chip8| chip8.dispatch(instruction, op))
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the next opcode
    /// - does nothing once the program has finished
    pub fn cycle(&mut self) -> Result<Status, Fault> {
        self.guarded(Chip8::step)
    }

    /// Runs `f` unless the machine is halted.
    /// A fault halts the machine; it's returned again by every later call.
    fn guarded<T, F>(&mut self, f: F) -> Result<T, Fault>
    where
        F: FnOnce(&mut Chip8) -> Result<T, Fault>,
    {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        f(self).map_err(|fault| {
            error!("halting at pc {:#05X}: {}", self.state.pc, fault);
            self.fault = Some(fault);
            fault
        })
    }

    fn next_op(&self) -> Result<Option<u16>, Fault> {
        let bytes = self.state.read(self.state.pc as usize, 2)?;
        let op = u16::from(bytes[0]) << 8 | u16::from(bytes[1]);
        Ok(if op == 0x0000 { None } else { Some(op) })
    }

    fn dispatch(&mut self, instruction: Instruction, op: u16) -> Result<Flow, Fault> {
        let mut io = Peripherals {
            keys: &self.keyboard,
            rng: &mut self.rng,
        };
        instruction::execute(instruction, op, &mut self.state, &mut io)
    }

    fn step(&mut self) -> Result<Status, Fault> {
        let op = match self.next_op()? {
            Some(op) => op,
            None => return Ok(Status::Finished),
        };
        let instruction = classify(op)?;
        trace!(
            "{:04X} {:?} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        match self.dispatch(instruction, op)? {
            Flow::Wait => Ok(Status::AwaitingKey),
            _ => Ok(Status::Running),
        }
    }

    /// Runs up to `cycles` cycles, stopping early when the program finishes or waits for a key.
    ///
    /// Timers are left alone; call `advance_timers` on its own cadence.
    pub fn run_frame(&mut self, cycles: usize) -> Result<Status, Fault> {
        let mut status = Status::Running;
        for _ in 0..cycles {
            status = self.cycle()?;
            if status != Status::Running {
                break;
            }
        }
        Ok(status)
    }

    /// Decrements the delay and sound timers, stopping at 0.
    /// Meant to be called at 60Hz independently of the CPU.
    pub fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }
}

fn classify(op: u16) -> Result<Instruction, Fault> {
    instruction::decode(op).ok_or(Fault::UnknownOpcode { opcode: op })
}
