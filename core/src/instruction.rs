use rand::RngCore;

use crate::constants::INSTRUCTION_WIDTH;
use crate::error::Fault;
use crate::keyboard::Keyboard;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// What the program counter does once an instruction has executed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the next instruction
    Next,
    /// Advance past the next instruction
    Skip,
    /// The instruction already set the program counter
    Jump,
    /// Leave the program counter alone so the instruction runs again next cycle
    Wait,
}

/// What instructions can see of the world outside the machine state
pub struct Peripherals<'a> {
    pub keys: &'a Keyboard,
    pub rng: &'a mut dyn RngCore,
}

/// An instruction's semantics; mutates `state` and reports how the program counter moves on
pub type Handler = fn(op: u16, state: &mut State, io: &mut Peripherals) -> Result<Flow, Fault>;

/// # Instructions
/// The canonical identifiers of the 35 Chip-8 instructions.
///
/// Named after the mnemonic and operands of each instruction, so `LdVxDt` is `LD Vx, DT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    Sys,
    Cls,
    Ret,
    Jp,
    Call,
    SeByte,
    SneByte,
    SeReg,
    LdByte,
    AddByte,
    LdReg,
    Or,
    And,
    Xor,
    AddReg,
    Sub,
    Shr,
    SubN,
    Shl,
    SneReg,
    LdI,
    JpV0,
    Rnd,
    Drw,
    Skp,
    Sknp,
    LdVxDt,
    LdVxK,
    LdDtVx,
    LdStVx,
    AddI,
    LdF,
    LdB,
    LdMemVx,
    LdVxMem,
}

/// Classifies an Opcode, returning None if it isn't a Chip-8 instruction.
///
/// - 0x0 opcodes are matched on all four nibbles
/// - 0x8 opcodes are matched on their first and last nibble
/// - 0xE and 0xF opcodes are matched on their first and last two nibbles
/// - everything else is identified by its first nibble alone
pub fn decode(op: u16) -> Option<Instruction> {
    use Instruction::*;

    let instruction = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Cls,
        (0x0, 0x0, 0xE, 0xE) => Ret,
        (0x0, ..) => Sys,
        (0x1, ..) => Jp,
        (0x2, ..) => Call,
        (0x3, ..) => SeByte,
        (0x4, ..) => SneByte,
        (0x5, ..) => SeReg,
        (0x6, ..) => LdByte,
        (0x7, ..) => AddByte,
        (0x8, .., 0x0) => LdReg,
        (0x8, .., 0x1) => Or,
        (0x8, .., 0x2) => And,
        (0x8, .., 0x3) => Xor,
        (0x8, .., 0x4) => AddReg,
        (0x8, .., 0x5) => Sub,
        (0x8, .., 0x6) => Shr,
        (0x8, .., 0x7) => SubN,
        (0x8, .., 0xE) => Shl,
        (0x9, ..) => SneReg,
        (0xA, ..) => LdI,
        (0xB, ..) => JpV0,
        (0xC, ..) => Rnd,
        (0xD, ..) => Drw,
        (0xE, _, 0x9, 0xE) => Skp,
        (0xE, _, 0xA, 0x1) => Sknp,
        (0xF, _, 0x0, 0x7) => LdVxDt,
        (0xF, _, 0x0, 0xA) => LdVxK,
        (0xF, _, 0x1, 0x5) => LdDtVx,
        (0xF, _, 0x1, 0x8) => LdStVx,
        (0xF, _, 0x1, 0xE) => AddI,
        (0xF, _, 0x2, 0x9) => LdF,
        (0xF, _, 0x3, 0x3) => LdB,
        (0xF, _, 0x5, 0x5) => LdMemVx,
        (0xF, _, 0x6, 0x5) => LdVxMem,
        _ => return None,
    };
    Some(instruction)
}

impl Instruction {
    /// The canonical classification value of an Opcode belonging to this instruction.
    ///
    /// The full opcode for 0x0 instructions, the first nibble for most instructions, the first
    /// and last nibble for 0x8 instructions and the first and last two nibbles for 0xE and 0xF.
    pub fn key(self) -> u16 {
        use Instruction::*;

        match self {
            Sys => 0x0000,
            Cls => 0x00E0,
            Ret => 0x00EE,
            Jp => 0x1,
            Call => 0x2,
            SeByte => 0x3,
            SneByte => 0x4,
            SeReg => 0x5,
            LdByte => 0x6,
            AddByte => 0x7,
            LdReg => 0x80,
            Or => 0x81,
            And => 0x82,
            Xor => 0x83,
            AddReg => 0x84,
            Sub => 0x85,
            Shr => 0x86,
            SubN => 0x87,
            Shl => 0x8E,
            SneReg => 0x9,
            LdI => 0xA,
            JpV0 => 0xB,
            Rnd => 0xC,
            Drw => 0xD,
            Skp => 0xE9E,
            Sknp => 0xEA1,
            LdVxDt => 0xF07,
            LdVxK => 0xF0A,
            LdDtVx => 0xF15,
            LdStVx => 0xF18,
            AddI => 0xF1E,
            LdF => 0xF29,
            LdB => 0xF33,
            LdMemVx => 0xF55,
            LdVxMem => 0xF65,
        }
    }

    /// Selects the Handler implementing this instruction
    pub fn handler(self) -> Handler {
        use Instruction::*;

        match self {
            Sys => sys,
            Cls => clr,
            Ret => rts,
            Jp => jump,
            Call => call,
            SeByte => ske,
            SneByte => skne,
            SeReg => skre,
            LdByte => load,
            AddByte => add,
            LdReg => mv,
            Or => or,
            And => and,
            Xor => xor,
            AddReg => addr,
            Sub => sub,
            Shr => shr,
            SubN => subn,
            Shl => shl,
            SneReg => skrne,
            LdI => loadi,
            JpV0 => jumpi,
            Rnd => rand,
            Drw => draw,
            Skp => skpr,
            Sknp => skup,
            LdVxDt => moved,
            LdVxK => keyd,
            LdDtVx => loads,
            LdStVx => ld,
            AddI => addi,
            LdF => ldspr,
            LdB => bcd,
            LdMemVx => stor,
            LdVxMem => read,
        }
    }
}

/// Runs the handler for `instruction` and then moves the program counter as it asks.
pub fn execute(
    instruction: Instruction,
    op: u16,
    state: &mut State,
    io: &mut Peripherals,
) -> Result<Flow, Fault> {
    let flow = instruction.handler()(op, state, io)?;
    match flow {
        Flow::Next => state.pc += INSTRUCTION_WIDTH,
        Flow::Skip => state.pc += 2 * INSTRUCTION_WIDTH,
        Flow::Jump | Flow::Wait => {}
    }
    Ok(flow)
}
