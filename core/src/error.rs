use std::io;
use std::path::PathBuf;

/// Errors raised while building a machine or loading a program into it.
///
/// Any of these means the machine must not be run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to open ROM {path:?}")]
    BadOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to allocate machine storage")]
    BadAlloc,

    #[error("short read: expected {expected} bytes but only read {read}")]
    BadRead { expected: usize, read: usize },

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("unable to read ROM")]
    Io(#[from] io::Error),
}

/// Runtime faults raised by an instruction.
///
/// A fault halts the machine; control flow is in an unknown state afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("stack overflow: call with a full call stack")]
    StackOverflow,

    #[error("address {address:#06X} is outside the program region")]
    AddressError { address: u16 },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },
}
