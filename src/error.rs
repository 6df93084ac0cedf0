use thiserror::Error;

use crate::cpu::OpCode;

/// Fatal conditions raised while decoding or executing an instruction.
///
/// None of these are recoverable: the run loop stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// POP or ADD with no live value on the stack.
    #[error("stack underflow: no live value to pop (sp = 0)")]
    StackUnderflow,

    /// PUSH with every slot already live.
    #[error("stack overflow: all {capacity} slots are live")]
    StackOverflow { capacity: usize },

    /// JMP whose operand does not name an instruction of the program.
    #[error("invalid jump target {target}: program has {len} instructions")]
    InvalidJumpTarget { target: i64, len: usize },

    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    #[error("{opcode} expects an integer operand, got `{operand}`")]
    MalformedOperand { opcode: OpCode, operand: String },

    #[error("{0} requires an operand")]
    MissingOperand(OpCode),

    #[error("{opcode} takes no operand, got `{operand}`")]
    UnexpectedOperand { opcode: OpCode, operand: String },

    /// Fetch past the last instruction of a program that never halted.
    #[error("instruction pointer {ip} is past the end of the program ({len} instructions)")]
    EndOfProgram { ip: usize, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl VmError {
    /// Process exit status a driver should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            VmError::StackUnderflow => 64,
            VmError::StackOverflow { .. } => 65,
            VmError::InvalidJumpTarget { .. } | VmError::EndOfProgram { .. } => 66,
            VmError::UnknownOpcode(_)
            | VmError::MalformedOperand { .. }
            | VmError::MissingOperand(_)
            | VmError::UnexpectedOperand { .. } => 67,
            VmError::InvalidConfig(_) => 78,
        }
    }
}

/// A [`VmError`] pinned to the instruction that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fault at ip {ip} (`{instruction}`): {error}")]
pub struct Fault {
    pub ip: usize,
    pub instruction: String,
    pub error: VmError,
}

impl Fault {
    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

/// Errors from reading program text.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("could not read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("program contains no instructions")]
    Empty,
}
