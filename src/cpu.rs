use std::{fmt::Display, str::FromStr};

use crate::error::VmError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub sp: usize,    // The stack pointer register, next free slot
    pub ip: usize,    // The instruction pointer register
    pub acc: i64,     // The accumulator register, last ADD result
    pub cmp: i64,     // The compare register, fed by ACC
    pub halted: bool, // Flag keeping the current running state
}

impl Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registers [ sp: {}, ip: {}, acc: {}, cmp: {}, halted: {} ]",
            self.sp, self.ip, self.acc, self.cmp, self.halted
        )
    }
}

impl Registers {
    pub fn new(sp: usize, ip: usize, acc: i64, cmp: i64, halted: bool) -> Self {
        Registers {
            sp,
            ip,
            acc,
            cmp,
            halted,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.ip += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    START, // stack = 0, SP = 0, ACC = 0, IP += 1
    PUSH,  // stack[SP] = v, SP += 1, IP += 1
    POP,   // SP -= 1, IP += 1
    ADD,   // ACC = sum(stack[0..SP]), stack[0] = ACC, SP = 1, IP += 1
    HLT,   // HALT = true, stack = 0, SP = 0, IP += 1
    JMP,   // IP = t - 1
    ACC,   // CMP += ACC, IP += 1
    CMP,   // if CMP >= t then HALT = true else IP += 1
}

impl OpCode {
    pub const ALL: [OpCode; 8] = [
        OpCode::START,
        OpCode::PUSH,
        OpCode::POP,
        OpCode::ADD,
        OpCode::HLT,
        OpCode::JMP,
        OpCode::ACC,
        OpCode::CMP,
    ];

    /// Whether the opcode must carry an integer operand.
    pub fn takes_operand(self) -> bool {
        matches!(self, OpCode::PUSH | OpCode::JMP | OpCode::CMP)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::START => "START",
            OpCode::PUSH => "PUSH",
            OpCode::POP => "POP",
            OpCode::ADD => "ADD",
            OpCode::HLT => "HLT",
            OpCode::JMP => "JMP",
            OpCode::ACC => "ACC",
            OpCode::CMP => "CMP",
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for OpCode {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(Self::START),
            "PUSH" => Ok(Self::PUSH),
            "POP" => Ok(Self::POP),
            "ADD" => Ok(Self::ADD),
            "HLT" => Ok(Self::HLT),
            "JMP" => Ok(Self::JMP),
            "ACC" => Ok(Self::ACC),
            "CMP" => Ok(Self::CMP),
            _ => {
                log::debug!("unknown opcode `{}`", s);
                Err(VmError::UnknownOpcode(s.to_string()))
            }
        }
    }
}
