pub mod cache;
pub mod config;
pub mod cpu;
pub mod decoder;
pub mod error;
pub mod memory;
pub mod program;
pub mod render;

use cache::DecodeCache;
use config::EngineConfig;
use cpu::{OpCode, Registers};
use decoder::Instruction;
use error::{Fault, VmError};
use log::{debug, info, warn};
use memory::{Addressable, Stack};
use program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, nothing executed yet.
    Ready,
    Running,
    /// Terminal. Further steps are no-ops.
    Halted,
    /// Terminal. Further steps return the same fault again.
    Faulted,
}

/// The instruction a successful [`Engine::step`] just executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed<'p> {
    pub ip: usize,
    pub text: &'p str,
    pub instruction: Instruction,
}

/// Read-only view of the machine handed to renderers between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub sp: usize,
    pub ip: usize,
    pub acc: i64,
    pub cmp: i64,
    /// All physical slots; only `stack[..sp]` is live.
    pub stack: &'a [i64],
    pub halted: bool,
    pub current_instruction: Option<&'a str>,
    pub next_instruction: Option<&'a str>,
}

/// Fetch-decode-execute engine over a borrowed [`Program`].
///
/// Single threaded and never blocks: callers drive it with [`Engine::step`]
/// or [`Engine::run`]. Any error is fatal; a faulting step leaves registers
/// and stack exactly as they were before it.
pub struct Engine<'p> {
    regs: Registers,
    stack: Stack,
    program: &'p Program,
    cache: DecodeCache,
    steps: u64,
    current: Option<&'p str>,
    fault: Option<Fault>,
}

impl<'p> Engine<'p> {
    pub fn new(program: &'p Program) -> Result<Self, VmError> {
        Self::with_config(program, EngineConfig::default())
    }

    pub fn with_config(program: &'p Program, config: EngineConfig) -> Result<Self, VmError> {
        config.validate()?;

        Ok(Self {
            regs: Registers::default(),
            stack: Stack::new(config.stack_capacity),
            program,
            cache: DecodeCache::new(config.decode_cache_size)?,
            steps: 0,
            current: None,
            fault: None,
        })
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Values pushed since the last reset, bottom first.
    pub fn live_stack(&self) -> &[i64] {
        self.stack.live(self.regs.sp)
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn cache(&self) -> &DecodeCache {
        &self.cache
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.regs.halted
    }

    /// The fault that ended the run, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    pub fn state(&self) -> State {
        if self.fault.is_some() {
            State::Faulted
        } else if self.regs.halted {
            State::Halted
        } else if self.steps == 0 {
            State::Ready
        } else {
            State::Running
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let next_instruction = if self.regs.halted {
            None
        } else {
            self.program.get(self.regs.ip)
        };

        Snapshot {
            sp: self.regs.sp,
            ip: self.regs.ip,
            acc: self.regs.acc,
            cmp: self.regs.cmp,
            stack: self.stack.slots(),
            halted: self.regs.halted,
            current_instruction: self.current,
            next_instruction,
        }
    }

    fn debug_state(&self) {
        debug!(
            "State: SP: {}, IP: {:#04x}, ACC: {:#4}, CMP: {:#4} | {:?}",
            self.regs.sp,
            self.regs.ip,
            self.regs.acc,
            self.regs.cmp,
            self.live_stack()
        );
    }

    /// Executes the instruction at `ip`.
    ///
    /// Returns `Ok(None)` without touching anything once halted. After a
    /// fault every call returns that fault again.
    pub fn step(&mut self) -> Result<Option<Executed<'p>>, Fault> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.regs.halted {
            warn!("step on a halted engine ignored");
            return Ok(None);
        }

        let result = self.fetch_and_execute();
        if let Err(fault) = &result {
            debug!("run ended: {}", fault);
            self.fault = Some(fault.clone());
        }
        result.map(Some)
    }

    fn fetch_and_execute(&mut self) -> Result<Executed<'p>, Fault> {
        let ip = self.regs.ip;
        let program = self.program;
        let text = program.get(ip).ok_or_else(|| Fault {
            ip,
            instruction: String::from("<end of program>"),
            error: VmError::EndOfProgram {
                ip,
                len: program.len(),
            },
        })?;

        let fault = |error: VmError| Fault {
            ip,
            instruction: text.to_string(),
            error,
        };

        let instruction = self.cache.fetch(ip, text).map_err(fault)?;
        self.execute(instruction).map_err(fault)?;

        self.steps += 1;
        self.current = Some(text);
        self.debug_state();

        if self.regs.halted {
            info!("halted after {} steps: {}", self.steps, self.regs);
        }

        Ok(Executed {
            ip,
            text,
            instruction,
        })
    }

    /// Steps until halted and returns how many instructions ran.
    pub fn run(&mut self) -> Result<u64, Fault> {
        self.run_with(|_| {})
    }

    /// Like [`Engine::run`], handing a snapshot to `observer` after every step.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<u64, Fault>
    where
        F: FnMut(&Snapshot<'_>),
    {
        let start = self.steps;

        while !self.regs.halted {
            self.step()?;
            observer(&self.snapshot());
        }

        Ok(self.steps - start)
    }

    // Every precondition is checked before the first mutation.
    fn execute(&mut self, instr: Instruction) -> Result<(), VmError> {
        match instr.opcode {
            OpCode::START => {
                self.stack.clear();
                self.regs.sp = 0;
                self.regs.acc = 0;
                self.regs.advance();
            }
            OpCode::PUSH => {
                if self.regs.sp >= self.stack.capacity() {
                    return Err(VmError::StackOverflow {
                        capacity: self.stack.capacity(),
                    });
                }
                self.stack.write(self.regs.sp, instr.argument())?;
                self.regs.sp += 1;
                self.regs.advance();
            }
            OpCode::POP => {
                if self.regs.sp == 0 {
                    return Err(VmError::StackUnderflow);
                }
                self.regs.sp -= 1;
                self.regs.advance();
            }
            OpCode::ADD => {
                if self.regs.sp == 0 {
                    return Err(VmError::StackUnderflow);
                }
                let sum = self
                    .live_stack()
                    .iter()
                    .fold(0i64, |acc, value| acc.wrapping_add(*value));
                self.stack.write(0, sum)?;
                self.regs.acc = sum;
                self.regs.sp = 1;
                self.regs.advance();
            }
            OpCode::HLT => {
                self.regs.halted = true;
                self.stack.clear();
                self.regs.sp = 0;
                self.regs.advance();
            }
            OpCode::JMP => {
                let target = instr.argument();
                let len = self.program.len();
                // the operand is one-based
                let index = target
                    .checked_sub(1)
                    .and_then(|index| usize::try_from(index).ok())
                    .filter(|&index| index < len)
                    .ok_or(VmError::InvalidJumpTarget { target, len })?;
                self.regs.ip = index;
            }
            OpCode::ACC => {
                self.regs.cmp = self.regs.cmp.wrapping_add(self.regs.acc);
                self.regs.advance();
            }
            OpCode::CMP => {
                if self.regs.cmp >= instr.argument() {
                    self.regs.halted = true;
                } else {
                    self.regs.advance();
                }
            }
        }

        Ok(())
    }
}
