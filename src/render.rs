//! Human-readable frames of engine state.
//!
//! Renderers only ever see a [`Snapshot`]; the engine itself does no
//! presentation.

use std::fmt::{self, Display};

use colored::{Color, Colorize};

use crate::Snapshot;

pub trait Renderer {
    fn render(&self, snapshot: &Snapshot<'_>) -> String;
}

/// Register banner, one line per stack slot, then the current and next
/// instruction.
#[derive(Debug, Clone, Copy)]
pub struct FrameRenderer {
    pub color: bool,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self { color: true }
    }
}

impl FrameRenderer {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Renderer for FrameRenderer {
    fn render(&self, snapshot: &Snapshot<'_>) -> String {
        Frame {
            renderer: self,
            snap: snapshot,
        }
        .to_string()
    }
}

struct Frame<'r, 's> {
    renderer: &'r FrameRenderer,
    snap: &'r Snapshot<'s>,
}

impl Display for Frame<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, snap) = (self.renderer, self.snap);

        writeln!(f, "==============REGISTERS==============")?;
        writeln!(
            f,
            "{} {} | {} {} | {} {} | {} {}",
            r.paint("SP:", Color::BrightBlue),
            snap.sp,
            r.paint("IP:", Color::BrightRed),
            snap.ip,
            r.paint("ACC:", Color::BrightYellow),
            snap.acc,
            r.paint("CMP:", Color::BrightMagenta),
            snap.cmp
        )?;
        writeln!(f, "================STACK================")?;

        for (slot, value) in snap.stack.iter().enumerate() {
            write!(f, "#{}:\t{:#06X}\t\t{}", slot, value, value)?;
            if slot == snap.sp {
                write!(f, "    {}", r.paint("<- sp", Color::BrightGreen))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "--------------------------------------")?;
        writeln!(
            f,
            "{} {}",
            r.paint("Current instruction:  ", Color::BrightGreen),
            snap.current_instruction.unwrap_or("")
        )?;
        writeln!(
            f,
            "{} {}",
            r.paint("Next instruction:     ", Color::BrightGreen),
            snap.next_instruction.unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(stack: &[i64]) -> Snapshot<'_> {
        Snapshot {
            sp: 1,
            ip: 4,
            acc: 3,
            cmp: 6,
            stack,
            halted: false,
            current_instruction: Some("ADD"),
            next_instruction: Some("ACC"),
        }
    }

    #[test]
    fn plain_frame() {
        let stack = [3, 2, 0];
        let frame = FrameRenderer::plain().render(&snapshot(&stack));
        let expected = "\
==============REGISTERS==============
SP: 1 | IP: 4 | ACC: 3 | CMP: 6
================STACK================
#0:\t0x0003\t\t3
#1:\t0x0002\t\t2    <- sp
#2:\t0x0000\t\t0
--------------------------------------
Current instruction:   ADD
Next instruction:      ACC
";
        assert_eq!(frame, expected);
    }

    #[test]
    fn marker_absent_when_stack_is_full() {
        let stack = [1];
        let frame = FrameRenderer::plain().render(&snapshot(&stack));
        assert!(!frame.contains("<- sp"));
    }

    #[test]
    fn halted_frame_has_empty_next_instruction() {
        let stack = [0, 0];
        let snap = Snapshot {
            halted: true,
            next_instruction: None,
            ..snapshot(&stack)
        };
        let frame = FrameRenderer::plain().render(&snap);
        assert!(frame.ends_with("Next instruction:      \n"));
    }

    #[test]
    fn frame_of_finished_reference_run() {
        let prog = crate::program::Program::reference();
        let mut vm = crate::Engine::new(&prog).unwrap();
        vm.run().unwrap();

        let frame = FrameRenderer::plain().render(&vm.snapshot());
        assert!(frame.contains("SP: 0 | IP: 6 | ACC: 3 | CMP: 21\n"));
        assert!(frame.contains("#0:\t0x0003\t\t3    <- sp\n"));
        assert!(frame.contains("Current instruction:   CMP 20\n"));
        assert!(frame.ends_with("Next instruction:      \n"));
    }
}
