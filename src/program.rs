use std::{fs, path::Path};

use crate::error::ProgramError;

/// Ordered instruction texts, addressed by index.
///
/// Built up front and never modified while an engine borrows it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<String>,
}

impl Program {
    pub fn new(instructions: Vec<String>) -> Self {
        Self { instructions }
    }

    /// The demo program: add 1 and 2, feed the sum into the compare
    /// register and loop until it reaches 20.
    pub fn reference() -> Self {
        [
            "START", "PUSH 1", "PUSH 2", "ADD", "ACC", "POP", "CMP 20", "JMP 2", "HLT",
        ]
        .into_iter()
        .collect()
    }

    /// Reads one instruction per line. Blank lines and lines starting with
    /// `;` are skipped. Mnemonics are not checked here.
    pub fn parse(source: &str) -> Result<Self, ProgramError> {
        let program: Program = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .collect();

        if program.is_empty() {
            return Err(ProgramError::Empty);
        }
        Ok(program)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn push(&mut self, instruction: impl Into<String>) {
        self.instructions.push(instruction.into());
    }

    pub fn get(&self, ip: usize) -> Option<&str> {
        self.instructions.get(ip).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Program {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_program_layout() {
        let program = Program::reference();
        assert_eq!(program.len(), 9);
        assert_eq!(program.get(0), Some("START"));
        assert_eq!(program.get(7), Some("JMP 2"));
        assert_eq!(program.get(9), None);
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let source = "; add two numbers\nSTART\n\n  PUSH 4  \nPUSH 5\nADD\nHLT\n";
        let program = Program::parse(source).unwrap();
        assert_eq!(
            program.iter().collect::<Vec<_>>(),
            vec!["START", "PUSH 4", "PUSH 5", "ADD", "HLT"]
        );
    }

    #[test]
    fn parse_rejects_empty_source() {
        assert!(matches!(
            Program::parse("; nothing\n\n"),
            Err(ProgramError::Empty)
        ));
    }

    #[test]
    fn push_appends_in_order() {
        let mut program = Program::default();
        program.push("START");
        program.push(String::from("HLT"));
        assert_eq!(program.iter().collect::<Vec<_>>(), vec!["START", "HLT"]);
    }
}
