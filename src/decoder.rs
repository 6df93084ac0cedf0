//! Splitting instruction text into operator and operand.
//!
//! [`decode`] is purely lexical. Whether the operator is a known opcode and
//! whether the operand fits that opcode's arity is checked afterwards by
//! [`Instruction::from_decoded`], which the engine calls at dispatch time.

use crate::cpu::OpCode;
use crate::error::VmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub operator: &'a str,
    pub operand: Option<&'a str>,
}

/// Splits `text` on its first space. Everything after that space is the
/// operand, even if it contains further spaces.
pub fn decode(text: &str) -> Decoded<'_> {
    match text.split_once(' ') {
        Some((operator, operand)) => Decoded {
            operator,
            operand: Some(operand),
        },
        None => Decoded {
            operator: text,
            operand: None,
        },
    }
}

/// An opcode together with its validated operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Option<i64>,
}

impl Instruction {
    pub fn from_decoded(decoded: Decoded<'_>) -> Result<Self, VmError> {
        let opcode: OpCode = decoded.operator.parse()?;

        let operand = match (opcode.takes_operand(), decoded.operand) {
            (true, Some(text)) => Some(text.parse::<i64>().map_err(|_| {
                VmError::MalformedOperand {
                    opcode,
                    operand: text.to_string(),
                }
            })?),
            (true, None) => return Err(VmError::MissingOperand(opcode)),
            (false, Some(text)) => {
                return Err(VmError::UnexpectedOperand {
                    opcode,
                    operand: text.to_string(),
                })
            }
            (false, None) => None,
        };

        Ok(Self { opcode, operand })
    }

    pub fn parse(text: &str) -> Result<Self, VmError> {
        Self::from_decoded(decode(text))
    }

    /// The operand of an opcode that requires one.
    pub(crate) fn argument(&self) -> i64 {
        // from_decoded guarantees presence for operand-taking opcodes
        self.operand.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bare_operator() {
        assert_eq!(
            decode("START"),
            Decoded {
                operator: "START",
                operand: None
            }
        );
    }

    #[test]
    fn decode_splits_on_first_space() {
        assert_eq!(
            decode("PUSH 1 2"),
            Decoded {
                operator: "PUSH",
                operand: Some("1 2")
            }
        );
        assert_eq!(decode("JMP -3").operand, Some("-3"));
    }

    #[test]
    fn decode_does_not_validate() {
        let decoded = decode("FOO bar");
        assert_eq!(decoded.operator, "FOO");
        assert_eq!(decoded.operand, Some("bar"));
    }

    #[test]
    fn parse_valid_instructions() {
        assert_eq!(
            Instruction::parse("PUSH -12").unwrap(),
            Instruction {
                opcode: OpCode::PUSH,
                operand: Some(-12)
            }
        );
        assert_eq!(
            Instruction::parse("ADD").unwrap(),
            Instruction {
                opcode: OpCode::ADD,
                operand: None
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_opcode() {
        assert_eq!(
            Instruction::parse("MUL 2"),
            Err(VmError::UnknownOpcode("MUL".to_string()))
        );
        assert_eq!(
            Instruction::parse("SUM"),
            Err(VmError::UnknownOpcode("SUM".to_string()))
        );
    }

    #[test]
    fn parse_rejects_non_integer_operand() {
        assert_eq!(
            Instruction::parse("CMP twenty"),
            Err(VmError::MalformedOperand {
                opcode: OpCode::CMP,
                operand: "twenty".to_string()
            })
        );
        assert!(matches!(
            Instruction::parse("PUSH "),
            Err(VmError::MalformedOperand { .. })
        ));
        assert!(matches!(
            Instruction::parse("PUSH 1 2"),
            Err(VmError::MalformedOperand { .. })
        ));
    }

    #[test]
    fn parse_checks_arity() {
        assert_eq!(
            Instruction::parse("JMP"),
            Err(VmError::MissingOperand(OpCode::JMP))
        );
        assert_eq!(
            Instruction::parse("POP 1"),
            Err(VmError::UnexpectedOperand {
                opcode: OpCode::POP,
                operand: "1".to_string()
            })
        );
    }
}
