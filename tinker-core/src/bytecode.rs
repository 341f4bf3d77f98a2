//! Bytecode: the lowered, wire-representable form of a traversal.
//!
//! A traversal is compiled into two instruction lists. Source instructions
//! configure the traversal source (`withSideEffect`, `withComputer`, ...),
//! step instructions are the steps themselves in the order they were added.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::types::Value;

/// A single operator with its arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub operator: CompactString,
    pub arguments: Vec<Value>,
}

impl Instruction {
    pub fn new(operator: impl Into<CompactString>, arguments: Vec<Value>) -> Self {
        Self {
            operator: operator.into(),
            arguments,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Compiled step sequence of a traversal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bytecode {
    source_instructions: Vec<Instruction>,
    step_instructions: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, operator: impl Into<CompactString>, arguments: Vec<Value>) {
        self.source_instructions
            .push(Instruction::new(operator, arguments));
    }

    pub fn add_step(&mut self, operator: impl Into<CompactString>, arguments: Vec<Value>) {
        self.step_instructions
            .push(Instruction::new(operator, arguments));
    }

    pub fn source_instructions(&self) -> &[Instruction] {
        &self.source_instructions
    }

    pub fn step_instructions(&self) -> &[Instruction] {
        &self.step_instructions
    }

    pub fn is_empty(&self) -> bool {
        self.source_instructions.is_empty() && self.step_instructions.is_empty()
    }
}

impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Instruction]) -> fmt::Result {
            f.write_str("[")?;
            for (i, ins) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{ins}")?;
            }
            f.write_str("]")
        }
        f.write_str("[")?;
        list(f, &self.source_instructions)?;
        f.write_str(", ")?;
        list(f, &self.step_instructions)?;
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytecode_builds_in_order() {
        let mut bc = Bytecode::new();
        assert!(bc.is_empty());
        bc.add_step("V", vec![]);
        bc.add_step("has", vec!["name".into(), "marko".into()]);
        bc.add_step("out", vec!["knows".into()]);

        let ops: Vec<&str> = bc
            .step_instructions()
            .iter()
            .map(|i| i.operator.as_str())
            .collect();
        assert_eq!(ops, vec!["V", "has", "out"]);
        assert!(bc.source_instructions().is_empty());
        assert!(!bc.is_empty());
    }

    #[test]
    fn test_bytecode_display() {
        let mut bc = Bytecode::new();
        bc.add_source("withSideEffect", vec!["a".into(), Value::Int(1)]);
        bc.add_step("V", vec![]);
        bc.add_step("out", vec!["knows".into()]);
        assert_eq!(bc.to_string(), "[[withSideEffect(a, 1)], [V(), out(knows)]]");
    }

    #[test]
    fn test_nested_bytecode_value() {
        let mut inner = Bytecode::new();
        inner.add_step("hasLabel", vec!["person".into()]);
        let mut outer = Bytecode::new();
        outer.add_step("where", vec![Value::Bytecode(inner.clone())]);

        let arg = &outer.step_instructions()[0].arguments[0];
        assert_eq!(arg.as_bytecode(), Some(&inner));
        assert_eq!(outer.to_string(), "[[], [where([[], [hasLabel(person)]])]]");
    }
}
