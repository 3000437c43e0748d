use serde::{Deserialize, Serialize};

use crate::bytecode::{anchor::AnchorId, ir::InstructionSet};

/// Constant carried inline by an instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

/// Reference to a local, constant or instance variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Index(usize),
    Named(String),
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Index(i) => write!(f, "${}", i),
            Slot::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A value held by an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Slot(Slot),
    /// Body of a method, class or block, compiled as its own set.
    Nested(Box<InstructionSet>),
    /// Branch target, resolved through the owning set's anchor table.
    Anchor(AnchorId),
}

impl Operand {
    pub fn local(index: usize) -> Self {
        Operand::Slot(Slot::Index(index))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Operand::Slot(Slot::Named(name.into()))
    }

    pub fn nil() -> Self {
        Operand::Literal(Literal::Nil)
    }

    pub fn as_anchor(&self) -> Option<AnchorId> {
        match self {
            Operand::Anchor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&InstructionSet> {
        match self {
            Operand::Nested(set) => Some(set),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(lit) => write!(f, "{}", lit),
            Operand::Slot(slot) => write!(f, "{}", slot),
            Operand::Nested(set) => write!(f, "<{}:{}>", set.kind(), set.name()),
            Operand::Anchor(id) => write!(f, "{}", id),
        }
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Operand::Literal(value)
    }
}

impl From<Slot> for Operand {
    fn from(value: Slot) -> Self {
        Operand::Slot(value)
    }
}

impl From<AnchorId> for Operand {
    fn from(value: AnchorId) -> Self {
        Operand::Anchor(value)
    }
}

impl From<InstructionSet> for Operand {
    fn from(value: InstructionSet) -> Self {
        Operand::Nested(Box::new(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Literal(Literal::Integer(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Literal(Literal::Integer(value as i64))
    }
}

impl From<usize> for Operand {
    fn from(value: usize) -> Self {
        Operand::Literal(Literal::Integer(value as i64))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Literal(Literal::Float(value))
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Literal(Literal::Bool(value))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Literal(Literal::String(value.to_string()))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Literal(Literal::String(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::ir::SetKind;

    #[test]
    fn test_operand_text() {
        assert_eq!(Operand::from(5).to_string(), "5");
        assert_eq!(Operand::from(1.5).to_string(), "1.5");
        assert_eq!(Operand::from("+").to_string(), "+");
        assert_eq!(Operand::from(true).to_string(), "true");
        assert_eq!(Operand::nil().to_string(), "nil");
        assert_eq!(Operand::local(3).to_string(), "$3");
        assert_eq!(Operand::named("@foo").to_string(), "@foo");
        assert_eq!(Operand::from(AnchorId::new(0, 4)).to_string(), "anchor#4");
    }

    #[test]
    fn test_nested_operand() {
        let body = InstructionSet::new("bar", SetKind::Method);
        let op = Operand::from(body);

        assert_eq!(op.to_string(), "<Def:bar>");
        assert_eq!(op.as_nested().map(|s| s.name()), Some("bar"));
        assert_eq!(op.as_anchor(), None);
    }

    #[test]
    fn test_as_anchor() {
        let id = AnchorId::new(0, 0);
        assert_eq!(Operand::Anchor(id).as_anchor(), Some(id));
        assert_eq!(Operand::from(0).as_anchor(), None);
    }
}
