//! Errors raised while building or reading instruction sets.
//!
//! None of these come from user source. Source-level problems are reported
//! by the parser and the lowering pass before any instruction is emitted, so
//! every variant here points at a bug in the compiler that drives this module.

use thiserror::Error;

use crate::bytecode::{action::Action, anchor::AnchorId};

/// Bytecode result type alias.
pub type Result<T> = std::result::Result<T, BytecodeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    /// `anchor_line` was asked of an instruction that holds no anchor operand.
    #[error("can't find anchor on action {action}")]
    NoAnchor { action: Action },

    /// The anchor exists but its position has not been written yet.
    #[error("{0} is not resolved yet")]
    UnresolvedAnchor(AnchorId),

    /// Anchors are resolved exactly once.
    #[error("{anchor} is already resolved to {position}")]
    AnchorAlreadyResolved { anchor: AnchorId, position: usize },

    /// The id does not belong to this instruction set's anchor table.
    #[error("{0} does not belong to this instruction set")]
    UnknownAnchor(AnchorId),

    /// The table ran out of anchor ids.
    #[error("too many anchors in one instruction set")]
    TooManyAnchors,

    /// A resolved target lies past the end of the set.
    #[error("{anchor} points at {position}, past the end of '{name}' ({len} instructions)")]
    AnchorOutOfRange {
        name: String,
        anchor: AnchorId,
        position: usize,
        len: usize,
    },

    /// Nested method, class and block bodies must be sealed before a parent
    /// takes them as an operand.
    #[error("nested instruction set '{nested}' is not sealed")]
    UnsealedNested { nested: String },

    /// An instruction may branch to at most one anchor.
    #[error("{action} was given more than one anchor operand")]
    MultipleAnchors { action: Action },

    /// The instruction set was sealed and no longer accepts writes.
    #[error("instruction set '{name}' is sealed")]
    Sealed { name: String },

    /// Sealing was refused because some branch targets were never resolved.
    #[error("instruction set '{name}' has {count} unresolved anchor(s)")]
    UnresolvedAtSeal { name: String, count: usize },

    /// The handle does not point at an instruction of this set.
    #[error("no instruction at index {index}")]
    NoInstruction { index: usize },

    #[error("instruction set '{name}' has no argument set")]
    NoArgSet { name: String },

    #[error("argument index {index} is out of range for arity {arity}")]
    ArgIndexOutOfRange { index: usize, arity: usize },

    #[error("unknown action code {0}")]
    UnknownAction(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = BytecodeError::NoAnchor {
            action: Action::PutObject,
        };
        assert_eq!(err.to_string(), "can't find anchor on action putobject");

        let err = BytecodeError::UnresolvedAnchor(AnchorId::new(0, 2));
        assert_eq!(err.to_string(), "anchor#2 is not resolved yet");

        let err = BytecodeError::Sealed {
            name: "main".to_string(),
        };
        assert_eq!(err.to_string(), "instruction set 'main' is sealed");
    }
}
