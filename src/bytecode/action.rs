use serde::{Deserialize, Serialize};

use crate::bytecode::error::BytecodeError;

// =============================================================================
// ACTION - Bytecode opcodes
// =============================================================================

/// The operation an instruction performs.
///
/// Discriminants are the stable action codes shared with the VM loop and the
/// disassembler. Every member has exactly one mnemonic, see [`Action::mnemonic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    // variables
    GetLocal = 0,
    GetConstant,
    GetInstanceVariable,
    SetLocal,
    SetConstant,
    SetInstanceVariable,

    // literals
    PutBoolean,
    PutString,
    PutFloat,
    PutSelf,
    PutObject,
    PutNull,

    // collections
    NewArray,
    ExpandArray,
    SplatArray,
    NewHash,
    NewRange,

    // ==========================================================================
    // Control flow - targets are anchors resolved after emission
    // ==========================================================================
    BranchUnless,
    BranchIf,
    Jump,
    Break,

    // definitions
    DefMethod,
    DefSingletonMethod,
    DefClass,

    // calls
    Send,
    InvokeBlock,
    GetBlock,

    // stack ops
    Pop,
    Dup,
    Leave,
}

impl Action {
    /// Every action, in code order.
    pub const ALL: [Action; 30] = [
        Action::GetLocal,
        Action::GetConstant,
        Action::GetInstanceVariable,
        Action::SetLocal,
        Action::SetConstant,
        Action::SetInstanceVariable,
        Action::PutBoolean,
        Action::PutString,
        Action::PutFloat,
        Action::PutSelf,
        Action::PutObject,
        Action::PutNull,
        Action::NewArray,
        Action::ExpandArray,
        Action::SplatArray,
        Action::NewHash,
        Action::NewRange,
        Action::BranchUnless,
        Action::BranchIf,
        Action::Jump,
        Action::Break,
        Action::DefMethod,
        Action::DefSingletonMethod,
        Action::DefClass,
        Action::Send,
        Action::InvokeBlock,
        Action::GetBlock,
        Action::Pop,
        Action::Dup,
        Action::Leave,
    ];

    /// Numeric action code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical mnemonic used in traces, disassembly and error messages.
    ///
    /// The match is exhaustive, so an action without a mnemonic does not
    /// compile.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Action::GetLocal => "getlocal",
            Action::GetConstant => "getconstant",
            Action::GetInstanceVariable => "getinstancevariable",
            Action::SetLocal => "setlocal",
            Action::SetConstant => "setconstant",
            Action::SetInstanceVariable => "setinstancevariable",
            Action::PutBoolean => "putboolean",
            Action::PutString => "putstring",
            Action::PutFloat => "putfloat",
            Action::PutSelf => "putself",
            Action::PutObject => "putobject",
            Action::PutNull => "putnil",
            Action::NewArray => "newarray",
            Action::ExpandArray => "expand_array",
            Action::SplatArray => "splat_array",
            Action::NewHash => "newhash",
            Action::NewRange => "newrange",
            Action::BranchUnless => "branchunless",
            Action::BranchIf => "branchif",
            Action::Jump => "jump",
            Action::Break => "break",
            Action::DefMethod => "def_method",
            Action::DefSingletonMethod => "def_singleton_method",
            Action::DefClass => "def_class",
            Action::Send => "send",
            Action::InvokeBlock => "invokeblock",
            Action::GetBlock => "getblock",
            Action::Pop => "pop",
            Action::Dup => "dup",
            Action::Leave => "leave",
        }
    }

    /// True for actions that transfer control to an anchor.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Action::BranchUnless | Action::BranchIf | Action::Jump | Action::Break
        )
    }
}

impl TryFrom<u8> for Action {
    type Error = BytecodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Action::ALL
            .get(code as usize)
            .copied()
            .ok_or(BytecodeError::UnknownAction(code))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
