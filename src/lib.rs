//! # Garnet bytecode
//!
//! In-memory instruction sets produced by the Garnet compiler for its
//! stack-based virtual machine.
//!
//! The lowering pass creates one [`InstructionSet`] per compiled scope and
//! appends instructions to it with [`InstructionSet::define`]. Forward
//! branches take an [`AnchorId`] operand whose position is filled in once the
//! destination is known. A finished set is sealed and handed to the VM loop
//! or printed with [`bytecode::disasm::disassemble`].

pub mod bytecode;

pub use bytecode::{
    Action, AnchorId, ArgKind, ArgSet, BytecodeError, Instruction, InstructionIndex,
    InstructionSet, Operand, SetKind,
};
