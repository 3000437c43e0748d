pub mod action;
pub mod anchor;
pub mod arg_set;
pub mod config;
pub mod disasm;
pub mod error;
pub mod instruction;
pub mod ir;
pub mod operand;

pub use action::Action;
pub use anchor::{AnchorId, AnchorTable};
pub use arg_set::{ArgKind, ArgSet};
pub use config::BuilderConfig;
pub use error::{BytecodeError, Result};
pub use instruction::Instruction;
pub use ir::{InstructionIndex, InstructionSet, Phase, SetKind};
pub use operand::{Literal, Operand, Slot};
