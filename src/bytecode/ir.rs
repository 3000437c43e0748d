use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::bytecode::{
    action::Action,
    anchor::{AnchorId, AnchorTable},
    arg_set::{ArgKind, ArgSet},
    config::BuilderConfig,
    error::{BytecodeError, Result},
    instruction::Instruction,
    operand::Operand,
};

/// The kind of scope an instruction set was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetKind {
    Method,
    /// Class or module body.
    Class,
    Block,
    Program,
}

impl SetKind {
    pub fn label(self) -> &'static str {
        match self {
            SetKind::Method => "Def",
            SetKind::Class => "DefClass",
            SetKind::Block => "Block",
            SetKind::Program => "ProgramStart",
        }
    }
}

impl std::fmt::Display for SetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Where an instruction set is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Emitting,
    /// Read-only. No more instructions, anchor writes or argument writes.
    Frozen,
}

/// Handle to an instruction returned by [`InstructionSet::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructionIndex(usize);

impl InstructionIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The compiled instructions of one scope: the program, a class body, a
/// method or a block.
///
/// Instructions are only ever appended. Branch targets live in the set's own
/// [`AnchorTable`] and can be resolved while emission continues. After
/// [`seal`](Self::seal) the set is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionSet {
    name: String,
    kind: SetKind,
    instructions: Vec<Instruction>,
    count: usize,
    arg_set: Option<ArgSet>,
    anchors: AnchorTable,
    sealed: bool,
    config: BuilderConfig,
}

impl InstructionSet {
    pub fn new(name: impl Into<String>, kind: SetKind) -> Self {
        Self::with_config(name, kind, BuilderConfig::default())
    }

    pub fn with_config(name: impl Into<String>, kind: SetKind, config: BuilderConfig) -> Self {
        Self {
            name: name.into(),
            kind,
            instructions: Vec::new(),
            count: 0,
            arg_set: None,
            anchors: AnchorTable::new(),
            sealed: false,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SetKind {
        self.kind
    }

    pub fn config(&self) -> BuilderConfig {
        self.config
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, at: InstructionIndex) -> Option<&Instruction> {
        self.instructions.get(at.0)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn arg_set(&self) -> Option<&ArgSet> {
        self.arg_set.as_ref()
    }

    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    pub fn phase(&self) -> Phase {
        if self.sealed {
            Phase::Frozen
        } else if self.count == 0 {
            Phase::Empty
        } else {
            Phase::Emitting
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // ==========================================================================
    // Emission
    // ==========================================================================

    /// Append an instruction. Its emission index is the number of
    /// instructions emitted before it.
    pub fn define(
        &mut self,
        action: Action,
        source_line: usize,
        operands: impl IntoIterator<Item = Operand>,
    ) -> Result<InstructionIndex> {
        self.ensure_open()?;

        let operands: Vec<Operand> = operands.into_iter().collect();
        if let Some(id) = operands
            .iter()
            .filter_map(Operand::as_anchor)
            .find(|id| !self.anchors.contains(*id))
        {
            return Err(BytecodeError::UnknownAnchor(id));
        }
        if let Some(nested) = operands
            .iter()
            .filter_map(Operand::as_nested)
            .find(|nested| !nested.is_sealed())
        {
            return Err(BytecodeError::UnsealedNested {
                nested: nested.name().to_string(),
            });
        }

        let insn = Instruction::new(action, self.count, source_line, operands)?;
        trace!(set = %self.name, index = self.count, insn = %insn, "define");

        self.instructions.push(insn);
        let at = InstructionIndex(self.count);
        self.count += 1;
        Ok(at)
    }

    /// Allocate an unresolved branch target.
    pub fn new_anchor(&mut self) -> Result<AnchorId> {
        self.ensure_open()?;
        self.anchors.allocate()
    }

    /// Point an anchor at `position`. Each anchor is resolved once.
    pub fn resolve_anchor(&mut self, id: AnchorId, position: usize) -> Result<()> {
        self.ensure_open()?;
        self.anchors.resolve(id, position)
    }

    /// Point an anchor at the next instruction to be emitted.
    pub fn resolve_anchor_here(&mut self, id: AnchorId) -> Result<()> {
        let position = self.count;
        self.resolve_anchor(id, position)
    }

    /// Branch target of the instruction at `at`.
    pub fn anchor_line(&self, at: InstructionIndex) -> Result<usize> {
        self.instruction(at)
            .ok_or(BytecodeError::NoInstruction { index: at.0 })?
            .anchor_line(&self.anchors)
    }

    pub fn unresolved_anchors(&self) -> Vec<AnchorId> {
        self.anchors.unresolved()
    }

    // ==========================================================================
    // Parameters
    // ==========================================================================

    /// Reserve `arity` empty parameter slots, replacing any earlier set.
    pub fn allocate_args(&mut self, arity: usize) -> Result<()> {
        self.ensure_open()?;
        self.arg_set = Some(ArgSet::allocate(arity));
        Ok(())
    }

    pub fn set_arg(&mut self, index: usize, name: impl Into<String>, kind: ArgKind) -> Result<()> {
        self.ensure_open()?;
        match self.arg_set.as_mut() {
            Some(args) => args.set_arg(index, name, kind),
            None => Err(BytecodeError::NoArgSet {
                name: self.name.clone(),
            }),
        }
    }

    // ==========================================================================
    // Sealing
    // ==========================================================================

    /// Freeze the set. Sealing an already sealed set is a no-op.
    ///
    /// Resolved targets may point at most one past the last instruction.
    pub fn seal(&mut self) -> Result<()> {
        if self.sealed {
            return Ok(());
        }

        if let Some((anchor, position)) = self
            .anchors
            .resolved()
            .find(|(_, position)| *position > self.count)
        {
            return Err(BytecodeError::AnchorOutOfRange {
                name: self.name.clone(),
                anchor,
                position,
                len: self.count,
            });
        }

        let pending = self.anchors.unresolved();
        if !pending.is_empty() {
            if self.config.require_resolved_anchors {
                return Err(BytecodeError::UnresolvedAtSeal {
                    name: self.name.clone(),
                    count: pending.len(),
                });
            }
            warn!(set = %self.name, count = pending.len(), "sealing with unresolved anchors");
        }

        self.sealed = true;
        debug!(set = %self.name, kind = %self.kind, instructions = self.count, "sealed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            return Err(BytecodeError::Sealed {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::bytecode::disasm::disassemble(self))
    }
}
