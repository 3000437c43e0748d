use crate::bytecode::{
    action::Action,
    anchor::{AnchorId, AnchorTable},
    error::{BytecodeError, Result},
    operand::Operand,
};

/// One compiled instruction.
///
/// Built only by [`InstructionSet::define`](crate::bytecode::ir::InstructionSet::define),
/// which fixes its emission index.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    action: Action,
    operands: Vec<Operand>,
    index: usize,
    source_line: usize,
    anchor: Option<AnchorId>,
}

impl Instruction {
    /// `source_line` is 0-based and stored 1-based.
    pub(crate) fn new(
        action: Action,
        index: usize,
        source_line: usize,
        operands: Vec<Operand>,
    ) -> Result<Self> {
        let mut anchor = None;
        for id in operands.iter().filter_map(Operand::as_anchor) {
            if anchor.replace(id).is_some() {
                return Err(BytecodeError::MultipleAnchors { action });
            }
        }

        Ok(Self {
            action,
            operands,
            index,
            source_line: source_line.saturating_add(1),
            anchor,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn action_name(&self) -> &'static str {
        self.action.mnemonic()
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Position within the owning set.
    pub fn emission_index(&self) -> usize {
        self.index
    }

    /// 1-based line of the source that produced this instruction.
    pub fn source_line(&self) -> usize {
        self.source_line
    }

    /// The anchor this instruction branches to, if any.
    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    /// Current position of this instruction's branch target.
    pub fn anchor_line(&self, anchors: &AnchorTable) -> Result<usize> {
        let id = self.anchor.ok_or(BytecodeError::NoAnchor {
            action: self.action,
        })?;
        anchors.position(id)
    }

    /// One-line description for traces and error messages.
    pub fn describe(&self) -> String {
        let operands: Vec<String> = self.operands.iter().map(|op| op.to_string()).collect();
        format!(
            "{}: {}. source line: {}",
            self.action_name(),
            operands.join(", "),
            self.source_line
        )
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
