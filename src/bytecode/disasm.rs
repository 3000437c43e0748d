use std::fmt::{self, Write};

use crate::bytecode::ir::InstructionSet;

/// Disassembly of an instruction set and every set nested in its operands.
pub fn disassemble(set: &InstructionSet) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_instruction_set(&mut out, set, 0);
    out
}

/// Write a single instruction set with optional indentation, then its
/// nested sets one level deeper.
pub fn write_instruction_set(out: &mut impl Write, set: &InstructionSet, indent: usize) -> fmt::Result {
    let prefix = "  ".repeat(indent);

    writeln!(out, "{}════════════════════════════════════════", prefix)?;
    writeln!(out, "{} {} {}", prefix, set.kind(), set.name())?;
    if let Some(args) = set.arg_set() {
        writeln!(out, "{} args: {}", prefix, args.names().join(", "))?;
    }
    writeln!(out, "{} {} instructions", prefix, set.len())?;
    writeln!(out, "{}════════════════════════════════════════", prefix)?;
    write_instructions(out, set, indent)?;
    writeln!(out)?;

    for insn in set.instructions() {
        for nested in insn.operands().iter().filter_map(|op| op.as_nested()) {
            write_instruction_set(out, nested, indent + 1)?;
        }
    }

    Ok(())
}

fn write_instructions(out: &mut impl Write, set: &InstructionSet, indent: usize) -> fmt::Result {
    let jump_targets = collect_jump_targets(set);
    let prefix = "  ".repeat(indent);

    for (ip, insn) in set.instructions().iter().enumerate() {
        if jump_targets.contains(&ip) {
            writeln!(out, "{}      ┌──────────────────────────────────", prefix)?;
        }

        write!(out, "{}{:04} ", prefix, ip)?;

        if jump_targets.contains(&ip) {
            write!(out, "► ")?;
        } else {
            write!(out, "  ")?;
        }

        let operands: Vec<String> = insn.operands().iter().map(|op| op.to_string()).collect();
        write!(out, "{:<20} {}", insn.action_name(), operands.join(", "))?;

        if insn.anchor().is_some() {
            match insn.anchor_line(set.anchors()) {
                Ok(target) => write!(out, " (→ {:04})", target)?,
                Err(_) => write!(out, " (→ ????)")?,
            }
        }

        writeln!(out, "  ; line {}", insn.source_line())?;
    }

    Ok(())
}

fn collect_jump_targets(set: &InstructionSet) -> Vec<usize> {
    let mut targets = Vec::new();

    for insn in set.instructions() {
        if let Ok(target) = insn.anchor_line(set.anchors()) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{
        action::Action,
        arg_set::ArgKind,
        ir::SetKind,
        operand::Operand,
    };

    fn if_else() -> InstructionSet {
        let mut set = InstructionSet::new("main", SetKind::Program);
        let else_branch = set.new_anchor().unwrap();
        let end = set.new_anchor().unwrap();

        set.define(Action::PutBoolean, 0, [Operand::from(true)]).unwrap();
        set.define(Action::BranchUnless, 0, [Operand::Anchor(else_branch)])
            .unwrap();
        set.define(Action::PutObject, 1, [Operand::from(10)]).unwrap();
        set.define(Action::Jump, 1, [Operand::Anchor(end)]).unwrap();
        set.resolve_anchor_here(else_branch).unwrap();
        set.define(Action::PutObject, 3, [Operand::from(20)]).unwrap();
        set.resolve_anchor_here(end).unwrap();
        set.define(Action::Leave, 4, []).unwrap();
        set
    }

    #[test]
    fn test_header_and_lines() {
        let text = disassemble(&if_else());

        assert!(text.contains(" ProgramStart main"));
        assert!(text.contains(" 6 instructions"));
        assert!(text.contains("0000   putboolean"));
        assert!(text.contains("branchunless         anchor#0 (→ 0004)"));
        assert!(text.contains("jump                 anchor#1 (→ 0005)"));
        assert!(text.contains("; line 5"));
    }

    #[test]
    fn test_jump_targets_are_marked() {
        let text = disassemble(&if_else());

        assert!(text.contains("0004 ► putobject"));
        assert!(text.contains("0005 ► leave"));
        assert!(text.contains("0002   putobject"));
        assert_eq!(text.matches('┌').count(), 2);
    }

    #[test]
    fn test_unreferenced_anchor_is_not_marked() {
        let mut set = InstructionSet::new("main", SetKind::Program);
        let unused = set.new_anchor().unwrap();
        set.define(Action::PutSelf, 0, []).unwrap();
        set.define(Action::Pop, 0, []).unwrap();
        set.resolve_anchor(unused, 1).unwrap();

        let text = disassemble(&set);
        assert!(text.contains("0001   pop"));
        assert!(!text.contains('►'));
        assert!(!text.contains('┌'));
    }

    #[test]
    fn test_unresolved_target() {
        let mut set = InstructionSet::new("main", SetKind::Program);
        let anchor = set.new_anchor().unwrap();
        set.define(Action::BranchIf, 0, [Operand::Anchor(anchor)]).unwrap();

        assert!(disassemble(&set).contains("(→ ????)"));
    }

    #[test]
    fn test_nested_sets_follow_parent() {
        let mut body = InstructionSet::new("add", SetKind::Method);
        body.allocate_args(2).unwrap();
        body.set_arg(0, "a", ArgKind::Normal).unwrap();
        body.set_arg(1, "b", ArgKind::Normal).unwrap();
        body.define(Action::GetLocal, 1, [Operand::from(0), Operand::local(0)])
            .unwrap();
        body.define(Action::Leave, 1, []).unwrap();
        body.seal().unwrap();

        let mut main = InstructionSet::new("main", SetKind::Program);
        main.define(Action::PutSelf, 0, []).unwrap();
        main.define(Action::DefMethod, 0, [Operand::from(2), Operand::from(body)])
            .unwrap();

        let text = main.to_string();
        let parent = text.find(" ProgramStart main").unwrap();
        let child = text.find("   Def add").unwrap();

        assert!(parent < child);
        assert!(text.contains("def_method           2, <Def:add>"));
        assert!(text.contains("   args: a, b"));
        assert!(text.contains("  0000   getlocal             0, $0"));
    }
}
