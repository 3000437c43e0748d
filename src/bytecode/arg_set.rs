use serde::{Deserialize, Serialize};

use crate::bytecode::error::{BytecodeError, Result};

/// How a declared parameter binds its argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ArgKind {
    #[default]
    Normal = 0,
    /// Has a default value expression.
    Optional,
    /// `*rest`
    Splat,
    RequiredKeyword,
    OptionalKeyword,
}

impl ArgKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Declared parameters of a method or block.
///
/// Arity is known before each parameter is fully parsed, so slots are
/// allocated up front and filled one at a time, possibly out of order.
/// `names` and `kinds` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSet {
    names: Vec<String>,
    kinds: Vec<ArgKind>,
}

impl ArgSet {
    pub fn allocate(arity: usize) -> Self {
        Self {
            names: vec![String::new(); arity],
            kinds: vec![ArgKind::default(); arity],
        }
    }

    pub fn set_arg(&mut self, index: usize, name: impl Into<String>, kind: ArgKind) -> Result<()> {
        let arity = self.arity();
        if index >= arity {
            return Err(BytecodeError::ArgIndexOutOfRange { index, arity });
        }

        self.names[index] = name.into();
        self.kinds[index] = kind;
        Ok(())
    }

    /// Index of the parameter called `name`. Unfilled slots never match.
    pub fn find_index(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.names.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kinds(&self) -> &[ArgKind] {
        &self.kinds
    }

    pub fn arity(&self) -> usize {
        self.names.len()
    }
}
