//! Forward branch targets.
//!
//! A branch is emitted before its destination exists. The lowering pass
//! allocates an anchor, hands the [`AnchorId`] to the branch instruction as
//! an operand, keeps emitting, and writes the real position into the table
//! once the structural pass knows it. Every instruction holding the id sees
//! the write because they all read the same slot.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bytecode::error::{BytecodeError, Result};

static NEXT_TABLE: AtomicU32 = AtomicU32::new(1);

/// Handle to one slot of an [`AnchorTable`]. Only valid for the table that
/// allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId {
    table: u32,
    index: u32,
}

impl AnchorId {
    pub(crate) fn new(table: u32, index: u32) -> Self {
        AnchorId { table, index }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anchor#{}", self.index)
    }
}

/// Arena of pending branch targets owned by one instruction set.
///
/// Each table gets a process-unique id on creation, and ids allocated by one
/// table are rejected by every other. A clone keeps the id, so the handles it
/// was built with stay valid for it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTable {
    id: u32,
    slots: Vec<Option<usize>>,
}

impl Default for AnchorTable {
    fn default() -> Self {
        Self {
            id: NEXT_TABLE.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
        }
    }
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new unresolved anchor.
    pub fn allocate(&mut self) -> Result<AnchorId> {
        let index = u32::try_from(self.slots.len()).map_err(|_| BytecodeError::TooManyAnchors)?;
        self.slots.push(None);
        Ok(AnchorId::new(self.id, index))
    }

    /// Write the destination position. Fails if the anchor was already resolved.
    pub fn resolve(&mut self, id: AnchorId, position: usize) -> Result<()> {
        if !self.contains(id) {
            return Err(BytecodeError::UnknownAnchor(id));
        }
        let slot = &mut self.slots[id.index()];

        if let Some(existing) = *slot {
            return Err(BytecodeError::AnchorAlreadyResolved {
                anchor: id,
                position: existing,
            });
        }

        *slot = Some(position);
        debug!(anchor = %id, position, "anchor resolved");
        Ok(())
    }

    /// Resolved position of an anchor.
    pub fn position(&self, id: AnchorId) -> Result<usize> {
        if !self.contains(id) {
            return Err(BytecodeError::UnknownAnchor(id));
        }
        self.slots[id.index()].ok_or(BytecodeError::UnresolvedAnchor(id))
    }

    pub fn is_resolved(&self, id: AnchorId) -> bool {
        self.position(id).is_ok()
    }

    pub fn contains(&self, id: AnchorId) -> bool {
        id.table == self.id && id.index() < self.slots.len()
    }

    /// Ids that have not been resolved yet, in allocation order.
    pub fn unresolved(&self) -> Vec<AnchorId> {
        self.ids()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Resolved anchors with their positions, in allocation order.
    pub fn resolved(&self) -> impl Iterator<Item = (AnchorId, usize)> + '_ {
        self.ids()
            .zip(&self.slots)
            .filter_map(|(id, slot)| slot.map(|position| (id, position)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn ids(&self) -> impl Iterator<Item = AnchorId> + '_ {
        (0..self.slots.len()).map(|i| AnchorId::new(self.id, i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_starts_unresolved() {
        let mut table = AnchorTable::new();
        let a = table.allocate().unwrap();
        let b = table.allocate().unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(!table.is_resolved(a));
        assert_eq!(table.position(a), Err(BytecodeError::UnresolvedAnchor(a)));
        assert_eq!(table.unresolved(), vec![a, b]);
    }

    #[test]
    fn test_resolve_once() {
        let mut table = AnchorTable::new();
        let a = table.allocate().unwrap();

        table.resolve(a, 7).unwrap();
        assert_eq!(table.position(a), Ok(7));
        assert!(table.unresolved().is_empty());
        assert_eq!(table.resolved().collect::<Vec<_>>(), vec![(a, 7)]);

        assert_eq!(
            table.resolve(a, 9),
            Err(BytecodeError::AnchorAlreadyResolved {
                anchor: a,
                position: 7
            })
        );
        assert_eq!(table.position(a), Ok(7));
    }

    #[test]
    fn test_foreign_id_is_rejected() {
        let mut table = AnchorTable::new();
        let mut other = AnchorTable::new();
        other.allocate().unwrap();
        let foreign = other.allocate().unwrap();

        assert!(!table.contains(foreign));
        assert_eq!(table.position(foreign), Err(BytecodeError::UnknownAnchor(foreign)));
        assert_eq!(
            table.resolve(foreign, 1),
            Err(BytecodeError::UnknownAnchor(foreign))
        );
    }

    #[test]
    fn test_same_index_from_another_table_is_rejected() {
        let mut table = AnchorTable::new();
        let mut other = AnchorTable::new();
        let own = table.allocate().unwrap();
        let foreign = other.allocate().unwrap();
        table.resolve(own, 99).unwrap();

        assert_eq!(own.index(), foreign.index());
        assert_ne!(own, foreign);
        assert!(!table.contains(foreign));
        assert_eq!(table.position(foreign), Err(BytecodeError::UnknownAnchor(foreign)));
        assert_eq!(
            table.resolve(foreign, 3),
            Err(BytecodeError::UnknownAnchor(foreign))
        );
        assert_eq!(table.position(own), Ok(99));
    }

    #[test]
    fn test_clone_keeps_handles_valid() {
        let mut table = AnchorTable::new();
        let a = table.allocate().unwrap();
        let copy = table.clone();

        assert!(copy.contains(a));
    }
}
