// id.rs — Stable arena identifiers for IR values and nodes
//
// Every Value and Node lives in its owning Graph's arena and is addressed by
// one of these ids. Ids are allocated monotonically per graph and never
// reused, so an id that outlives its entry (after safe removal) simply stops
// resolving instead of aliasing a newer entry.

use std::fmt;

/// Stable identifier for a value (a data edge) within one graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

/// Stable identifier for a node (an operation instance) within one graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Allocator for arena ids. Produces monotonically increasing ids in
/// allocation order, ensuring deterministic assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next_value: u32,
    next_node: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_value(&mut self) -> ValueId {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        id
    }

    pub fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_per_kind() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.alloc_value(), ValueId(0));
        assert_eq!(ids.alloc_node(), NodeId(0));
        assert_eq!(ids.alloc_value(), ValueId(1));
        assert_eq!(ids.alloc_node(), NodeId(1));
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(ValueId(7).to_string(), "v7");
        assert_eq!(NodeId(3).to_string(), "n3");
    }
}
