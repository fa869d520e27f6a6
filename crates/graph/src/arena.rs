//! Index-addressed edge arena backing the dynamic graph.
//!
//! Edges live in three parallel growable arrays (column, weight, link) and
//! are referenced by integer handles. While the graph is mutable the link
//! field chains each row into a circular list; during defragmentation it is
//! repurposed to leave forwarding markers behind moved records, so the
//! compaction runs in O(edges) without a second edge array.
//!
//! **Not part of the public API.**

/// Sentinel for "no next slot" in a terminated row list.
pub(crate) const NIL: usize = usize::MAX;

/// Capacity below which the arena doubles; above it, growth is chunked.
const DOUBLE_LIMIT: usize = 1 << 20;

/// Fixed growth increment once the doubling limit is reached.
const GROW_CHUNK: usize = 1 << 18;

/// Link state of an arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// Slot holds a live edge; `next` chains the row list (or [`NIL`]).
    Active { next: usize },
    /// Slot content moved to `to` during defragmentation.
    Forwarded { to: usize },
}

/// Growable edge storage addressed by integer handles.
///
/// Kept as a struct of arrays so that after defragmentation the column and
/// weight vectors can be moved out verbatim as the CSR payload.
#[derive(Debug, Clone)]
pub(crate) struct EdgeArena {
    pub(crate) columns: Vec<usize>,
    pub(crate) weights: Vec<f64>,
    pub(crate) links: Vec<Link>,
}

/// Capacity planning for edge storage.
///
/// Doubles the capacity up to [`DOUBLE_LIMIT`] slots, then grows by fixed
/// [`GROW_CHUNK`] increments. The cap bounds peak over-allocation on large
/// graphs.
pub(crate) fn grow_capacity(current: usize) -> usize {
    if current == 0 {
        16
    } else if current < DOUBLE_LIMIT {
        current * 2
    } else {
        current + GROW_CHUNK
    }
}

impl EdgeArena {
    pub(crate) fn new() -> Self {
        Self {
            columns: Vec::new(),
            weights: Vec::new(),
            links: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.columns.len()
    }

    /// Appends a new slot, applying the growth policy, and returns its handle.
    pub(crate) fn alloc(&mut self, column: usize, weight: f64, next: usize) -> usize {
        if self.columns.len() == self.columns.capacity() {
            let target = grow_capacity(self.columns.capacity());
            let extra = target - self.columns.len();
            self.columns.reserve_exact(extra);
            self.weights.reserve_exact(extra);
            self.links.reserve_exact(extra);
        }
        let handle = self.columns.len();
        self.columns.push(column);
        self.weights.push(weight);
        self.links.push(Link::Active { next });
        handle
    }

    /// Resolves a handle through any forwarding markers left by compaction.
    pub(crate) fn resolve(&self, mut handle: usize) -> usize {
        while let Link::Forwarded { to } = self.links[handle] {
            handle = to;
        }
        handle
    }

    /// Returns the `next` handle of an active slot.
    ///
    /// Callers must pass a resolved handle; forwarded slots are a bug in the
    /// compaction walk.
    pub(crate) fn next_of(&self, handle: usize) -> usize {
        match self.links[handle] {
            Link::Active { next } => next,
            Link::Forwarded { .. } => NIL,
        }
    }

    /// Swaps the payload of two slots, links included.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.columns.swap(a, b);
        self.weights.swap(a, b);
        self.links.swap(a, b);
    }
}
