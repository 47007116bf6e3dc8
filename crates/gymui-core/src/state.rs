//! # State slices
//!
//! Every node of the component tree owns a fixed number of `i8` cells in the
//! controller's flat state buffer. The buffer is laid out by a pre-order walk
//! of the state tree:
//!
//! ```text
//! Page            own 1   -> [0]
//! ├── CheckBox    own 1   -> [1]
//! └── Dropdown    own 4   -> [2..6]
//! ```
//!
//! The visitation order is the contract with whatever consumes the state
//! vector, so children must always be visited in declaration order.

use std::ops::Range;

use crate::error::{Error, Result};

/// A contiguous window into one of the shared buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub offset: usize,
    pub len: usize,
}

impl Slot {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Checks `slot` against a node's declared length and the buffer contents.
pub(crate) fn check_slot<T: Default + PartialEq>(
    node: &'static str,
    current: Option<Slot>,
    own_len: usize,
    slot: Slot,
    buffer: &[T],
) -> Result<()> {
    if current.is_some() {
        return Err(Error::AlreadyAssigned { node });
    }
    if slot.len != own_len {
        return Err(Error::SlotMismatch {
            node,
            expected: own_len,
            actual: slot.len,
        });
    }
    let Some(cells) = buffer.get(slot.range()) else {
        return Err(Error::SlotMismatch {
            node,
            expected: own_len,
            actual: buffer.len().saturating_sub(slot.offset),
        });
    };
    let zero = T::default();
    if let Some(i) = cells.iter().position(|c| *c != zero) {
        return Err(Error::NotZeroed {
            node,
            offset: slot.offset + i,
        });
    }
    Ok(())
}

/// A node's fixed-size view into the state buffer.
#[derive(Clone, Debug)]
pub struct StateNode {
    class_name: &'static str,
    own_len: usize,
    slot: Option<Slot>,
}

impl StateNode {
    pub fn new(class_name: &'static str, own_len: usize) -> Self {
        Self {
            class_name,
            own_len,
            slot: None,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn own_len(&self) -> usize {
        self.own_len
    }

    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }

    pub fn assign(&mut self, slot: Slot, buffer: &[i8]) -> Result<()> {
        check_slot(self.class_name, self.slot, self.own_len, slot, buffer)?;
        self.slot = Some(slot);
        Ok(())
    }

    fn range(&self) -> Range<usize> {
        debug_assert!(
            self.slot.is_some() || self.own_len == 0,
            "{} read before slot assignment",
            self.class_name
        );
        self.slot.map(|s| s.range()).unwrap_or(0..0)
    }

    pub fn view<'a>(&self, state: &'a [i8]) -> &'a [i8] {
        &state[self.range()]
    }

    pub fn view_mut<'a>(&self, state: &'a mut [i8]) -> &'a mut [i8] {
        &mut state[self.range()]
    }

    pub fn get(&self, state: &[i8], i: usize) -> i8 {
        self.view(state)[i]
    }

    pub fn set(&self, state: &mut [i8], i: usize, value: i8) {
        self.view_mut(state)[i] = value;
    }
}

/// Anything that sits in the state tree.
pub trait StateElement {
    fn state_node(&self) -> &StateNode;
    fn state_node_mut(&mut self) -> &mut StateNode;

    /// State children in declaration order.
    fn for_each_state_child(&self, _f: &mut dyn FnMut(&dyn StateElement)) {}
    fn for_each_state_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn StateElement)) {}
}

/// Post-order sum of `own_len` over `node` and its descendants.
pub fn total_state_len(node: &dyn StateElement) -> usize {
    let mut total = node.state_node().own_len();
    node.for_each_state_child(&mut |c| total += total_state_len(c));
    total
}

/// Allocates one zeroed buffer for the whole tree and hands out slices in
/// pre-order.
pub fn allocate_state(root: &mut dyn StateElement) -> Result<Vec<i8>> {
    let buffer = vec![0; total_state_len(root)];
    let mut cursor = 0;
    assign_pre_order(root, &buffer, &mut cursor)?;
    debug_assert_eq!(cursor, buffer.len());
    log::debug!("state buffer: {} cells", buffer.len());
    Ok(buffer)
}

fn assign_pre_order(node: &mut dyn StateElement, buffer: &[i8], cursor: &mut usize) -> Result<()> {
    let len = node.state_node().own_len();
    node.state_node_mut().assign(
        Slot {
            offset: *cursor,
            len,
        },
        buffer,
    )?;
    *cursor += len;

    let mut res = Ok(());
    node.for_each_state_child_mut(&mut |c| {
        if res.is_ok() {
            res = assign_pre_order(c, buffer, cursor);
        }
    });
    res
}

/// Which tree node owns a given state index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateInfo {
    pub class_name: String,
    pub recursion_depth: usize,
}

/// One entry per state index, in buffer order.
pub fn states_info(root: &dyn StateElement) -> Vec<StateInfo> {
    fn walk(node: &dyn StateElement, depth: usize, out: &mut Vec<StateInfo>) {
        let n = node.state_node();
        out.extend((0..n.own_len()).map(|_| StateInfo {
            class_name: n.class_name().to_string(),
            recursion_depth: depth,
        }));
        node.for_each_state_child(&mut |c| walk(c, depth + 1, out));
    }
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}

/// Every assigned slot in the tree, in visitation order.
pub fn collect_state_slots(root: &dyn StateElement) -> Vec<(&'static str, Option<Slot>)> {
    fn walk(node: &dyn StateElement, out: &mut Vec<(&'static str, Option<Slot>)>) {
        let n = node.state_node();
        out.push((n.class_name(), n.slot()));
        node.for_each_state_child(&mut |c| walk(c, out));
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}
