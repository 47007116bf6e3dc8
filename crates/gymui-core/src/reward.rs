//! # Reward templates
//!
//! A node declares which UI events it can score with a `RewardTemplate`:
//!
//! ```rust
//! use gymui_core::RewardTemplate;
//!
//! let t = RewardTemplate::map([
//!     ("window", RewardTemplate::tags(["opened", "closed"])),
//!     ("help", RewardTemplate::Leaf),
//! ]);
//! let m = t.generate_mapping().unwrap();
//! assert_eq!(m.len(), 3);
//! assert_eq!(m.index_of(&["window", "closed"]), Some(1));
//! assert_eq!(m.index_of(&["help"]), Some(2));
//! ```
//!
//! Indices are handed out depth-first in declaration order, starting at 0 for
//! every node. The node's bits then live in a slot of the controller's reward
//! buffer, assigned by a pre-order walk of the reward tree (which is walked
//! separately from the state tree).

use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::state::{Slot, check_slot};

/// Keys leading to one reward bit, e.g. `["window", "opened"]`.
pub type TagPath = SmallVec<[String; 3]>;

pub fn tag_path<S: AsRef<str>>(parts: impl IntoIterator<Item = S>) -> TagPath {
    parts.into_iter().map(|s| s.as_ref().to_string()).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum RewardTemplate {
    /// One bit, addressed by the path leading to it.
    Leaf,
    /// One bit per tag, addressed by `path + [tag]`.
    Tags(Vec<String>),
    /// Nested templates in declaration order.
    Map(Vec<(String, RewardTemplate)>),
}

impl RewardTemplate {
    pub fn tags<S: Into<String>>(tags: impl IntoIterator<Item = S>) -> Self {
        RewardTemplate::Tags(tags.into_iter().map(Into::into).collect())
    }

    pub fn map<S: Into<String>>(entries: impl IntoIterator<Item = (S, RewardTemplate)>) -> Self {
        RewardTemplate::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The template with no bits at all.
    pub fn empty() -> Self {
        RewardTemplate::Map(Vec::new())
    }

    /// Appends `entries` when `self` is a map; wraps both sides otherwise.
    pub fn extend(self, entries: RewardTemplate) -> Self {
        match (self, entries) {
            (RewardTemplate::Map(mut a), RewardTemplate::Map(b)) => {
                a.extend(b);
                RewardTemplate::Map(a)
            }
            (RewardTemplate::Map(mut a), other) => {
                a.push(("extra".into(), other));
                RewardTemplate::Map(a)
            }
            (this, other) => RewardTemplate::map([("base", this), ("extra", other)]),
        }
    }

    pub fn generate_mapping(&self) -> Result<RewardMapping> {
        let mut index = IndexMap::new();
        let mut prefix = Vec::new();
        walk(self, &mut prefix, &mut index)?;
        Ok(RewardMapping { index })
    }
}

fn insert(path: Vec<String>, out: &mut IndexMap<Box<[String]>, usize>) -> Result<()> {
    if out.contains_key(&PathRef(&path)) {
        return Err(Error::DuplicateTag { path });
    }
    let next = out.len();
    out.insert(path.into_boxed_slice(), next);
    Ok(())
}

fn walk(
    t: &RewardTemplate,
    prefix: &mut Vec<String>,
    out: &mut IndexMap<Box<[String]>, usize>,
) -> Result<()> {
    match t {
        RewardTemplate::Leaf => insert(prefix.clone(), out),
        RewardTemplate::Tags(tags) => {
            for tag in tags {
                let mut path = prefix.clone();
                path.push(tag.clone());
                insert(path, out)?;
            }
            Ok(())
        }
        RewardTemplate::Map(entries) => {
            for (key, sub) in entries {
                prefix.push(key.clone());
                let r = walk(sub, prefix, out);
                prefix.pop();
                r?;
            }
            Ok(())
        }
    }
}

/// Borrowed lookup key, hashes exactly like the owned `Box<[String]>`.
struct PathRef<'a, S>(&'a [S]);

impl<S: AsRef<str>> Hash for PathRef<'_, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for s in self.0 {
            s.as_ref().hash(state);
        }
    }
}

impl<S: AsRef<str>> Equivalent<Box<[String]>> for PathRef<'_, S> {
    fn equivalent(&self, key: &Box<[String]>) -> bool {
        self.0.len() == key.len() && self.0.iter().zip(key.iter()).all(|(a, b)| a.as_ref() == b.as_str())
    }
}

/// Tag path -> bit index, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RewardMapping {
    index: IndexMap<Box<[String]>, usize>,
}

impl RewardMapping {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index_of<S: AsRef<str>>(&self, path: &[S]) -> Option<usize> {
        self.index.get(&PathRef(path)).copied()
    }

    /// Paths in bit order.
    pub fn paths(&self) -> impl Iterator<Item = &[String]> {
        self.index.keys().map(|k| &**k)
    }
}

/// A node's fixed-size view into the reward buffer.
#[derive(Clone, Debug)]
pub struct RewardNode {
    class_name: &'static str,
    mapping: RewardMapping,
    slot: Option<Slot>,
}

impl RewardNode {
    pub fn new(class_name: &'static str, template: &RewardTemplate) -> Result<Self> {
        Ok(Self {
            class_name,
            mapping: template.generate_mapping()?,
            slot: None,
        })
    }

    /// A node that scores nothing.
    pub fn empty(class_name: &'static str) -> Self {
        Self {
            class_name,
            mapping: RewardMapping::default(),
            slot: None,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub fn bit_count(&self) -> usize {
        self.mapping.len()
    }

    pub fn mapping(&self) -> &RewardMapping {
        &self.mapping
    }

    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }

    pub fn assign(&mut self, slot: Slot, buffer: &[u8]) -> Result<()> {
        check_slot(self.class_name, self.slot, self.bit_count(), slot, buffer)?;
        self.slot = Some(slot);
        Ok(())
    }

    pub fn check_path<S: AsRef<str>>(&self, path: &[S]) -> Result<usize> {
        self.mapping
            .index_of(path)
            .ok_or_else(|| Error::UnknownTag {
                node: self.class_name,
                path: path.iter().map(|s| s.as_ref().to_string()).collect(),
            })
    }

    /// Sets the bit for `path`. Returns whether it was newly set.
    pub fn register_event<S: AsRef<str>>(&self, reward: &mut [u8], path: &[S]) -> Result<bool> {
        let i = self.check_path(path)?;
        let slot = self.slot.ok_or(Error::Unassigned {
            node: self.class_name,
        })?;
        let bit = &mut reward[slot.offset + i];
        let fresh = *bit == 0;
        *bit = 1;
        Ok(fresh)
    }

    /// Like `register_event`, for call sites validated at construction.
    pub fn register<S: AsRef<str>>(&self, reward: &mut [u8], path: &[S]) -> bool {
        match self.register_event(reward, path) {
            Ok(fresh) => fresh,
            Err(e) => {
                log::error!("{e}");
                debug_assert!(false, "{e}");
                false
            }
        }
    }

    pub fn is_set<S: AsRef<str>>(&self, reward: &[u8], path: &[S]) -> bool {
        match (self.slot, self.mapping.index_of(path)) {
            (Some(slot), Some(i)) => reward[slot.offset + i] != 0,
            _ => false,
        }
    }
}

/// Anything that sits in the reward tree. Walked independently of the state
/// tree, so a node may expose reward children it has no state link to.
pub trait RewardElement {
    fn reward_node(&self) -> &RewardNode;
    fn reward_node_mut(&mut self) -> &mut RewardNode;

    fn for_each_reward_child(&self, _f: &mut dyn FnMut(&dyn RewardElement)) {}
    fn for_each_reward_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn RewardElement)) {}
}

pub fn total_reward_len(node: &dyn RewardElement) -> usize {
    let mut total = node.reward_node().bit_count();
    node.for_each_reward_child(&mut |c| total += total_reward_len(c));
    total
}

pub fn allocate_reward(root: &mut dyn RewardElement) -> Result<Vec<u8>> {
    let buffer = vec![0; total_reward_len(root)];
    let mut cursor = 0;
    assign_pre_order(root, &buffer, &mut cursor)?;
    debug_assert_eq!(cursor, buffer.len());
    log::debug!("reward buffer: {} bits", buffer.len());
    Ok(buffer)
}

fn assign_pre_order(node: &mut dyn RewardElement, buffer: &[u8], cursor: &mut usize) -> Result<()> {
    let len = node.reward_node().bit_count();
    node.reward_node_mut().assign(
        Slot {
            offset: *cursor,
            len,
        },
        buffer,
    )?;
    *cursor += len;

    let mut res = Ok(());
    node.for_each_reward_child_mut(&mut |c| {
        if res.is_ok() {
            res = assign_pre_order(c, buffer, cursor);
        }
    });
    res
}

/// Owner class and tag path for each reward bit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardInfo {
    pub class_name: String,
    pub path: Vec<String>,
}

pub fn reward_info(root: &dyn RewardElement) -> Vec<RewardInfo> {
    fn walk(node: &dyn RewardElement, out: &mut Vec<RewardInfo>) {
        let n = node.reward_node();
        out.extend(n.mapping().paths().map(|p| RewardInfo {
            class_name: n.class_name().to_string(),
            path: p.to_vec(),
        }));
        node.for_each_reward_child(&mut |c| walk(c, out));
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// Bits that went 0 -> 1 between two snapshots of the reward buffer.
pub fn newly_set(before: &[u8], after: &[u8]) -> usize {
    debug_assert_eq!(before.len(), after.len());
    before
        .iter()
        .zip(after)
        .filter(|&(&b, &a)| b == 0 && a != 0)
        .count()
}

/// Every reward slot in the tree, in visitation order.
pub fn collect_reward_slots(root: &dyn RewardElement) -> Vec<(&'static str, Option<Slot>)> {
    fn walk(node: &dyn RewardElement, out: &mut Vec<(&'static str, Option<Slot>)>) {
        let n = node.reward_node();
        out.push((n.class_name(), n.slot()));
        node.for_each_reward_child(&mut |c| walk(c, out));
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}
