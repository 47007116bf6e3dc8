use thiserror::Error;

/// Which of the two shared buffers a slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tree {
    State,
    Reward,
}

impl std::fmt::Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tree::State => f.write_str("state"),
            Tree::Reward => f.write_str("reward"),
        }
    }
}

/// Construction-time failures. All of them mean the component tree was built
/// wrong; none can happen while clicks are being routed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{node}: slot of length {actual} assigned, expected {expected}")]
    SlotMismatch {
        node: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{node}: slot at offset {offset} is not zeroed")]
    NotZeroed { node: &'static str, offset: usize },

    #[error("{node}: slot assigned twice")]
    AlreadyAssigned { node: &'static str },

    #[error("{node}: slot used before assignment")]
    Unassigned { node: &'static str },

    #[error("{node}: unknown reward tag path {path:?}")]
    UnknownTag { node: &'static str, path: Vec<String> },

    #[error("duplicate reward tag path {path:?}")]
    DuplicateTag { path: Vec<String> },

    #[error("{node}: action targets missing or unsuitable child #{key}")]
    UnknownWidget { node: &'static str, key: usize },

    #[error("{node}: detached from the {tree} tree but owns {len} {tree} slots")]
    DetachedSlot {
        node: &'static str,
        tree: Tree,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
