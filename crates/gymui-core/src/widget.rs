use bitflags::bitflags;
use rand::RngCore;

use crate::error::Result;
use crate::reward::{RewardElement, TagPath, tag_path};
use crate::state::StateElement;
use crate::{BoundingBox, Point, Scene};

/// Index of a child inside its container, handed out by `Container::push`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetKey(pub(crate) usize);

impl WidgetKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a click asks the enclosing container to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Action {
    #[default]
    None,
    /// Set a bit in the container's own reward mapping.
    Register(TagPath),
    /// Open a modal sibling (popup or dropdown).
    Open(WidgetKey),
    /// Show one sibling page and hide the others.
    Show(WidgetKey),
    /// Close the innermost enclosing popup.
    Close,
    /// Passed up untouched and reported by the controller.
    Emit(String),
    Sequence(Vec<Action>),
}

impl Action {
    pub fn register<S: AsRef<str>>(parts: impl IntoIterator<Item = S>) -> Self {
        Action::Register(tag_path(parts))
    }

    pub fn emit(name: impl Into<String>) -> Self {
        Action::Emit(name.into())
    }

    pub fn then(self, next: Action) -> Self {
        Action::sequence([self, next])
    }

    /// Drops `None`s and unwraps single-element sequences.
    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        let mut v: Vec<Action> = actions.into_iter().filter(|a| !a.is_none()).collect();
        match v.len() {
            0 => Action::None,
            1 => v.pop().unwrap_or_default(),
            _ => Action::Sequence(v),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }

    /// Visits every non-sequence action, depth-first.
    pub fn for_each(&self, f: &mut dyn FnMut(&Action)) {
        match self {
            Action::Sequence(v) => v.iter().for_each(|a| a.for_each(f)),
            other => f(other),
        }
    }
}

/// What happens to a click that hits no widget.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Fallback {
    /// Ignore it.
    #[default]
    None,
    /// Route it to the closest visible widget, optionally only within
    /// `max_distance` pixels.
    Nearest { max_distance: Option<f64> },
}

/// Mutable access to both shared buffers for the duration of one click.
pub struct Ctx<'a> {
    pub state: &'a mut [i8],
    pub reward: &'a mut [u8],
    pub fallback: Fallback,
}

bitflags! {
    /// Trees a container child is attached to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Membership: u8 {
        const STATE = 1;
        const REWARD = 1 << 1;
    }
}

pub trait Clickable {
    /// Hit box; may depend on state (an open dropdown grows).
    fn bounding_box(&self, state: &[i8]) -> BoundingBox;

    /// Hidden widgets are skipped by hit-testing and nearest-fallback.
    fn is_visible(&self, _state: &[i8]) -> bool {
        true
    }

    /// True while this widget captures every click its container receives.
    fn is_blocking(&self, _state: &[i8]) -> bool {
        false
    }

    /// Popups and dropdowns; valid targets of `Action::Open`.
    fn is_modal(&self) -> bool {
        false
    }

    /// Valid targets of `Action::Show`.
    fn is_page(&self) -> bool {
        false
    }

    fn set_open(&mut self, _ctx: &mut Ctx<'_>, _open: bool) {}

    /// Closes every open popup and dropdown in this subtree.
    fn dismiss(&mut self, _ctx: &mut Ctx<'_>) {}

    fn handle_click(&mut self, p: Point, ctx: &mut Ctx<'_>) -> Action;

    /// Called after the controller zeroed both buffers. Writes initial state
    /// and clears transient fields; `rng` may only touch domain content.
    fn reset(&mut self, _ctx: &mut Ctx<'_>, _rng: &mut dyn RngCore) {}

    fn render(&self, state: &[i8], scene: &mut Scene);

    /// Actions this widget may hand to its container.
    fn actions(&self) -> &[Action] {
        &[]
    }

    /// Construction-time consistency checks of the subtree.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// State slice + reward slice + hit box + click handler.
pub trait Widget: StateElement + RewardElement + Clickable {}

impl<T: StateElement + RewardElement + Clickable + ?Sized> Widget for T {}

/// Implements both tree traits for a widget with no children.
macro_rules! leaf_nodes {
    ($ty:ty) => {
        impl $crate::state::StateElement for $ty {
            fn state_node(&self) -> &$crate::state::StateNode {
                &self.state
            }
            fn state_node_mut(&mut self) -> &mut $crate::state::StateNode {
                &mut self.state
            }
        }

        impl $crate::reward::RewardElement for $ty {
            fn reward_node(&self) -> &$crate::reward::RewardNode {
                &self.reward
            }
            fn reward_node_mut(&mut self) -> &mut $crate::reward::RewardNode {
                &mut self.reward
            }
        }
    };
}
pub(crate) use leaf_nodes;

/// First box containing `p`, else the nearest one when `fallback` allows.
/// Ties go to the earlier candidate.
pub(crate) fn pick<I>(p: Point, fallback: Fallback, candidates: I) -> Option<usize>
where
    I: Iterator<Item = (usize, BoundingBox)> + Clone,
{
    if let Some((i, _)) = candidates.clone().find(|(_, b)| b.contains(p)) {
        return Some(i);
    }
    let Fallback::Nearest { max_distance } = fallback else {
        return None;
    };
    let mut best: Option<(usize, f64)> = None;
    for (i, b) in candidates {
        let d = b.distance_to(p);
        if max_distance.is_some_and(|m| d > m) {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
