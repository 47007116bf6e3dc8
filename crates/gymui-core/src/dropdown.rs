use rand::{Rng, RngCore};

use crate::error::Result;
use crate::reward::{RewardNode, RewardTemplate};
use crate::state::StateNode;
use crate::widget::{Action, Clickable, Ctx, leaf_nodes, pick};
use crate::{BoundingBox, Point, Role, Scene};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub value: String,
    pub visible: bool,
}

impl Item {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

const OPEN: usize = 0;

/// Trigger box plus a list of items that unfolds below it while open.
///
/// State is `[open, one-hot selection...]`. Rewards are `["opened"]`,
/// `["closed"]` and `["selected", value]`.
pub struct Dropdown {
    bbox: BoundingBox,
    row_height: u32,
    items: Vec<Item>,
    initial: Vec<bool>,
    randomize_visibility: bool,
    state: StateNode,
    reward: RewardNode,
}

impl Dropdown {
    pub fn new(bbox: BoundingBox, items: Vec<Item>) -> Result<Self> {
        let template = RewardTemplate::map([
            ("opened", RewardTemplate::Leaf),
            ("closed", RewardTemplate::Leaf),
            (
                "selected",
                RewardTemplate::tags(items.iter().map(|i| i.value.as_str())),
            ),
        ]);
        Ok(Self {
            bbox,
            row_height: bbox.height,
            initial: items.iter().map(|i| i.visible).collect(),
            state: StateNode::new("Dropdown", 1 + items.len()),
            reward: RewardNode::new("Dropdown", &template)?,
            items,
            randomize_visibility: false,
        })
    }

    pub fn row_height(mut self, h: u32) -> Self {
        self.row_height = h;
        self
    }

    /// On every reset, show each item with probability 1/2 (at least one).
    pub fn randomize_visibility(mut self, on: bool) -> Self {
        self.randomize_visibility = on;
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn set_item_visible(&mut self, index: usize, visible: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.visible = visible;
        }
    }

    pub fn is_open(&self, state: &[i8]) -> bool {
        self.state.get(state, OPEN) != 0
    }

    pub fn selected(&self, state: &[i8]) -> Option<&str> {
        let cells = &self.state.view(state)[1..];
        let i = cells.iter().position(|&c| c != 0)?;
        Some(self.items[i].value.as_str())
    }

    /// Hit boxes of visible items, stacked one row each below the trigger.
    pub fn item_boxes(&self) -> Vec<(usize, BoundingBox)> {
        let row = self.row_height as i32;
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.visible)
            .enumerate()
            .map(|(slot, (i, _))| {
                let bbox = BoundingBox::new(
                    self.bbox.x,
                    self.bbox.y2() + slot as i32 * row,
                    self.bbox.width,
                    self.row_height,
                );
                (i, bbox)
            })
            .collect()
    }

    fn select(&mut self, index: usize, ctx: &mut Ctx<'_>) {
        let cells = self.state.view_mut(ctx.state);
        cells[1..].fill(0);
        cells[1 + index] = 1;
        let value = self.items[index].value.as_str();
        log::debug!("dropdown selected '{value}'");
        self.reward.register(ctx.reward, &["selected", value]);
        self.set_open(ctx, false);
    }
}

leaf_nodes!(Dropdown);

impl Clickable for Dropdown {
    fn bounding_box(&self, state: &[i8]) -> BoundingBox {
        if !self.is_open(state) {
            return self.bbox;
        }
        let boxes: Vec<BoundingBox> = std::iter::once(self.bbox)
            .chain(self.item_boxes().into_iter().map(|(_, b)| b))
            .collect();
        BoundingBox::union(&boxes).unwrap_or(self.bbox)
    }

    fn is_blocking(&self, state: &[i8]) -> bool {
        self.is_open(state)
    }

    fn is_modal(&self) -> bool {
        true
    }

    fn set_open(&mut self, ctx: &mut Ctx<'_>, open: bool) {
        if self.is_open(ctx.state) == open {
            return;
        }
        if open && !self.items.iter().any(|i| i.visible) {
            log::warn!("opening dropdown with no visible item");
        }
        self.state.set(ctx.state, OPEN, open as i8);
        let tag = if open { "opened" } else { "closed" };
        self.reward.register(ctx.reward, &[tag]);
    }

    fn dismiss(&mut self, ctx: &mut Ctx<'_>) {
        self.set_open(ctx, false);
    }

    fn handle_click(&mut self, p: Point, ctx: &mut Ctx<'_>) -> Action {
        if !self.is_open(ctx.state) {
            self.set_open(ctx, true);
            return Action::None;
        }
        if self.bbox.contains(p) {
            self.set_open(ctx, false);
            return Action::None;
        }
        let boxes = self.item_boxes();
        match pick(p, ctx.fallback, boxes.iter().copied()) {
            Some(i) => self.select(i, ctx),
            None => self.set_open(ctx, false),
        }
        Action::None
    }

    fn reset(&mut self, _ctx: &mut Ctx<'_>, rng: &mut dyn RngCore) {
        if self.randomize_visibility && !self.items.is_empty() {
            for item in &mut self.items {
                item.visible = rng.gen_bool(0.5);
            }
            if !self.items.iter().any(|i| i.visible) {
                let i = rng.gen_range(0..self.items.len());
                self.items[i].visible = true;
            }
        } else {
            for (item, &v) in self.items.iter_mut().zip(&self.initial) {
                item.visible = v;
            }
        }
    }

    fn render(&self, state: &[i8], scene: &mut Scene) {
        let open = self.is_open(state);
        scene.rect(self.bbox, Role::Dropdown, open);
        scene.text(self.bbox, self.selected(state).unwrap_or_default());
        if open {
            for (i, bbox) in self.item_boxes() {
                let chosen = self.state.get(state, 1 + i) != 0;
                scene.rect(bbox, Role::DropdownItem, chosen);
                scene.text(bbox, &self.items[i].value);
            }
        }
    }
}
