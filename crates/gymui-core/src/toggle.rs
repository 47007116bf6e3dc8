use rand::RngCore;

use crate::error::Result;
use crate::reward::{RewardElement, RewardNode, RewardTemplate};
use crate::state::{StateElement, StateNode};
use crate::widget::{Action, Clickable, Ctx, leaf_nodes, pick};
use crate::{BoundingBox, Point, Role, Scene};

/// One-cell toggle. Scores `["checked"]` and `["unchecked"]`.
pub struct CheckBox {
    label: String,
    bbox: BoundingBox,
    checked_by_default: bool,
    on_toggle: Action,
    state: StateNode,
    reward: RewardNode,
}

impl CheckBox {
    pub fn new(label: impl Into<String>, bbox: BoundingBox) -> Result<Self> {
        Ok(Self {
            label: label.into(),
            bbox,
            checked_by_default: false,
            on_toggle: Action::None,
            state: StateNode::new("CheckBox", 1),
            reward: RewardNode::new("CheckBox", &RewardTemplate::tags(["checked", "unchecked"]))?,
        })
    }

    pub fn checked_by_default(mut self, checked: bool) -> Self {
        self.checked_by_default = checked;
        self
    }

    /// Action handed to the container after every toggle.
    pub fn on_toggle(mut self, action: Action) -> Self {
        self.on_toggle = action;
        self
    }

    pub fn is_checked(&self, state: &[i8]) -> bool {
        self.state.get(state, 0) != 0
    }
}

leaf_nodes!(CheckBox);

impl Clickable for CheckBox {
    fn bounding_box(&self, _state: &[i8]) -> BoundingBox {
        self.bbox
    }

    fn handle_click(&mut self, _p: Point, ctx: &mut Ctx<'_>) -> Action {
        let checked = !self.is_checked(ctx.state);
        self.state.set(ctx.state, 0, checked as i8);
        let tag = if checked { "checked" } else { "unchecked" };
        self.reward.register(ctx.reward, &[tag]);
        self.on_toggle.clone()
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>, _rng: &mut dyn RngCore) {
        self.state.set(ctx.state, 0, self.checked_by_default as i8);
    }

    fn render(&self, state: &[i8], scene: &mut Scene) {
        scene.rect(self.bbox, Role::Checkbox, self.is_checked(state));
        scene.text(self.bbox, &self.label);
    }

    fn actions(&self) -> &[Action] {
        std::slice::from_ref(&self.on_toggle)
    }
}

/// A single option of a `RadioGroup`. Owns one state cell and no reward bits;
/// the group scores selections.
pub struct RadioButton {
    label: String,
    bbox: BoundingBox,
    state: StateNode,
    reward: RewardNode,
}

impl RadioButton {
    pub fn new(label: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bbox,
            state: StateNode::new("RadioButton", 1),
            reward: RewardNode::empty("RadioButton"),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_selected(&self, state: &[i8]) -> bool {
        self.state.get(state, 0) != 0
    }
}

leaf_nodes!(RadioButton);

impl Clickable for RadioButton {
    fn bounding_box(&self, _state: &[i8]) -> BoundingBox {
        self.bbox
    }

    /// Selecting is idempotent; clearing the siblings is the group's job.
    fn handle_click(&mut self, _p: Point, ctx: &mut Ctx<'_>) -> Action {
        self.state.set(ctx.state, 0, 1);
        Action::None
    }

    fn render(&self, state: &[i8], scene: &mut Scene) {
        scene.rect(self.bbox, Role::RadioButton, self.is_selected(state));
        scene.text(self.bbox, &self.label);
    }
}

/// Mutually exclusive options. Scores `["selected", label]`.
pub struct RadioGroup {
    buttons: Vec<RadioButton>,
    default: Option<usize>,
    state: StateNode,
    reward: RewardNode,
}

impl RadioGroup {
    pub fn new(buttons: Vec<RadioButton>) -> Result<Self> {
        let template =
            RewardTemplate::map([("selected", RewardTemplate::tags(buttons.iter().map(|b| b.label())))]);
        Ok(Self {
            reward: RewardNode::new("RadioGroup", &template)?,
            state: StateNode::new("RadioGroup", 0),
            buttons,
            default: None,
        })
    }

    pub fn default_selected(mut self, index: usize) -> Self {
        self.default = Some(index).filter(|&i| i < self.buttons.len());
        self
    }

    pub fn selected(&self, state: &[i8]) -> Option<usize> {
        self.buttons.iter().position(|b| b.is_selected(state))
    }

    fn select(&mut self, index: usize, state: &mut [i8]) {
        for b in &self.buttons {
            b.state.set(state, 0, 0);
        }
        if let Some(b) = self.buttons.get(index) {
            b.state.set(state, 0, 1);
        }
    }
}

impl StateElement for RadioGroup {
    fn state_node(&self) -> &StateNode {
        &self.state
    }

    fn state_node_mut(&mut self) -> &mut StateNode {
        &mut self.state
    }

    fn for_each_state_child(&self, f: &mut dyn FnMut(&dyn StateElement)) {
        for b in &self.buttons {
            f(b);
        }
    }

    fn for_each_state_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn StateElement)) {
        for b in &mut self.buttons {
            f(b);
        }
    }
}

impl RewardElement for RadioGroup {
    fn reward_node(&self) -> &RewardNode {
        &self.reward
    }

    fn reward_node_mut(&mut self) -> &mut RewardNode {
        &mut self.reward
    }
}

impl Clickable for RadioGroup {
    fn bounding_box(&self, state: &[i8]) -> BoundingBox {
        let boxes: Vec<BoundingBox> = self.buttons.iter().map(|b| b.bounding_box(state)).collect();
        BoundingBox::union(&boxes).unwrap_or_default()
    }

    fn handle_click(&mut self, p: Point, ctx: &mut Ctx<'_>) -> Action {
        let state: &[i8] = &*ctx.state;
        let boxes = self.buttons.iter().map(|b| b.bounding_box(state)).enumerate();
        let Some(i) = pick(p, ctx.fallback, boxes) else {
            return Action::None;
        };
        self.select(i, ctx.state);
        self.buttons[i].handle_click(p, ctx);
        let label = self.buttons[i].label().to_string();
        self.reward.register(ctx.reward, &["selected", label.as_str()]);
        Action::None
    }

    fn reset(&mut self, ctx: &mut Ctx<'_>, _rng: &mut dyn RngCore) {
        if let Some(i) = self.default {
            self.select(i, ctx.state);
        }
    }

    fn render(&self, state: &[i8], scene: &mut Scene) {
        for b in &self.buttons {
            b.render(state, scene);
        }
    }
}
